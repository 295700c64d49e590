//! Shared fixtures for verification tests.
//!
//! Builds the same layout the producer's demo writes: a pack directory
//! `out/` with the input tree at `out/demo_input/`.

#![allow(dead_code)]

use auditpack_verify::{ResolvedContext, Verifier, VerifyOptions};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;

static INIT: Once = Once::new();

/// Installs a test-writer subscriber once per test binary.
pub fn init_test_logging() {
    INIT.call_once(|| {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let _ = tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .with(tracing_subscriber::filter::EnvFilter::from_default_env())
            .try_init();
    });
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

pub struct PackFixture {
    _root: TempDir,
    pub input_dir: PathBuf,
    pub pack_dir: PathBuf,
}

impl PackFixture {
    /// Demo input (`hello.txt`, `nested/world.txt`) plus a consistent pack.
    pub fn demo() -> Self {
        init_test_logging();
        let root = TempDir::new().unwrap();
        let pack_dir = root.path().join("out");
        let input_dir = pack_dir.join("demo_input");
        fs::create_dir_all(&input_dir).unwrap();

        let fixture = Self {
            _root: root,
            input_dir,
            pack_dir,
        };
        fixture.write_input("hello.txt", b"hello\n");
        fixture.write_input("nested/world.txt", b"world\n");
        fixture.write_pack(&fixture.manifest_for_input(), &fixture.run_meta("demo_input"));
        fixture
    }

    pub fn context(&self) -> ResolvedContext {
        ResolvedContext::new(&self.input_dir, &self.pack_dir)
    }

    pub fn verifier(&self, strict: bool) -> Verifier {
        Verifier::new(self.context(), VerifyOptions { strict })
    }

    pub fn input_path(&self, rel: &str) -> PathBuf {
        rel.split('/').fold(self.input_dir.clone(), |p, s| p.join(s))
    }

    pub fn write_input(&self, rel: &str, bytes: &[u8]) {
        let path = self.input_path(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, bytes).unwrap();
    }

    /// Manifest describing the current `hello.txt` and `nested/world.txt`.
    pub fn manifest_for_input(&self) -> Value {
        let files: Vec<Value> = ["hello.txt", "nested/world.txt"]
            .iter()
            .map(|rel| {
                let bytes = fs::read(self.input_path(rel)).unwrap();
                json!({
                    "path": rel,
                    "size_bytes": bytes.len(),
                    "sha256": sha256_hex(&bytes),
                })
            })
            .collect();
        let total: u64 = files.iter().map(|f| f["size_bytes"].as_u64().unwrap()).sum();
        json!({
            "version": "dev",
            "input": "demo_input",
            "files": files,
            "summary": { "file_count": 2, "total_bytes": total },
        })
    }

    pub fn run_meta(&self, label: &str) -> Value {
        json!({
            "tool": "proof-first-auditpack",
            "version": "dev",
            "input": label,
            "summary": { "file_count": 2, "total_bytes": 12 },
        })
    }

    /// Writes both JSON artifacts and a matching checksum listing.
    pub fn write_pack(&self, manifest: &Value, run_meta: &Value) {
        self.write_pack_file("manifest.json", &pretty(manifest));
        self.write_pack_file("run_meta.json", &pretty(run_meta));
        self.reseal(&["manifest.json", "run_meta.json"]);
    }

    pub fn write_pack_file(&self, name: &str, bytes: &[u8]) {
        fs::write(self.pack_dir.join(name), bytes).unwrap();
    }

    /// Rewrites `manifest.sha256` to cover `names` as they are now.
    pub fn reseal(&self, names: &[&str]) {
        let listing: String = names
            .iter()
            .map(|name| {
                let bytes = fs::read(self.pack_dir.join(name)).unwrap();
                format!("{}  {}\n", sha256_hex(&bytes), name)
            })
            .collect();
        self.write_pack_file("manifest.sha256", listing.as_bytes());
    }

    /// Flips one byte of a pack artifact without touching the listing.
    pub fn tamper_pack_file(&self, name: &str) {
        flip_byte(&self.pack_dir.join(name));
    }
}

/// Flips the byte just before the trailing newline; length is unchanged.
pub fn flip_byte(path: &Path) {
    let mut bytes = fs::read(path).unwrap();
    let last = bytes.len() - 2;
    bytes[last] ^= 0x01;
    fs::write(path, bytes).unwrap();
}

fn pretty(value: &Value) -> Vec<u8> {
    let mut bytes = serde_json::to_vec_pretty(value).unwrap();
    bytes.push(b'\n');
    bytes
}
