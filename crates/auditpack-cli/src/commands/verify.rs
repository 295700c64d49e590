//! Verify command implementation.

use crate::output;
use crate::path;
use auditpack_verify::{ResolvedContext, Verifier, VerifyOptions};
use tracing::debug;

pub fn run(
    input: String,
    pack: String,
    strict: bool,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let input_dir = path::resolve_dir("--in", &input)?;
    let pack_dir = path::resolve_dir("--pack", &pack)?;
    debug!(input_dir = %input_dir.display(), pack_dir = %pack_dir.display(), strict, "resolved directories");

    let ctx = ResolvedContext::new(input_dir, pack_dir);
    let verifier = Verifier::new(ctx, VerifyOptions { strict });

    match verifier.run() {
        Ok(report) => {
            if json_output {
                println!("{}", output::format_report(verifier.context(), &report));
            }
            Ok(())
        }
        Err(failure) => {
            if json_output {
                println!("{}", output::format_failure(verifier.context(), &failure));
            }
            Err(failure.into())
        }
    }
}
