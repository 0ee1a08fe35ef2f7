//! Fingerprint command - print a file's content fingerprint

use crate::cache::Fingerprint;
use crate::cli::args::FingerprintArgs;
use crate::error::{ReelError, ReelResult};

/// Execute the fingerprint command
pub fn execute(args: FingerprintArgs) -> ReelResult<()> {
    if !args.file.is_file() {
        return Err(ReelError::PathNotFound(args.file));
    }

    let fingerprint = Fingerprint::of_file(&args.file)?;
    println!("{}", fingerprint);
    Ok(())
}
