//! Mark command - record the artifacts produced from a file

use crate::cache::{count_artifacts, ContentCache, Fingerprint};
use crate::cli::args::MarkArgs;
use crate::config::{Config, StatePaths};
use crate::error::{ReelError, ReelResult};
use crate::store::JsonStore;
use crate::ui::{self, Tone, UiContext};

/// Execute the mark command
pub fn execute(args: MarkArgs, config: &Config, paths: &StatePaths) -> ReelResult<()> {
    let ctx = UiContext::detect();

    if !args.file.is_file() {
        return Err(ReelError::PathNotFound(args.file));
    }
    if !args.artifact_dir.is_dir() {
        return Err(ReelError::PathNotFound(args.artifact_dir));
    }

    let artifact_dir = args.artifact_dir.canonicalize().map_err(|e| {
        ReelError::io(format!("resolving {}", args.artifact_dir.display()), e)
    })?;

    let count = count_artifacts(&artifact_dir, &config.cache.artifact_extensions)
        .map_err(|e| ReelError::io(format!("reading {}", artifact_dir.display()), e))?;
    if count == 0 {
        ui::status_hint(
            &ctx,
            Tone::Warn,
            "Artifact directory holds no artifacts yet",
            "the entry will be dropped on the next check",
        );
    }

    let fingerprint = Fingerprint::of_file(&args.file)?;

    let mut store = JsonStore::open(&paths.processed);
    let mut cache =
        ContentCache::new(&mut store).with_extensions(config.cache.artifact_extensions.clone());
    cache.mark_processed(fingerprint.as_str(), &artifact_dir);

    let artifacts = ui::count_noun(count, "artifact", "artifacts");
    ui::status(
        &ctx,
        Tone::Done,
        &format!("Marked {} processed ({})", fingerprint, artifacts),
    );
    ui::field(&ctx, "artifacts", &artifact_dir.display().to_string());
    Ok(())
}
