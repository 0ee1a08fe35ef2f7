//! Check command - has this file already been processed?

use crate::cache::{artifact_dir, CacheResolution, ContentCache, Fingerprint};
use crate::cli::args::{CheckArgs, OutputFormat};
use crate::config::{Config, StatePaths};
use crate::error::{ReelError, ReelResult};
use crate::store::JsonStore;
use crate::ui::{self, UiContext};

/// Execute the check command
pub fn execute(args: CheckArgs, config: &Config, paths: &StatePaths) -> ReelResult<()> {
    if !args.file.is_file() {
        return Err(ReelError::PathNotFound(args.file));
    }

    let fingerprint = Fingerprint::of_file(&args.file)?;

    let mut store = JsonStore::open(&paths.processed);
    let mut cache =
        ContentCache::new(&mut store).with_extensions(config.cache.artifact_extensions.clone());
    let resolution = cache.resolve(fingerprint.as_str());

    match args.format {
        OutputFormat::Json => print_json(&fingerprint, &resolution)?,
        OutputFormat::Plain => print_plain(&resolution),
        OutputFormat::Table => print_table(&fingerprint, &resolution, config),
    }

    Ok(())
}

fn print_json(fingerprint: &Fingerprint, resolution: &CacheResolution) -> ReelResult<()> {
    let value = match resolution {
        CacheResolution::Processed {
            artifact_path,
            artifact_count,
        } => serde_json::json!({
            "fingerprint": fingerprint.as_str(),
            "processed": true,
            "artifact_path": artifact_path,
            "artifact_count": artifact_count,
        }),
        CacheResolution::NotProcessed => serde_json::json!({
            "fingerprint": fingerprint.as_str(),
            "processed": false,
        }),
    };

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn print_plain(resolution: &CacheResolution) {
    // Empty line when not processed, so scripts can test for it
    match resolution.artifact_path() {
        Some(path) => println!("{}", path.display()),
        None => println!(),
    }
}

fn print_table(fingerprint: &Fingerprint, resolution: &CacheResolution, config: &Config) {
    let ctx = UiContext::detect();
    ui::cache_resolution(&ctx, fingerprint.as_str(), resolution);

    if let (CacheResolution::NotProcessed, Some(root)) = (resolution, &config.cache.output_root) {
        let target = artifact_dir(root, &config.cache.output_dir, fingerprint.as_str());
        ui::field(&ctx, "target", &target.display().to_string());
    }
}
