//! Cache command - inspect and maintain the processed-content cache

use crate::cache::{CacheEntry, ContentCache};
use crate::cli::args::{CacheAction, CacheArgs, OutputFormat};
use crate::config::{Config, StatePaths};
use crate::error::ReelResult;
use crate::store::JsonStore;
use crate::ui::{self, Tone, UiContext};
use console::style;

/// Execute the cache command
pub fn execute(args: CacheArgs, config: &Config, paths: &StatePaths) -> ReelResult<()> {
    let mut store = JsonStore::open(&paths.processed);
    let mut cache =
        ContentCache::new(&mut store).with_extensions(config.cache.artifact_extensions.clone());

    match args.action {
        CacheAction::List { format } => list_entries(&cache.entries(), format),
        CacheAction::Forget { fingerprint } => {
            forget_entry(&mut cache, &fingerprint);
            Ok(())
        }
        CacheAction::Prune => {
            prune_entries(&mut cache);
            Ok(())
        }
    }
}

fn list_entries(entries: &[CacheEntry], format: OutputFormat) -> ReelResult<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(entries)?),
        OutputFormat::Plain => {
            for entry in entries {
                println!("{}\t{}", entry.fingerprint, entry.artifact_path.display());
            }
        }
        OutputFormat::Table => print_table(entries),
    }
    Ok(())
}

fn print_table(entries: &[CacheEntry]) {
    if entries.is_empty() {
        let ctx = UiContext::detect();
        ui::status(&ctx, Tone::Info, "No processed content recorded");
        return;
    }

    println!(
        "{:<18} {}",
        style("FINGERPRINT").bold(),
        style("ARTIFACTS").bold()
    );
    println!("{}", "-".repeat(60));

    for entry in entries {
        let path = if entry.artifact_path.is_dir() {
            style(entry.artifact_path.display().to_string())
        } else {
            style(entry.artifact_path.display().to_string()).dim()
        };
        println!("{:<18} {}", entry.fingerprint, path);
    }

    println!();
    println!("Total: {}", ui::count_noun(entries.len(), "entry", "entries"));
}

fn forget_entry(cache: &mut ContentCache<'_, JsonStore>, fingerprint: &str) {
    let ctx = UiContext::detect();

    if cache.forget(fingerprint) {
        ui::status(&ctx, Tone::Done, &format!("Forgot {}", fingerprint));
    } else {
        ui::status(&ctx, Tone::Warn, &format!("No entry for {}", fingerprint));
    }
}

fn prune_entries(cache: &mut ContentCache<'_, JsonStore>) {
    let ctx = UiContext::detect();
    let removed = cache.prune();

    if removed == 0 {
        ui::status(&ctx, Tone::Done, "All cache entries are live");
    } else {
        let removed = ui::count_noun(removed, "stale entry", "stale entries");
        ui::status(&ctx, Tone::Done, &format!("Removed {}", removed));
    }
}
