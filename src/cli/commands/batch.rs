//! Batch command - walk media directories one item per call

use crate::batch::{BatchItem, BatchLoader, MediaKind};
use crate::cli::args::{BatchAction, BatchArgs, OutputFormat};
use crate::config::{Config, StatePaths};
use crate::cursor::{CursorState, CursorStore};
use crate::error::ReelResult;
use crate::store::JsonStore;
use crate::ui::{self, Tone, UiContext};
use console::style;
use std::path::Path;

/// Execute the batch command
pub fn execute(args: BatchArgs, config: &Config, paths: &StatePaths) -> ReelResult<()> {
    match args.action {
        BatchAction::Next {
            label,
            dir,
            pattern,
            kind,
            format,
        } => {
            let pattern = pattern.unwrap_or_else(|| config.batch.default_pattern.clone());
            next_item(config, paths, kind.into(), &label, &dir, &pattern, format)
        }
        BatchAction::At {
            dir,
            index,
            pattern,
            kind,
        } => {
            let pattern = pattern.unwrap_or_else(|| config.batch.default_pattern.clone());
            item_at(config, paths, kind.into(), &dir, &pattern, index)
        }
        BatchAction::Peek { label, kind } => {
            peek_cursor(paths, kind.into(), &label);
            Ok(())
        }
        BatchAction::List { kind, format } => list_cursors(paths, kind.into(), format),
        BatchAction::Reset { label, kind } => {
            reset_cursor(paths, kind.into(), &label);
            Ok(())
        }
    }
}

fn next_item(
    config: &Config,
    paths: &StatePaths,
    kind: MediaKind,
    label: &str,
    dir: &Path,
    pattern: &str,
    format: OutputFormat,
) -> ReelResult<()> {
    let mut store = JsonStore::open(paths.batches(kind));
    let mut loader =
        BatchLoader::new(&mut store, kind).with_extensions(config.batch.extensions(kind));
    let item = loader.next(label, dir, pattern)?;

    match format {
        OutputFormat::Json => print_item_json(label, &item)?,
        OutputFormat::Plain => println!("{}", item.path.display()),
        OutputFormat::Table => {
            let ctx = UiContext::detect();
            ui::batch_item(&ctx, label, &item);
        }
    }
    Ok(())
}

fn item_at(
    config: &Config,
    paths: &StatePaths,
    kind: MediaKind,
    dir: &Path,
    pattern: &str,
    index: usize,
) -> ReelResult<()> {
    let mut store = JsonStore::open(paths.batches(kind));
    let loader = BatchLoader::new(&mut store, kind).with_extensions(config.batch.extensions(kind));
    let item = loader.item_at(dir, pattern, index)?;
    println!("{}", item.path.display());
    Ok(())
}

fn print_item_json(label: &str, item: &BatchItem) -> ReelResult<()> {
    let value = serde_json::json!({
        "label": label,
        "path": item.path,
        "filename": item.filename,
        "index": item.index,
        "total": item.total,
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn peek_cursor(paths: &StatePaths, kind: MediaKind, label: &str) {
    let mut store = JsonStore::open(paths.batches(kind));
    let cursor = CursorStore::new(&mut store);

    match cursor.peek_index(label) {
        Some(position) => println!("{}", position),
        None => {
            let ctx = UiContext::detect();
            ui::status_hint(
                &ctx,
                Tone::Warn,
                &format!("No {} cursor named '{}'", kind, label),
                "it is created by the first `batch next`",
            );
        }
    }
}

fn list_cursors(paths: &StatePaths, kind: MediaKind, format: OutputFormat) -> ReelResult<()> {
    let mut store = JsonStore::open(paths.batches(kind));
    let cursor = CursorStore::new(&mut store);
    let states: Vec<CursorState> = cursor
        .labels()
        .iter()
        .filter_map(|label| cursor.state(label))
        .collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&states)?),
        OutputFormat::Plain => {
            for state in &states {
                println!("{}\t{}", state.label, state.position);
            }
        }
        OutputFormat::Table => print_table(kind, &states),
    }
    Ok(())
}

fn print_table(kind: MediaKind, states: &[CursorState]) {
    if states.is_empty() {
        let ctx = UiContext::detect();
        ui::status(&ctx, Tone::Info, &format!("No {} cursors stored", kind));
        return;
    }

    println!(
        "{:<20} {:<10} {:<12} {}",
        style("LABEL").bold(),
        style("POSITION").bold(),
        style("PATTERN").bold(),
        style("SOURCE").bold()
    );
    println!("{}", "-".repeat(70));

    for state in states {
        println!(
            "{:<20} {:<10} {:<12} {}",
            state.label, state.position, state.pattern, state.source_path
        );
    }
}

fn reset_cursor(paths: &StatePaths, kind: MediaKind, label: &str) {
    let ctx = UiContext::detect();
    let mut store = JsonStore::open(paths.batches(kind));
    let mut cursor = CursorStore::new(&mut store);

    if cursor.reset(label) {
        ui::status(&ctx, Tone::Done, &format!("Rewound {} cursor '{}'", kind, label));
    } else {
        ui::status(&ctx, Tone::Warn, &format!("No {} cursor named '{}'", kind, label));
    }
}
