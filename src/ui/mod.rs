//! Terminal output for the reelstate CLI
//!
//! Uses `cliclack` log lines in an interactive terminal and falls back to
//! plain tagged lines when piped or running in CI.

mod context;
mod output;

pub use context::UiContext;
pub use output::{batch_item, cache_resolution, count_noun, field, status, status_hint, Tone};
