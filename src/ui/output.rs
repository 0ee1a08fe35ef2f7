//! Status lines for command results
//!
//! A status line carries a [`Tone`] and a message, optionally followed by a
//! hint. Interactive terminals get `cliclack` log lines; everything else gets
//! a fixed-width tag so scripts can grep for it.

use super::context::UiContext;
use crate::batch::BatchItem;
use crate::cache::CacheResolution;
use console::style;

/// How a status line should read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Done,
    Warn,
    Info,
}

impl Tone {
    fn tag(self) -> &'static str {
        match self {
            Self::Done => "done",
            Self::Warn => "warn",
            Self::Info => "info",
        }
    }

    fn styled_tag(self) -> String {
        let tag = format!("{:>4}", self.tag());
        match self {
            Self::Done => style(tag).green().to_string(),
            Self::Warn => style(tag).yellow().to_string(),
            Self::Info => style(tag).cyan().to_string(),
        }
    }
}

/// Print a status line
pub fn status(ctx: &UiContext, tone: Tone, message: &str) {
    emit(ctx, tone, message, None);
}

/// Print a status line followed by what to do about it
pub fn status_hint(ctx: &UiContext, tone: Tone, message: &str, hint: &str) {
    emit(ctx, tone, message, Some(hint));
}

/// Print an indented `key: value` line under a status line
pub fn field(ctx: &UiContext, key: &str, value: &str) {
    if ctx.use_fancy_output() {
        println!("  {}: {}", style(key).dim(), value);
    } else {
        println!("{:>6}{}: {}", "", key, value);
    }
}

/// Report what `check` found for a fingerprint
pub fn cache_resolution(ctx: &UiContext, fingerprint: &str, resolution: &CacheResolution) {
    match resolution {
        CacheResolution::Processed { artifact_path, .. } => {
            status(ctx, Tone::Done, &resolution_summary(resolution));
            field(ctx, "fingerprint", fingerprint);
            field(ctx, "artifacts", &artifact_path.display().to_string());
        }
        CacheResolution::NotProcessed => {
            status(ctx, Tone::Info, &resolution_summary(resolution));
            field(ctx, "fingerprint", fingerprint);
        }
    }
}

/// Report the item a cursor just served
pub fn batch_item(ctx: &UiContext, label: &str, item: &BatchItem) {
    status(
        ctx,
        Tone::Done,
        &format!("{} - {} ({}/{})", label, item.filename, item.index + 1, item.total),
    );
    field(ctx, "path", &item.path.display().to_string());
}

/// `1 entry`, `3 entries`
pub fn count_noun(count: usize, singular: &str, plural: &str) -> String {
    format!("{} {}", count, if count == 1 { singular } else { plural })
}

fn resolution_summary(resolution: &CacheResolution) -> String {
    match resolution {
        CacheResolution::Processed { artifact_count, .. } => format!(
            "Already processed, {} live",
            count_noun(*artifact_count, "artifact", "artifacts")
        ),
        CacheResolution::NotProcessed => "Not yet processed".to_string(),
    }
}

fn emit(ctx: &UiContext, tone: Tone, message: &str, hint: Option<&str>) {
    if ctx.use_fancy_output() {
        let text = match hint {
            Some(hint) => format!("{} - {}", message, style(hint).dim()),
            None => message.to_string(),
        };
        let _ = match tone {
            Tone::Done => cliclack::log::success(text),
            Tone::Warn => cliclack::log::warning(text),
            Tone::Info => cliclack::log::info(text),
        };
    } else {
        println!("{}", plain_line(&tone.styled_tag(), message, hint));
    }
}

fn plain_line(tag: &str, message: &str, hint: Option<&str>) -> String {
    match hint {
        Some(hint) => format!("{}  {} ({})", tag, message, hint),
        None => format!("{}  {}", tag, message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn plain_line_layout() {
        let line = plain_line("warn", "No cursor named 'L'", Some("run batch next"));
        assert_eq!(line, "warn  No cursor named 'L' (run batch next)");

        let line = plain_line(Tone::Info.tag(), "Not yet processed", None);
        assert_eq!(line, "info  Not yet processed");
    }

    #[test]
    fn tags_are_aligned() {
        for tone in [Tone::Done, Tone::Warn, Tone::Info] {
            assert_eq!(format!("{:>4}", tone.tag()).len(), 4);
        }
    }

    #[test]
    fn resolution_summaries() {
        let processed = CacheResolution::Processed {
            artifact_path: PathBuf::from("/out/abc"),
            artifact_count: 1,
        };
        assert_eq!(resolution_summary(&processed), "Already processed, 1 live artifact");
        assert_eq!(
            resolution_summary(&CacheResolution::NotProcessed),
            "Not yet processed"
        );
    }

    #[test]
    fn count_noun_plurals() {
        assert_eq!(count_noun(0, "entry", "entries"), "0 entries");
        assert_eq!(count_noun(1, "entry", "entries"), "1 entry");
    }

    #[test]
    fn non_interactive_output() {
        let ctx = UiContext::non_interactive();
        status(&ctx, Tone::Done, "Marked");
        status_hint(&ctx, Tone::Warn, "Empty", "add artifacts");
        field(&ctx, "fingerprint", "abc1234567890def");
    }
}
