//! CLI argument definitions using clap derive

use crate::batch::MediaKind;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// reelstate - processing cache and batch cursors for media pipelines
///
/// Remembers which source files were already processed and walks media
/// directories one item per invocation.
#[derive(Parser, Debug)]
#[command(name = "reelstate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "REELSTATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding the state files
    #[arg(long, global = true, env = "REELSTATE_STATE_DIR")]
    pub state_dir: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the content fingerprint of a file
    Fingerprint(FingerprintArgs),

    /// Check whether a file was already processed
    Check(CheckArgs),

    /// Record the artifact directory produced from a file
    Mark(MarkArgs),

    /// Inspect and maintain the processed-content cache
    Cache(CacheArgs),

    /// Walk media directories one item per call
    Batch(BatchArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),
}

/// Arguments for the fingerprint command
#[derive(Parser, Debug)]
pub struct FingerprintArgs {
    /// File to fingerprint
    pub file: PathBuf,
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Source file to look up
    pub file: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the mark command
#[derive(Parser, Debug)]
pub struct MarkArgs {
    /// Source file the artifacts were produced from
    pub file: PathBuf,

    /// Directory holding the produced artifacts
    pub artifact_dir: PathBuf,
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Subcommand for cache
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// List recorded entries
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Remove one entry
    Forget {
        /// Fingerprint of the entry
        fingerprint: String,
    },

    /// Verify every entry and drop the stale ones
    Prune,
}

/// Arguments for the batch command
#[derive(Parser, Debug)]
pub struct BatchArgs {
    /// Subcommand for batch
    #[command(subcommand)]
    pub action: BatchAction,
}

/// Batch subcommands
#[derive(Subcommand, Debug)]
pub enum BatchAction {
    /// Serve the next item of a batch and advance its cursor
    Next {
        /// Label tracking this batch's progress
        label: String,

        /// Directory holding the media files
        dir: PathBuf,

        /// Glob pattern filtering the directory (default: from config)
        #[arg(short, long)]
        pattern: Option<String>,

        /// Kind of media in the batch
        #[arg(short, long, default_value = "image")]
        kind: BatchKind,

        /// Output format
        #[arg(short, long, default_value = "plain")]
        format: OutputFormat,
    },

    /// Serve the item at a fixed index without touching any cursor
    At {
        /// Directory holding the media files
        dir: PathBuf,

        /// Zero-based index into the sorted batch
        index: usize,

        /// Glob pattern filtering the directory (default: from config)
        #[arg(short, long)]
        pattern: Option<String>,

        /// Kind of media in the batch
        #[arg(short, long, default_value = "image")]
        kind: BatchKind,
    },

    /// Show the stored cursor position without advancing it
    Peek {
        /// Batch label
        label: String,

        /// Kind of media in the batch
        #[arg(short, long, default_value = "image")]
        kind: BatchKind,
    },

    /// List stored cursors
    List {
        /// Kind of media in the batch
        #[arg(short, long, default_value = "image")]
        kind: BatchKind,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Rewind a cursor to the first item
    Reset {
        /// Batch label
        label: String,

        /// Kind of media in the batch
        #[arg(short, long, default_value = "image")]
        kind: BatchKind,
    },
}

/// Media kind selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BatchKind {
    /// Still images (png, jpg, webp, ...)
    Image,
    /// Videos (mp4, mkv, mov, ...)
    Video,
}

impl From<BatchKind> for MediaKind {
    fn from(kind: BatchKind) -> Self {
        match kind {
            BatchKind::Image => MediaKind::Image,
            BatchKind::Video => MediaKind::Video,
        }
    }
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format for listing commands
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_check() {
        let cli = Cli::parse_from(["reelstate", "check", "clip.mp4", "--format", "json"]);
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.file, PathBuf::from("clip.mp4"));
                assert!(matches!(args.format, OutputFormat::Json));
            }
            _ => panic!("expected Check command"),
        }
    }

    #[test]
    fn cli_parses_batch_next() {
        let cli = Cli::parse_from([
            "reelstate",
            "batch",
            "next",
            "Batch 001",
            "/frames",
            "--pattern",
            "*.png",
            "--kind",
            "video",
        ]);
        match cli.command {
            Commands::Batch(BatchArgs {
                action:
                    BatchAction::Next {
                        label,
                        dir,
                        pattern,
                        kind,
                        format,
                    },
            }) => {
                assert_eq!(label, "Batch 001");
                assert_eq!(dir, PathBuf::from("/frames"));
                assert_eq!(pattern.as_deref(), Some("*.png"));
                assert_eq!(kind, BatchKind::Video);
                assert!(matches!(format, OutputFormat::Plain));
            }
            _ => panic!("expected batch next"),
        }
    }

    #[test]
    fn cli_batch_kind_defaults_to_image() {
        let cli = Cli::parse_from(["reelstate", "batch", "peek", "L"]);
        match cli.command {
            Commands::Batch(BatchArgs {
                action: BatchAction::Peek { kind, .. },
            }) => assert_eq!(MediaKind::from(kind), MediaKind::Image),
            _ => panic!("expected batch peek"),
        }
    }

    #[test]
    fn cli_parses_cache_prune() {
        let cli = Cli::parse_from(["reelstate", "cache", "prune"]);
        assert!(matches!(
            cli.command,
            Commands::Cache(CacheArgs {
                action: CacheAction::Prune
            })
        ));
    }

    #[test]
    fn cli_state_dir_is_global() {
        let cli = Cli::parse_from(["reelstate", "cache", "list", "--state-dir", "/tmp/state"]);
        assert_eq!(cli.state_dir, Some(PathBuf::from("/tmp/state")));
    }

    #[test]
    fn cli_verbose_levels() {
        let cli = Cli::parse_from(["reelstate", "config"]);
        assert_eq!(cli.verbose, 0);

        let cli = Cli::parse_from(["reelstate", "-v", "config"]);
        assert_eq!(cli.verbose, 1);

        let cli = Cli::parse_from(["reelstate", "-vv", "config"]);
        assert_eq!(cli.verbose, 2);
    }
}
