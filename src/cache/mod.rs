//! Content-addressed processing cache
//!
//! Remembers which content has already been turned into artifacts, keyed by
//! a truncated SHA-256 fingerprint of the source file. The filesystem is the
//! ground truth: a recorded entry is re-validated on every `resolve` and
//! dropped when its artifacts have gone.
//!
//! # Entry States
//!
//! | State | `resolve` | Store |
//! |-------|-----------|-------|
//! | Unknown | NotProcessed | untouched |
//! | Live (dir with >= 1 artifact) | Processed | untouched |
//! | Stale (missing, not a dir, no artifacts) | NotProcessed | entry removed |

pub mod fingerprint;
pub mod processed;

pub use fingerprint::{Fingerprint, FINGERPRINT_LEN};
pub use processed::{
    artifact_dir, count_artifacts, CacheEntry, CacheResolution, ContentCache,
    DEFAULT_ARTIFACT_EXTENSIONS,
};
