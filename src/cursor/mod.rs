//! Durable round-robin cursors for batch jobs
//!
//! Lets a stateless "process the next item" call walk an ordered sequence
//! one item per invocation, resuming where the last invocation stopped, even
//! across process restarts. Each cursor is keyed by a label and bound to the
//! identity of the sequence it walks: the source path plus the filter
//! pattern. When either changes, the cursor starts over at 0.
//!
//! # Cursor States
//!
//! | State | Trigger | Effect |
//! |-------|---------|--------|
//! | Fresh | No identity stored for the label | Identity stored, position 0 |
//! | Reset | Stored identity differs | Identity replaced, position 0 |
//! | Tracking | Stored identity matches | Stored position used |
//!
//! Identity and position are written in a single persisted update, so a
//! reset is never half-applied on disk.
//!
//! # Layout
//!
//! Three namespaces keyed by label:
//!
//! ```json
//! {
//!   "Batch Counters": { "Batch 001": 2 },
//!   "Batch Paths":    { "Batch 001": "/data/frames" },
//!   "Batch Patterns": { "Batch 001": "*.png" }
//! }
//! ```

use crate::error::{ReelError, ReelResult};
use crate::store::{KeyValueStore, Namespace};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::{debug, info};

/// Next position to serve, per label
pub const COUNTERS: Namespace<'static> = Namespace::Named("Batch Counters");
/// Source path of the sequence, per label
pub const PATHS: Namespace<'static> = Namespace::Named("Batch Paths");
/// Filter pattern of the sequence, per label
pub const PATTERNS: Namespace<'static> = Namespace::Named("Batch Patterns");

/// What a sequence is: where it comes from and how it is filtered
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceIdentity {
    pub source_path: String,
    pub pattern: String,
}

impl SequenceIdentity {
    pub fn new(source_path: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            pattern: pattern.into(),
        }
    }
}

/// Persisted cursor for one label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CursorState {
    pub label: String,
    pub source_path: String,
    pub pattern: String,
    pub position: u64,
}

/// How a call found the cursor before using it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorPhase {
    Fresh,
    Reset,
    Tracking,
}

impl fmt::Display for CursorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fresh => write!(f, "fresh"),
            Self::Reset => write!(f, "reset"),
            Self::Tracking => write!(f, "tracking"),
        }
    }
}

/// Whether an orchestrator may serve a memoized result instead of calling
/// an operation again with equal inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReevaluationPolicy {
    /// Equal inputs give equal results
    Memoizable,
    /// The operation has effects on every call and must always run
    EveryCall,
}

impl ReevaluationPolicy {
    pub fn is_cacheable(&self) -> bool {
        matches!(self, Self::Memoizable)
    }
}

/// Cursor view over a store
pub struct CursorStore<'s, S: KeyValueStore> {
    store: &'s mut S,
}

impl<'s, S: KeyValueStore> CursorStore<'s, S> {
    pub fn new(store: &'s mut S) -> Self {
        Self { store }
    }

    /// Every call advances the cursor, so results must never be memoized
    pub fn force_reevaluation_marker() -> ReevaluationPolicy {
        ReevaluationPolicy::EveryCall
    }

    /// Index to use for this call, advancing the stored cursor
    ///
    /// Walks `0, 1, .., sequence_length - 1, 0, 1, ..` for a stable identity
    /// and restarts at 0 when `source_path` or `pattern` differ from what was
    /// stored for `label`. An empty sequence is an error; the identity is
    /// still recorded first.
    pub fn next_index(
        &mut self,
        label: &str,
        source_path: &str,
        pattern: &str,
        sequence_length: usize,
    ) -> ReelResult<usize> {
        let (phase, position) = self.sync_identity(label, source_path, pattern);

        if sequence_length == 0 {
            return Err(ReelError::EmptySequence {
                label: label.to_string(),
            });
        }

        let index = usize::try_from(position)
            .ok()
            .filter(|&p| p < sequence_length)
            .unwrap_or(0);
        let next = (index + 1) % sequence_length;

        self.store.put(COUNTERS, label, Value::from(next as u64));
        debug!(
            "{} cursor {} -> {} of {} ({})",
            label, index, next, sequence_length, phase
        );

        Ok(index)
    }

    /// Stored position for `label`, without advancing it
    pub fn peek_index(&self, label: &str) -> Option<u64> {
        if !self.store.key_exists(COUNTERS, label) {
            return None;
        }
        Some(self.stored_position(label))
    }

    /// Full stored state for `label`
    pub fn state(&self, label: &str) -> Option<CursorState> {
        let identity = self.stored_identity(label)?;
        Some(CursorState {
            label: label.to_string(),
            source_path: identity.source_path,
            pattern: identity.pattern,
            position: self.stored_position(label),
        })
    }

    /// Labels with a stored cursor
    pub fn labels(&self) -> Vec<String> {
        let mut labels = self.store.keys(COUNTERS);
        for label in self.store.keys(PATHS) {
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        labels.sort();
        labels
    }

    /// Rewind a cursor to 0, keeping its identity
    pub fn reset(&mut self, label: &str) -> bool {
        if !self.store.key_exists(COUNTERS, label) {
            return false;
        }
        self.store.put(COUNTERS, label, Value::from(0u64));
        info!("{} - cursor rewound to 0", label);
        true
    }

    /// Bring the stored identity in line with the caller's, returning the
    /// phase found and the position to start from
    fn sync_identity(&mut self, label: &str, source_path: &str, pattern: &str) -> (CursorPhase, u64) {
        let requested = SequenceIdentity::new(source_path, pattern);

        let phase = match self.stored_identity(label) {
            None => CursorPhase::Fresh,
            Some(stored) if stored != requested => CursorPhase::Reset,
            Some(_) => CursorPhase::Tracking,
        };

        match phase {
            CursorPhase::Tracking => (phase, self.stored_position(label)),
            CursorPhase::Fresh | CursorPhase::Reset => {
                self.store.put_many(vec![
                    (COUNTERS, label, Value::from(0u64)),
                    (PATHS, label, Value::from(source_path)),
                    (PATTERNS, label, Value::from(pattern)),
                ]);

                if phase == CursorPhase::Reset {
                    info!("{} - path or pattern changed, resetting counter", label);
                } else {
                    debug!("{} - new cursor over {} ({})", label, source_path, pattern);
                }
                (phase, 0)
            }
        }
    }

    fn stored_identity(&self, label: &str) -> Option<SequenceIdentity> {
        let source_path = self.store.get_str(PATHS, label)?;
        let pattern = self.store.get_str(PATTERNS, label)?;
        Some(SequenceIdentity::new(source_path, pattern))
    }

    fn stored_position(&self, label: &str) -> u64 {
        self.store.get_u64(COUNTERS, label).unwrap_or(0)
    }
}
