//! Failure taxonomy and pass statistics.
//!
//! Nothing in the pipeline is fatal. Every failure degrades to "feature
//! inactive": absent page structure is retried, a broken node is skipped, an
//! empty result falls back to samples, and a failed external action is
//! reported once and dropped.

use std::fmt;

/// How a failure is handled, not just what went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// Expected page structure not there yet. Retried on a timer, never
    /// surfaced to the user.
    TransientAbsence { what: String },
    /// One comment node could not be resolved. Logged, counted, skipped;
    /// the pass continues.
    NodeSkipped { reason: String },
    /// A pass produced no comments. The sample fallback takes over.
    EmptyResult,
    /// An external action (seek, nudge) could not complete. Reported to the
    /// user once; the operation is aborted without retry.
    ActionFailed { action: String },
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::TransientAbsence { what } => write!(f, "{what} not found yet, retrying"),
            Failure::NodeSkipped { reason } => write!(f, "comment node skipped: {reason}"),
            Failure::EmptyResult => write!(f, "no comments found, showing samples"),
            Failure::ActionFailed { action } => write!(f, "{action} unavailable: no media on this page"),
        }
    }
}

/// Counters for a single parse pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Candidate nodes matched by the comment selectors.
    pub scanned: usize,
    /// Nodes that resolved to a (content, author) pair.
    pub resolved: usize,
    /// Nodes dropped by a per-node failure.
    pub skipped: usize,
    /// Resolved comments carrying no recognizable timestamp.
    pub without_timestamps: usize,
}

/// Accumulated over the lifetime of a collector session.
#[derive(Debug, Clone, Default)]
pub struct SessionStats {
    pub passes: usize,
    pub last_pass: PassStats,
    pub total_skipped: usize,
    /// User-facing notices, recorded once per failed action.
    pub notices: Vec<String>,
}

impl SessionStats {
    pub fn record_pass(&mut self, stats: PassStats) {
        self.passes += 1;
        self.total_skipped += stats.skipped;
        self.last_pass = stats;
    }

    pub fn record_notice(&mut self, failure: &Failure) {
        self.notices.push(failure.to_string());
    }
}
