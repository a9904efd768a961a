//! Playback control: seeking, nudging and position-based highlighting.
//!
//! Media is a capability: when no surface is present every action is a
//! no-op. Actions are fire-and-forget; a failed seek is reported once and
//! never retried.

use std::sync::Mutex;

use crate::timeline::TimedComment;

/// Entries within this many seconds of the playback position count as
/// "currently playing".
pub const HIGHLIGHT_WINDOW_SECS: f64 = 3.0;
/// Fine-adjustment step for the back/forward nudge.
pub const NUDGE_SECS: f64 = 2.0;

/// Read/write access to the page's playback position.
pub trait MediaSurface: Send + Sync {
    /// Current position in seconds, `None` when no media is present.
    fn position(&self) -> Option<f64>;
    /// Move playback. Returns `false` when no media is present.
    fn seek(&self, seconds: f64) -> bool;
}

/// In-memory media surface used by fixtures and tests.
#[derive(Debug, Default)]
pub struct SharedMedia {
    position: Mutex<Option<f64>>,
}

impl SharedMedia {
    pub fn new(position: Option<f64>) -> Self {
        SharedMedia {
            position: Mutex::new(position),
        }
    }

    pub fn absent() -> Self {
        Self::new(None)
    }
}

impl MediaSurface for SharedMedia {
    fn position(&self) -> Option<f64> {
        *self.position.lock().expect("media lock poisoned")
    }

    fn seek(&self, seconds: f64) -> bool {
        let mut position = self.position.lock().expect("media lock poisoned");
        match position.as_mut() {
            Some(current) => {
                *current = seconds;
                true
            }
            None => false,
        }
    }
}

/// Target position for a ±nudge, clamped at the start of the video.
pub fn nudge_target(current: f64, delta: f64) -> f64 {
    (current + delta).max(0.0)
}

/// Indices of entries within [`HIGHLIGHT_WINDOW_SECS`] of `position`.
/// Purely derived; recomputed on every call.
pub fn highlighted_indices(comments: &[TimedComment], position: f64) -> Vec<usize> {
    comments
        .iter()
        .enumerate()
        .filter(|(_, comment)| (position - f64::from(comment.seconds)).abs() < HIGHLIGHT_WINDOW_SECS)
        .map(|(index, _)| index)
        .collect()
}
