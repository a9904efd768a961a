use crate::diag::{PassStats, SessionStats};
use crate::extract::TimeOffset;
use crate::timeline::TimedComment;

/// What a command produced, handed to the reporter after dispatch.
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
    pub error_count: usize,
    pub exit_on_errors: bool,
}

#[derive(Debug)]
pub enum CommandSummary {
    Init(InitSummary),
    Extract(ExtractSummary),
    Scan(ScanSummary),
    Watch(WatchSummary),
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
}

/// One scanned input text and the offsets found in it.
#[derive(Debug)]
pub struct ExtractedLine {
    pub text: String,
    pub offsets: Vec<TimeOffset>,
}

#[derive(Debug)]
pub struct ExtractSummary {
    pub lines: Vec<ExtractedLine>,
}

#[derive(Debug)]
pub enum SeekOutcome {
    Sought { index: usize, seconds: f64 },
    Failed { notice: String },
}

#[derive(Debug)]
pub struct ScanSummary {
    pub comments: Vec<TimedComment>,
    pub stats: PassStats,
    /// Playback position the highlight was computed against, if any.
    pub position: Option<f64>,
    pub highlighted: Vec<usize>,
    pub seek: Option<SeekOutcome>,
    pub sample: bool,
}

#[derive(Debug)]
pub struct WatchSummary {
    pub duration_ms: u64,
    pub stats: SessionStats,
    pub comments: Vec<TimedComment>,
    pub sample: bool,
}
