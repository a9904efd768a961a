//! The collector session.
//!
//! One session exists per watched page: created on navigation to a video
//! page, torn down on navigation away. It owns the compiled selectors, the
//! page and media capabilities, the timeline and the statistics; everything
//! downstream (scheduler, CLI reports) goes through it.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};

use crate::collect::pass::{PassOutcome, run_parse_pass};
use crate::config::{Config, SelectorSet};
use crate::diag::{Failure, PassStats, SessionStats};
use crate::dom::{NodeId, PageDom};
use crate::playback::{self, MediaSurface, NUDGE_SECS};
use crate::timeline::{TimedComment, TimelineList};

/// Discovery phase. Once `Observing` is reached the session never goes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorState {
    /// Still probing for a comment section container.
    Searching,
    /// Containers found and under mutation observation.
    Observing,
}

/// Snapshot handed to a pass listener after every pass.
#[derive(Debug, Clone)]
pub struct PassReport {
    pub number: usize,
    pub comments: Vec<TimedComment>,
    pub stats: PassStats,
}

type PassListener = Box<dyn Fn(&PassReport) + Send + Sync>;

pub struct CollectorSession {
    selectors: SelectorSet,
    dom: Arc<dyn PageDom>,
    media: Arc<dyn MediaSurface>,
    timeline: Mutex<TimelineList>,
    state: Mutex<CollectorState>,
    stats: Mutex<SessionStats>,
    on_pass: Option<PassListener>,
}

impl CollectorSession {
    pub fn new(
        config: &Config,
        dom: Arc<dyn PageDom>,
        media: Arc<dyn MediaSurface>,
    ) -> Result<Self> {
        Ok(CollectorSession {
            selectors: config.compile()?,
            dom,
            media,
            timeline: Mutex::new(TimelineList::new()),
            state: Mutex::new(CollectorState::Searching),
            stats: Mutex::new(SessionStats::default()),
            on_pass: None,
        })
    }

    /// Register a callback invoked after every completed pass.
    pub fn with_pass_listener(mut self, listener: PassListener) -> Self {
        self.on_pass = Some(listener);
        self
    }

    pub fn dom(&self) -> &Arc<dyn PageDom> {
        &self.dom
    }

    pub fn selectors(&self) -> &SelectorSet {
        &self.selectors
    }

    pub fn state(&self) -> CollectorState {
        *self.state.lock().expect("state lock poisoned")
    }

    pub(crate) fn set_state(&self, state: CollectorState) {
        *self.state.lock().expect("state lock poisoned") = state;
    }

    /// Containers currently matching the configured selectors, each once.
    pub fn find_containers(&self) -> Vec<NodeId> {
        let mut seen: HashSet<NodeId> = HashSet::new();
        let mut containers = Vec::new();
        for selector in &self.selectors.containers {
            for node in self.dom.query_all(selector) {
                if seen.insert(node) {
                    containers.push(node);
                }
            }
        }
        containers
    }

    /// Run one parse pass and replace the timeline with its result.
    pub fn run_pass(&self) {
        let PassOutcome { comments, stats } = run_parse_pass(self.dom.as_ref(), &self.selectors);
        if comments.is_empty() {
            log::info!("{}", Failure::EmptyResult);
        }

        let report = {
            let mut timeline = self.timeline.lock().expect("timeline lock poisoned");
            timeline.replace(comments);
            let mut session_stats = self.stats.lock().expect("stats lock poisoned");
            session_stats.record_pass(stats);
            PassReport {
                number: session_stats.passes,
                comments: timeline.snapshot(),
                stats,
            }
        };
        log::debug!(
            "pass {}: {} entries ({} scanned, {} skipped)",
            report.number,
            report.comments.len(),
            report.stats.scanned,
            report.stats.skipped
        );
        if let Some(listener) = &self.on_pass {
            listener(&report);
        }
    }

    pub fn snapshot(&self) -> Vec<TimedComment> {
        self.timeline.lock().expect("timeline lock poisoned").snapshot()
    }

    pub fn is_sample(&self) -> bool {
        self.timeline.lock().expect("timeline lock poisoned").is_sample()
    }

    pub fn stats(&self) -> SessionStats {
        self.stats.lock().expect("stats lock poisoned").clone()
    }

    /// Seek playback to the given timeline entry. Returns the target
    /// position.
    pub fn jump_to_entry(&self, index: usize) -> Result<f64> {
        let target = {
            let timeline = self.timeline.lock().expect("timeline lock poisoned");
            let entry = timeline
                .get(index)
                .with_context(|| format!("no timeline entry at index {index}"))?;
            f64::from(entry.seconds)
        };
        self.seek_or_notice(target, "seek")
    }

    pub fn nudge_back(&self) -> Result<f64> {
        self.nudge(-NUDGE_SECS)
    }

    pub fn nudge_forward(&self) -> Result<f64> {
        self.nudge(NUDGE_SECS)
    }

    fn nudge(&self, delta: f64) -> Result<f64> {
        let Some(current) = self.media.position() else {
            return Err(self.action_failed("nudge"));
        };
        self.seek_or_notice(playback::nudge_target(current, delta), "nudge")
    }

    fn seek_or_notice(&self, target: f64, action: &str) -> Result<f64> {
        if self.media.seek(target) {
            Ok(target)
        } else {
            Err(self.action_failed(action))
        }
    }

    /// Indices of timeline entries near the current playback position.
    /// Empty when no media is present.
    pub fn highlight(&self) -> Vec<usize> {
        match self.media.position() {
            Some(position) => {
                let timeline = self.timeline.lock().expect("timeline lock poisoned");
                playback::highlighted_indices(&timeline.snapshot(), position)
            }
            None => Vec::new(),
        }
    }

    fn action_failed(&self, action: &str) -> anyhow::Error {
        let failure = Failure::ActionFailed {
            action: action.to_string(),
        };
        self.stats
            .lock()
            .expect("stats lock poisoned")
            .record_notice(&failure);
        anyhow::anyhow!("{failure}")
    }
}

/// Build a session directly from a parsed fixture.
pub fn session_from_fixture(
    config: &Config,
    fixture: &crate::dom::fixture::Fixture,
) -> Result<(CollectorSession, Arc<crate::dom::fixture::FixtureDom>)> {
    let dom = fixture.dom();
    let media: Arc<dyn MediaSurface> = if fixture.media.present {
        Arc::new(crate::playback::SharedMedia::new(Some(fixture.media.position_secs)))
    } else {
        Arc::new(crate::playback::SharedMedia::absent())
    };
    let session = CollectorSession::new(config, dom.clone(), media)?;
    Ok((session, dom))
}
