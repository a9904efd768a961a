//! The timeline: an ordered, deduplicated list of timed comments.

use std::collections::HashSet;

use crate::extract::display_to_seconds;

/// Where a timeline entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Scraped from the page's comment section.
    Scraped,
    /// Built-in sample shown when scraping found nothing.
    Sample,
}

/// One comment pinned to a moment in the video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedComment {
    pub author: String,
    pub content: String,
    /// Human-readable offset, e.g. `1:23` or `1:02:03`.
    pub timestamp: String,
    /// Canonical offset from video start.
    pub seconds: u32,
    pub origin: Origin,
}

/// The derived timeline. Exclusively owned by the collector; renderers only
/// ever see cloned snapshots.
#[derive(Debug, Default)]
pub struct TimelineList {
    entries: Vec<TimedComment>,
}

impl TimelineList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole list with the comments from one parse pass.
    ///
    /// The incoming batch is deduplicated on `(seconds, content, author)`
    /// keeping the first occurrence, then stable-sorted ascending by seconds
    /// so that ties keep their DOM scan order. An empty result falls back to
    /// the fixed sample set; that is a placeholder, not an error.
    pub fn replace(&mut self, comments: Vec<TimedComment>) {
        let mut seen: HashSet<(u32, String, String)> = HashSet::new();
        let mut deduped: Vec<TimedComment> = Vec::new();
        for comment in comments {
            let key = (
                comment.seconds,
                comment.content.clone(),
                comment.author.clone(),
            );
            if seen.insert(key) {
                deduped.push(comment);
            }
        }
        deduped.sort_by_key(|c| c.seconds);

        if deduped.is_empty() {
            deduped = sample_comments();
        }
        self.entries = deduped;
    }

    pub fn snapshot(&self) -> Vec<TimedComment> {
        self.entries.clone()
    }

    pub fn get(&self, index: usize) -> Option<&TimedComment> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_sample(&self) -> bool {
        self.entries.iter().all(|c| c.origin == Origin::Sample) && !self.entries.is_empty()
    }
}

/// The fixed sample set used when a pass produces nothing.
pub fn sample_comments() -> Vec<TimedComment> {
    let samples = [
        ("0:30", "여기가 시작 부분이에요!", "샘플유저1"),
        ("1:15", "이 부분 중요해요 1:15", "샘플유저2"),
        ("2:45", "2:45에 핵심 내용이 나와요", "샘플유저3"),
    ];
    samples
        .into_iter()
        .map(|(timestamp, content, author)| TimedComment {
            author: author.to_string(),
            content: content.to_string(),
            timestamp: timestamp.to_string(),
            seconds: display_to_seconds(timestamp).unwrap_or(0),
            origin: Origin::Sample,
        })
        .collect()
}
