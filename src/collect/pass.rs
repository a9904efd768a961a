//! A single parse pass over the page.

use std::collections::HashSet;

use crate::config::SelectorSet;
use crate::diag::{Failure, PassStats};
use crate::dom::selector::Selector;
use crate::dom::{NodeId, PageDom};
use crate::extract::extract_all;
use crate::timeline::{Origin, TimedComment};

/// Everything one pass produced.
#[derive(Debug)]
pub struct PassOutcome {
    pub comments: Vec<TimedComment>,
    pub stats: PassStats,
}

/// Scan the page once and return every timed comment found.
///
/// Candidate nodes are the union of all configured comment selectors, in
/// selector order, each node once. A node that fails to resolve is logged
/// and skipped; a pass never aborts. Comments without any recognizable
/// timestamp are counted but produce no entries.
pub fn run_parse_pass(dom: &dyn PageDom, selectors: &SelectorSet) -> PassOutcome {
    let mut seen_nodes: HashSet<NodeId> = HashSet::new();
    let mut nodes: Vec<NodeId> = Vec::new();
    for selector in &selectors.comments {
        for node in dom.query_all(selector) {
            if seen_nodes.insert(node) {
                nodes.push(node);
            }
        }
    }

    let mut stats = PassStats {
        scanned: nodes.len(),
        ..PassStats::default()
    };
    let mut processed: HashSet<(String, String)> = HashSet::new();
    let mut comments: Vec<TimedComment> = Vec::new();

    for node in nodes {
        let Some((content, author)) = resolve_pair(dom, selectors, node) else {
            log::debug!(
                "{}",
                Failure::NodeSkipped {
                    reason: "no content/author pair".to_string()
                }
            );
            stats.skipped += 1;
            continue;
        };
        stats.resolved += 1;

        let author = author.trim().to_string();
        let content = content.trim().to_string();
        if !processed.insert((author.clone(), content.clone())) {
            continue;
        }

        let offsets = extract_all(&content);
        if offsets.is_empty() {
            stats.without_timestamps += 1;
            continue;
        }
        for offset in offsets {
            comments.push(TimedComment {
                author: author.clone(),
                content: content.clone(),
                timestamp: offset.display,
                seconds: offset.seconds,
                origin: Origin::Scraped,
            });
        }
    }

    PassOutcome { comments, stats }
}

/// Shape dispatch: a candidate node is either a whole thread, a single
/// comment renderer, or a bare content node whose author lives on an
/// enclosing renderer. Both sides must resolve or the node is dropped.
fn resolve_pair(
    dom: &dyn PageDom,
    selectors: &SelectorSet,
    node: NodeId,
) -> Option<(String, String)> {
    if matches_any(dom, node, &selectors.threads) || matches_any(dom, node, &selectors.leaves) {
        let content = dom.query_within(node, &selectors.content).first().copied()?;
        let author = dom.query_within(node, &selectors.author).first().copied()?;
        return Some((dom.text_content(content), dom.text_content(author)));
    }

    if dom.matches(node, &selectors.content) {
        let renderer = closest_any(dom, node, &selectors.leaves)
            .or_else(|| closest_any(dom, node, &selectors.threads))?;
        let author = dom.query_within(renderer, &selectors.author).first().copied()?;
        return Some((dom.text_content(node), dom.text_content(author)));
    }

    None
}

fn matches_any(dom: &dyn PageDom, node: NodeId, selectors: &[Selector]) -> bool {
    selectors.iter().any(|s| dom.matches(node, s))
}

fn closest_any(dom: &dyn PageDom, node: NodeId, selectors: &[Selector]) -> Option<NodeId> {
    selectors.iter().find_map(|s| dom.closest(node, s))
}
