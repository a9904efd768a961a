//! Fixture-backed [`PageDom`] implementation.
//!
//! A fixture file is a JSON snapshot of a page plus a script of timed
//! events: subtree insertions (what a mutation observer would see on the
//! live page) and scroll movements. Driving the script against a
//! [`FixtureDom`] exercises the full collector pipeline without a browser.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::time::{Duration, sleep};

use crate::dom::selector::Selector;
use crate::dom::{
    Document, MutationBatch, MutationCallback, Node, NodeId, PageDom, ScrollCallback, ScrollState,
};

fn default_tag() -> String {
    "div".to_string()
}

fn default_viewport_height() -> f64 {
    800.0
}

fn default_media_present() -> bool {
    true
}

/// One element in a fixture page snapshot.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpec {
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub attrs: std::collections::HashMap<String, String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub top: Option<f64>,
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

/// A scheduled page event. Exactly one of `append_to`+`node` or `scroll_to`
/// is expected; an event with neither is ignored with a warning.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSpec {
    pub at_ms: u64,
    #[serde(default)]
    pub append_to: Option<String>,
    #[serde(default)]
    pub node: Option<NodeSpec>,
    #[serde(default)]
    pub scroll_to: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaSpec {
    #[serde(default = "default_media_present")]
    pub present: bool,
    #[serde(default)]
    pub position_secs: f64,
}

impl Default for MediaSpec {
    fn default() -> Self {
        MediaSpec {
            present: true,
            position_secs: 0.0,
        }
    }
}

/// A parsed fixture file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    pub page: NodeSpec,
    #[serde(default)]
    pub events: Vec<EventSpec>,
    #[serde(default)]
    pub media: MediaSpec,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f64,
}

impl Fixture {
    pub fn load(path: &Path) -> Result<Fixture> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture file: {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse fixture file: {}", path.display()))
    }

    /// Build the initial page state. Events are not applied; see
    /// [`FixtureDom::run_script`].
    pub fn dom(&self) -> Arc<FixtureDom> {
        let mut doc = Document::new();
        insert_spec(&mut doc, None, &self.page);
        Arc::new(FixtureDom {
            doc: Mutex::new(doc),
            scroll: Mutex::new(ScrollState {
                offset: 0.0,
                viewport_height: self.viewport_height,
            }),
            mutation_observers: Mutex::new(Vec::new()),
            scroll_observers: Mutex::new(Vec::new()),
        })
    }
}

fn insert_spec(doc: &mut Document, parent: Option<NodeId>, spec: &NodeSpec) -> NodeId {
    let id = doc.insert(
        parent,
        Node {
            tag: spec.tag.clone(),
            id: spec.id.clone(),
            classes: spec.classes.clone(),
            attrs: spec.attrs.clone(),
            text: spec.text.clone(),
            top: spec.top,
            ..Node::default()
        },
    );
    for child in &spec.children {
        insert_spec(doc, Some(id), child);
    }
    id
}

/// Thread-safe in-memory page.
pub struct FixtureDom {
    doc: Mutex<Document>,
    scroll: Mutex<ScrollState>,
    mutation_observers: Mutex<Vec<(NodeId, MutationCallback)>>,
    scroll_observers: Mutex<Vec<ScrollCallback>>,
}

impl FixtureDom {
    /// Append a subtree under the first node matching `parent_selector` and
    /// notify every mutation observer whose container encloses the insertion
    /// point.
    pub fn append(&self, parent_selector: &Selector, spec: &NodeSpec) -> Result<NodeId> {
        let (added, parent) = {
            let mut doc = self.doc.lock().expect("dom lock poisoned");
            let parent = doc
                .query_all(parent_selector)
                .first()
                .copied()
                .context("append target matched no node")?;
            (insert_spec(&mut doc, Some(parent), spec), parent)
        };

        // The document lock is released before callbacks run; they re-enter
        // the dom for relevance checks.
        let batch = MutationBatch { added: vec![added] };
        let observers = self.mutation_observers.lock().expect("observer lock poisoned");
        for (container, callback) in observers.iter() {
            let enclosed = {
                let doc = self.doc.lock().expect("dom lock poisoned");
                encloses(&doc, *container, parent)
            };
            if enclosed {
                callback(&batch);
            }
        }
        Ok(added)
    }

    /// Move the viewport and notify scroll observers.
    pub fn scroll_to(&self, offset: f64) {
        let state = {
            let mut scroll = self.scroll.lock().expect("scroll lock poisoned");
            scroll.offset = offset;
            *scroll
        };
        let observers = self.scroll_observers.lock().expect("observer lock poisoned");
        for callback in observers.iter() {
            callback(state);
        }
    }

    /// Play the fixture's event script in real (tokio) time.
    pub async fn run_script(&self, events: &[EventSpec]) {
        let mut ordered: Vec<&EventSpec> = events.iter().collect();
        ordered.sort_by_key(|e| e.at_ms);

        let mut elapsed = 0u64;
        for event in ordered {
            if event.at_ms > elapsed {
                sleep(Duration::from_millis(event.at_ms - elapsed)).await;
                elapsed = event.at_ms;
            }
            self.apply(event);
        }
    }

    fn apply(&self, event: &EventSpec) {
        if let Some(offset) = event.scroll_to {
            log::debug!("fixture event at {}ms: scroll to {offset}", event.at_ms);
            self.scroll_to(offset);
            return;
        }
        match (&event.append_to, &event.node) {
            (Some(target), Some(node)) => {
                log::debug!("fixture event at {}ms: append under '{target}'", event.at_ms);
                let result = Selector::parse(target)
                    .and_then(|selector| self.append(&selector, node));
                if let Err(err) = result {
                    log::warn!("fixture event at {}ms skipped: {err:#}", event.at_ms);
                }
            }
            _ => log::warn!("fixture event at {}ms has no effect", event.at_ms),
        }
    }
}

/// Whether `container` is `node` or one of its ancestors.
fn encloses(doc: &Document, container: NodeId, node: NodeId) -> bool {
    let mut current = Some(node);
    while let Some(id) = current {
        if id == container {
            return true;
        }
        current = doc.get(id).parent;
    }
    false
}

impl PageDom for FixtureDom {
    fn query_all(&self, selector: &Selector) -> Vec<NodeId> {
        self.doc.lock().expect("dom lock poisoned").query_all(selector)
    }

    fn query_within(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.doc
            .lock()
            .expect("dom lock poisoned")
            .query_within(scope, selector)
    }

    fn closest(&self, node: NodeId, selector: &Selector) -> Option<NodeId> {
        self.doc.lock().expect("dom lock poisoned").closest(node, selector)
    }

    fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        self.doc.lock().expect("dom lock poisoned").matches(node, selector)
    }

    fn contains_match(&self, node: NodeId, selector: &Selector) -> bool {
        self.doc
            .lock()
            .expect("dom lock poisoned")
            .contains_match(node, selector)
    }

    fn text_content(&self, node: NodeId) -> String {
        self.doc.lock().expect("dom lock poisoned").text_content(node)
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.doc
            .lock()
            .expect("dom lock poisoned")
            .get(node)
            .attrs
            .get(name)
            .cloned()
    }

    fn set_attr(&self, node: NodeId, name: &str, value: &str) {
        let mut doc = self.doc.lock().expect("dom lock poisoned");
        let entry = doc.get_mut(node);
        entry.attrs.insert(name.to_string(), value.to_string());
        if name == "id" {
            entry.id = Some(value.to_string());
        }
    }

    fn observe_mutations(&self, container: NodeId, callback: MutationCallback) {
        self.mutation_observers
            .lock()
            .expect("observer lock poisoned")
            .push((container, callback));
    }

    fn observe_scroll(&self, callback: ScrollCallback) {
        self.scroll_observers
            .lock()
            .expect("observer lock poisoned")
            .push(callback);
    }

    fn scroll_state(&self) -> ScrollState {
        *self.scroll.lock().expect("scroll lock poisoned")
    }

    fn node_top(&self, node: NodeId) -> Option<f64> {
        self.doc.lock().expect("dom lock poisoned").get(node).top
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;

    use crate::dom::fixture::*;

    fn fixture_json(raw: &str) -> Fixture {
        serde_json::from_str(raw).unwrap()
    }

    fn basic_page() -> Fixture {
        fixture_json(
            r#"{
                "page": {
                    "tag": "body",
                    "children": [
                        { "tag": "ytd-comments", "id": "comments", "top": 2000.0 }
                    ]
                }
            }"#,
        )
    }

    #[test]
    fn test_fixture_defaults() {
        let fixture = basic_page();
        assert!(fixture.events.is_empty());
        assert!(fixture.media.present);
        assert_eq!(fixture.viewport_height, 800.0);
        let dom = fixture.dom();
        assert_eq!(dom.scroll_state().offset, 0.0);
    }

    #[test]
    fn test_append_notifies_enclosing_observer() {
        let dom = basic_page().dom();
        let comments = Selector::parse("#comments").unwrap();
        let container = dom.query_all(&comments)[0];

        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hits);
        dom.observe_mutations(
            container,
            Box::new(move |batch| {
                assert_eq!(batch.added.len(), 1);
                seen.fetch_add(1, Ordering::SeqCst);
            }),
        );

        let spec = fixture_json(
            r#"{ "page": { "tag": "ytd-comment-thread-renderer" } }"#,
        )
        .page;
        dom.append(&comments, &spec).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        // Appending outside the observed container stays silent.
        let body = Selector::parse("body").unwrap();
        dom.append(&body, &spec).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_append_to_missing_target_fails() {
        let dom = basic_page().dom();
        let missing = Selector::parse("#nowhere").unwrap();
        let spec = basic_page().page;
        assert!(dom.append(&missing, &spec).is_err());
    }

    #[test]
    fn test_scroll_to_updates_state_and_notifies() {
        let dom = basic_page().dom();
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hits);
        dom.observe_scroll(Box::new(move |state| {
            assert_eq!(state.offset, 1500.0);
            seen.fetch_add(1, Ordering::SeqCst);
        }));
        dom.scroll_to(1500.0);
        assert_eq!(dom.scroll_state().offset, 1500.0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_script_applies_events_in_time_order() {
        let fixture = fixture_json(
            r##"{
                "page": {
                    "tag": "body",
                    "children": [{ "tag": "ytd-comments", "id": "comments" }]
                },
                "events": [
                    { "atMs": 200, "scrollTo": 900.0 },
                    {
                        "atMs": 100,
                        "appendTo": "#comments",
                        "node": { "tag": "ytd-comment-thread-renderer" }
                    }
                ]
            }"##,
        );
        let dom = fixture.dom();
        dom.run_script(&fixture.events).await;

        let threads = Selector::parse("ytd-comment-thread-renderer").unwrap();
        assert_eq!(dom.query_all(&threads).len(), 1);
        assert_eq!(dom.scroll_state().offset, 900.0);
    }
}
