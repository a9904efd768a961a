//! The page capability interface.
//!
//! The collector never talks to a concrete page directly; it goes through
//! [`PageDom`], a narrow surface of queries, attribute access, mutation and
//! scroll observation. [`fixture::FixtureDom`] backs that surface with an
//! in-memory node arena loadable from JSON. The page is treated read-mostly:
//! consumers query and mark nodes but never delete or rearrange them.

pub mod fixture;
pub mod selector;

use std::collections::HashMap;

use crate::dom::selector::Selector;

/// Handle into a [`Document`] arena. Ids are never reused; nodes are never
/// removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// One element node.
#[derive(Debug, Clone, Default)]
pub struct Node {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: HashMap<String, String>,
    pub text: Option<String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Layout position of the node's top edge, in pixels from document top.
    pub top: Option<f64>,
}

/// Nodes added to the page since the last notification.
#[derive(Debug, Clone)]
pub struct MutationBatch {
    pub added: Vec<NodeId>,
}

/// Current viewport scroll position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollState {
    /// Pixels scrolled from document top.
    pub offset: f64,
    pub viewport_height: f64,
}

pub type MutationCallback = Box<dyn Fn(&MutationBatch) + Send + Sync>;
pub type ScrollCallback = Box<dyn Fn(ScrollState) + Send + Sync>;

/// What the collector needs from a page.
pub trait PageDom: Send + Sync {
    fn query_all(&self, selector: &Selector) -> Vec<NodeId>;
    fn query_within(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId>;
    /// Nearest self-or-ancestor matching `selector`.
    fn closest(&self, node: NodeId, selector: &Selector) -> Option<NodeId>;
    fn matches(&self, node: NodeId, selector: &Selector) -> bool;
    /// Whether `node` itself, or any descendant, matches `selector`.
    fn contains_match(&self, node: NodeId, selector: &Selector) -> bool;
    fn text_content(&self, node: NodeId) -> String;
    fn attr(&self, node: NodeId, name: &str) -> Option<String>;
    fn set_attr(&self, node: NodeId, name: &str, value: &str);
    fn observe_mutations(&self, container: NodeId, callback: MutationCallback);
    fn observe_scroll(&self, callback: ScrollCallback);
    fn scroll_state(&self) -> ScrollState;
    fn node_top(&self, node: NodeId) -> Option<f64>;
}

/// An arena-backed element tree.
#[derive(Debug, Default)]
pub struct Document {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `node` under `parent`, or as the root when `parent` is `None`.
    /// The element's `id` is mirrored into its attribute map so that both
    /// `#x` and `[id="x"]` selectors see it.
    pub fn insert(&mut self, parent: Option<NodeId>, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = parent;
        node.children = Vec::new();
        if let Some(element_id) = &node.id {
            node.attrs.insert("id".to_string(), element_id.clone());
        } else if let Some(value) = node.attrs.get("id") {
            node.id = Some(value.clone());
        }
        self.nodes.push(node);
        match parent {
            Some(parent) => self.nodes[parent.0].children.push(id),
            None => self.root = Some(id),
        }
        id
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Preorder walk of `node` and everything below it.
    pub fn subtree(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            out.push(id);
            for &child in self.nodes[id.0].children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    pub fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        if !selector.target().matches(self.get(node)) {
            return false;
        }
        // Consume ancestor compounds nearest-first while walking upward.
        let mut remaining = selector.ancestors();
        let mut current = self.get(node).parent;
        while let Some(compound) = remaining.last() {
            let Some(id) = current else {
                return false;
            };
            if compound.matches(self.get(id)) {
                remaining = &remaining[..remaining.len() - 1];
            }
            current = self.get(id).parent;
        }
        true
    }

    pub fn query_all(&self, selector: &Selector) -> Vec<NodeId> {
        match self.root {
            Some(root) => self.query_in_subtree(root, selector, true),
            None => Vec::new(),
        }
    }

    /// Matches among strict descendants of `scope`, document order.
    pub fn query_within(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.query_in_subtree(scope, selector, false)
    }

    fn query_in_subtree(&self, scope: NodeId, selector: &Selector, include_self: bool) -> Vec<NodeId> {
        self.subtree(scope)
            .into_iter()
            .filter(|&id| (include_self || id != scope) && self.matches(id, selector))
            .collect()
    }

    pub fn closest(&self, node: NodeId, selector: &Selector) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(id) = current {
            if self.matches(id, selector) {
                return Some(id);
            }
            current = self.get(id).parent;
        }
        None
    }

    pub fn contains_match(&self, node: NodeId, selector: &Selector) -> bool {
        self.subtree(node).into_iter().any(|id| self.matches(id, selector))
    }

    /// Concatenated text of `node` and its descendants, document order.
    pub fn text_content(&self, node: NodeId) -> String {
        self.subtree(node)
            .into_iter()
            .filter_map(|id| self.get(id).text.as_deref())
            .collect()
    }
}
