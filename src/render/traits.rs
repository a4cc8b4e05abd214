//! Renderer trait: the contract presentation layers implement
//!
//! The controller decides what is displayed; renderers decide how. Removal
//! may be animated or immediate, the controller never waits on it.

use crate::node::{AnswerNode, NodeId, NodeKind, QuestionNode, RenderId};
use crate::traversal::TraversalError;
use serde::{Deserialize, Serialize};

/// Interaction state of a displayed node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeState {
    /// The node the user is expected to answer next
    Active,
    /// An answered node, collapsed and non-interactive
    Done,
}

/// Where a node is about to be displayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSlot {
    pub render_id: RenderId,
    pub node_id: NodeId,
    /// Position on the chain; 0 is the start node
    pub depth: usize,
}

impl NodeSlot {
    pub fn new(render_id: RenderId, node_id: NodeId, depth: usize) -> Self {
        Self {
            render_id,
            node_id,
            depth,
        }
    }
}

/// A node currently attached to the view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayedNode {
    pub render_id: RenderId,
    pub node_id: NodeId,
    pub kind: NodeKind,
    pub depth: usize,
    pub state: NodeState,
}

impl DisplayedNode {
    /// A freshly rendered node; it starts out active
    pub fn new(slot: NodeSlot, kind: NodeKind) -> Self {
        Self {
            render_id: slot.render_id,
            node_id: slot.node_id,
            kind,
            depth: slot.depth,
            state: NodeState::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == NodeState::Active
    }

    pub fn is_start(&self) -> bool {
        self.depth == 0
    }
}

/// Presentation layer driven by a traversal controller
pub trait Renderer {
    /// Display a question node with its answers as selectable options
    fn render_question(&mut self, slot: NodeSlot, question: &QuestionNode) -> DisplayedNode;

    /// Display a terminal answer node
    fn render_answer(&mut self, slot: NodeSlot, answer: &AnswerNode) -> DisplayedNode;

    /// Detach a node from the view
    fn remove(&mut self, node: &DisplayedNode);

    /// Reflect that `node` is awaiting an answer
    fn mark_active(&mut self, node: &DisplayedNode);

    /// Reflect that `node` has been answered
    fn mark_done(&mut self, node: &DisplayedNode);

    /// Highlight the chosen option of a question node
    fn select_option(&mut self, _node: &DisplayedNode, _index: usize) {}

    /// Clear any highlighted option of a question node
    fn clear_selection(&mut self, _node: &DisplayedNode) {}

    /// Surface an error to the user
    fn notify(&mut self, _error: &TraversalError) {}

    /// The introductory content is removed when the tree starts
    fn dismiss_intro(&mut self) {}

    /// The introductory content stays; its call to action now resets the tree
    fn intro_retained(&mut self) {}
}
