//! Common test utilities for traversal tests
//!
//! Provides a renderer that records every call it receives, and fixture
//! trees served from memory or written to a temporary data folder.

#![allow(dead_code)]

use decision_tree::{
    AnswerNode, DisplayedNode, InMemoryRepository, NodeId, NodeSlot, NodeState, QuestionNode,
    RenderId, Renderer, TraversalController, TraversalError, TreeConfig,
};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// One call received by the recording renderer
#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    Question(RenderId, NodeId),
    Answer(RenderId, NodeId, bool),
    Removed(RenderId),
    Active(RenderId),
    Done(RenderId),
    Selected(RenderId, usize),
    Cleared(RenderId),
    Notified(String),
}

/// Renderer keeping a log of calls and the set of attached nodes
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub events: Vec<RenderEvent>,
    pub attached: BTreeMap<RenderId, NodeState>,
    pub selected: BTreeMap<RenderId, usize>,
    answer_title_is_link: bool,
}

impl RecordingRenderer {
    pub fn new(config: &TreeConfig) -> Self {
        Self {
            answer_title_is_link: config.answer_title_is_link,
            ..Self::default()
        }
    }

    pub fn notifications(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                RenderEvent::Notified(msg) => Some(msg.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn removed(&self) -> Vec<RenderId> {
        self.events
            .iter()
            .filter_map(|e| match e {
                RenderEvent::Removed(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn state_of(&self, id: RenderId) -> Option<NodeState> {
        self.attached.get(&id).copied()
    }
}

impl Renderer for RecordingRenderer {
    fn render_question(&mut self, slot: NodeSlot, _question: &QuestionNode) -> DisplayedNode {
        self.events
            .push(RenderEvent::Question(slot.render_id, slot.node_id.clone()));
        self.attached.insert(slot.render_id, NodeState::Active);
        DisplayedNode::new(slot, decision_tree::NodeKind::Question)
    }

    fn render_answer(&mut self, slot: NodeSlot, answer: &AnswerNode) -> DisplayedNode {
        let linked = self.answer_title_is_link && answer.link.is_some();
        self.events
            .push(RenderEvent::Answer(slot.render_id, slot.node_id.clone(), linked));
        self.attached.insert(slot.render_id, NodeState::Active);
        DisplayedNode::new(slot, decision_tree::NodeKind::Answer)
    }

    fn remove(&mut self, node: &DisplayedNode) {
        self.events.push(RenderEvent::Removed(node.render_id));
        self.attached.remove(&node.render_id);
        self.selected.remove(&node.render_id);
    }

    fn mark_active(&mut self, node: &DisplayedNode) {
        self.events.push(RenderEvent::Active(node.render_id));
        self.attached.insert(node.render_id, NodeState::Active);
    }

    fn mark_done(&mut self, node: &DisplayedNode) {
        self.events.push(RenderEvent::Done(node.render_id));
        self.attached.insert(node.render_id, NodeState::Done);
    }

    fn select_option(&mut self, node: &DisplayedNode, index: usize) {
        self.events.push(RenderEvent::Selected(node.render_id, index));
        self.selected.insert(node.render_id, index);
    }

    fn clear_selection(&mut self, node: &DisplayedNode) {
        self.events.push(RenderEvent::Cleared(node.render_id));
        self.selected.remove(&node.render_id);
    }

    fn notify(&mut self, error: &TraversalError) {
        self.events.push(RenderEvent::Notified(error.to_string()));
    }
}

/// Fixture tree used across scenarios
///
/// ```text
/// dtn-root ── Yes ──> dtn-a ── Left ──> dtn-b ── Go ──> done
///    │                  ├── Right ─> dtn-c ── Go ──> linked
///    │                  └── Broken ─> dtn-missing
///    └── No ──> done
/// ```
pub fn fixture_documents() -> Vec<(&'static str, Value)> {
    vec![
        (
            "dtn-root",
            json!({"question": "Start?", "answers": [
                {"text": "Yes", "target": "dtn-a"},
                {"text": "No", "target": "done"}
            ]}),
        ),
        (
            "dtn-a",
            json!({"question": "Which way?", "description": "Pick a side", "answers": [
                {"text": "Left", "target": "dtn-b"},
                {"text": "Right", "target": "dtn-c"},
                {"text": "Broken", "target": "dtn-missing"}
            ]}),
        ),
        (
            "dtn-b",
            json!({"question": "Left it is. Continue?", "answers": [
                {"text": "Go", "target": "done"}
            ]}),
        ),
        (
            "dtn-c",
            json!({"question": "Right it is. Continue?", "answers": [
                {"text": "Go", "target": "linked"}
            ]}),
        ),
        (
            "done",
            json!({"title": "Done", "description": "You're done."}),
        ),
        (
            "linked",
            json!({
                "title": "Read more",
                "description": "<p>Details online.</p>",
                "image": "/img/more.png",
                "link": "https://example.org/more"
            }),
        ),
    ]
}

pub fn fixture_repository() -> Arc<InMemoryRepository> {
    let repo = InMemoryRepository::new();
    for (id, doc) in fixture_documents() {
        repo.insert(id, doc);
    }
    Arc::new(repo)
}

/// Write the fixture tree as `{id}.json` files into `dir`
pub fn write_fixture_folder(dir: &Path) {
    for (id, doc) in fixture_documents() {
        let body = serde_json::to_vec_pretty(&doc).expect("fixture serializes");
        std::fs::write(dir.join(format!("{}.json", id)), body).expect("fixture written");
    }
}

pub fn recording_controller(
    repo: Arc<InMemoryRepository>,
) -> TraversalController<RecordingRenderer> {
    let config = TreeConfig::default();
    let renderer = RecordingRenderer::new(&config);
    TraversalController::new(repo, renderer, config)
}

pub fn id(s: &str) -> NodeId {
    NodeId::from(s)
}
