//! Plain-text renderer for terminals

use super::traits::{DisplayedNode, NodeSlot, Renderer};
use crate::node::{AnswerNode, NodeKind, QuestionNode};
use crate::traversal::TraversalError;
use std::io::Write;

/// Writes nodes as numbered prompts
///
/// Nodes are printed once when rendered; removal and state changes are
/// reported as short status lines. Write failures are logged and otherwise
/// ignored so a closed pipe never aborts a traversal.
pub struct TerminalRenderer<W: Write> {
    out: W,
    show_description: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, show_description: bool) -> Self {
        Self {
            out,
            show_description,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text) {
            tracing::warn!(error = %e, "terminal write failed");
        }
    }

    fn indent(depth: usize) -> String {
        "  ".repeat(depth)
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render_question(&mut self, slot: NodeSlot, question: &QuestionNode) -> DisplayedNode {
        let pad = Self::indent(slot.depth);
        self.line("");
        self.line(&format!("{}[{}] {}", pad, slot.depth, question.question));
        if self.show_description {
            if let Some(description) = &question.description {
                self.line(&format!("{}    {}", pad, description));
            }
        }
        for (i, answer) in question.answers.iter().enumerate() {
            self.line(&format!("{}  {}) {}", pad, i + 1, answer.text));
        }
        DisplayedNode::new(slot, NodeKind::Question)
    }

    fn render_answer(&mut self, slot: NodeSlot, answer: &AnswerNode) -> DisplayedNode {
        let pad = Self::indent(slot.depth);
        self.line("");
        self.line(&format!("{}=> {}", pad, answer.title));
        self.line(&format!("{}   {}", pad, answer.description));
        if let Some(link) = &answer.link {
            self.line(&format!("{}   link: {}", pad, link));
        }
        if let Some(image) = &answer.image {
            self.line(&format!("{}   image: {}", pad, image));
        }
        DisplayedNode::new(slot, NodeKind::Answer)
    }

    fn remove(&mut self, node: &DisplayedNode) {
        tracing::trace!(render_id = %node.render_id, "node removed");
    }

    fn mark_active(&mut self, _node: &DisplayedNode) {}

    fn mark_done(&mut self, _node: &DisplayedNode) {}

    fn select_option(&mut self, node: &DisplayedNode, index: usize) {
        let pad = Self::indent(node.depth);
        self.line(&format!("{}  -> {}", pad, index + 1));
    }

    fn notify(&mut self, error: &TraversalError) {
        self.line(&format!("error: {}", error));
    }
}
