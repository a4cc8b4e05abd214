//! HTML fragment renderer
//!
//! Keeps the displayed nodes as a document and emits the widget markup.
//! Nodes are listed newest first, the way the widget prepends each new node
//! to its holder.

use super::traits::{DisplayedNode, NodeSlot, NodeState, Renderer};
use crate::config::TreeConfig;
use crate::node::{AnswerNode, AnswerOption, NodeId, NodeKind, QuestionNode, RenderId};
use crate::traversal::TraversalError;
use std::fmt::Write;

/// What happened to the introductory content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntroState {
    Visible,
    Dismissed,
    /// Still shown; its call to action is marked clicked
    Retained,
}

#[derive(Debug, Clone)]
enum Body {
    Question {
        question: String,
        description: Option<String>,
        options: Vec<AnswerOption>,
        selected: Option<usize>,
    },
    Answer {
        markup: String,
    },
}

#[derive(Debug, Clone)]
struct HtmlNode {
    render_id: RenderId,
    node_id: NodeId,
    depth: usize,
    state: NodeState,
    body: Body,
}

/// Renders nodes into an in-memory HTML document
///
/// Titles, option texts, links and image sources are escaped. Question and
/// answer descriptions come from the tree author and are inserted as markup.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    show_description: bool,
    answer_title_is_link: bool,
    answer_link_target: String,
    animation_duration_ms: u64,
    intro: Option<String>,
    intro_state: IntroState,
    nodes: Vec<HtmlNode>,
    notifications: Vec<String>,
}

impl HtmlRenderer {
    pub fn new(config: &TreeConfig) -> Self {
        Self {
            show_description: config.show_extra_description_text,
            answer_title_is_link: config.answer_title_is_link,
            answer_link_target: config.answer_link_target.clone(),
            animation_duration_ms: config.animation_duration_ms,
            intro: None,
            intro_state: IntroState::Visible,
            nodes: Vec::new(),
            notifications: Vec::new(),
        }
    }

    /// Introductory markup shown before the tree starts
    pub fn with_intro(mut self, markup: impl Into<String>) -> Self {
        self.intro = Some(markup.into());
        self
    }

    pub fn intro_state(&self) -> IntroState {
        self.intro_state
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_displayed(&self, render_id: RenderId) -> bool {
        self.nodes.iter().any(|n| n.render_id == render_id)
    }

    /// Messages raised through `notify`, oldest first
    pub fn notifications(&self) -> &[String] {
        &self.notifications
    }

    /// Markup of a single displayed node
    pub fn fragment(&self, render_id: RenderId) -> Option<String> {
        self.nodes
            .iter()
            .find(|n| n.render_id == render_id)
            .map(render_node)
    }

    /// The whole widget, newest node first
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            "<div class=\"decisionTree\" data-animation-duration=\"{}\">",
            self.animation_duration_ms
        );
        for node in self.nodes.iter().rev() {
            out.push_str(&render_node(node));
        }
        if let Some(intro) = &self.intro {
            match self.intro_state {
                IntroState::Visible => out.push_str(intro),
                IntroState::Retained => {
                    let _ = write!(out, "<div class=\"intro clicked\">{}</div>", intro);
                }
                IntroState::Dismissed => {}
            }
        }
        out.push_str("</div>");
        out
    }

    fn node_mut(&mut self, render_id: RenderId) -> Option<&mut HtmlNode> {
        self.nodes.iter_mut().find(|n| n.render_id == render_id)
    }

    fn set_state(&mut self, render_id: RenderId, state: NodeState) {
        if let Some(node) = self.node_mut(render_id) {
            node.state = state;
        }
    }

    fn answer_markup(&self, answer: &AnswerNode) -> String {
        let link = answer.link.as_deref().filter(|_| self.answer_title_is_link);
        let target = escape(&self.answer_link_target);

        let image = match (answer.image.as_deref(), link) {
            (Some(image), Some(link)) => format!(
                "<p><a href=\"{}\" target=\"{}\"><img src=\"{}\"></a></p>",
                escape(link),
                target,
                escape(image)
            ),
            (Some(image), None) => format!("<p><img src=\"{}\"></p>", escape(image)),
            (None, _) => String::new(),
        };

        let title = match link {
            Some(link) => format!(
                "<h3><a href=\"{}\" target=\"{}\">{}</a></h3>",
                escape(link),
                target,
                escape(&answer.title)
            ),
            None => format!("<h3>{}</h3>", escape(&answer.title)),
        };

        format!("{}{}{}", title, image, answer.description)
    }
}

fn render_node(node: &HtmlNode) -> String {
    let mut out = String::new();
    match &node.body {
        Body::Question {
            question,
            description,
            options,
            selected,
        } => {
            let mut classes = String::new();
            if node.depth == 0 {
                classes.push_str("startNode ");
            }
            classes.push_str("dtNode ");
            classes.push_str(match node.state {
                NodeState::Active => "active",
                NodeState::Done => "done",
            });

            let _ = write!(
                out,
                "<div id=\"{}\" class=\"{}\" data-node=\"{}\"><h3>{}</h3>",
                node.render_id,
                classes,
                escape(node.node_id.as_str()),
                escape(question)
            );
            if let Some(description) = description {
                let _ = write!(out, "<p>{}</p>", description);
            }
            out.push_str("<ul>");
            for (i, option) in options.iter().enumerate() {
                let ticked = *selected == Some(i);
                let _ = write!(
                    out,
                    "<li{}><a href=\"#{}\" aria-selected=\"{}\">{}</a></li>",
                    if ticked { " class=\"ticked\"" } else { "" },
                    escape(option.target.as_str()),
                    ticked,
                    escape(&option.text)
                );
            }
            out.push_str("</ul></div>");
        }
        Body::Answer { markup } => {
            let _ = write!(
                out,
                "<div id=\"{}\" class=\"dtNode answerNode\" data-node=\"{}\">{}</div>",
                node.render_id,
                escape(node.node_id.as_str()),
                markup
            );
        }
    }
    out
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

impl Renderer for HtmlRenderer {
    fn render_question(&mut self, slot: NodeSlot, question: &QuestionNode) -> DisplayedNode {
        let description = question.description.clone().filter(|_| self.show_description);
        self.nodes.push(HtmlNode {
            render_id: slot.render_id,
            node_id: slot.node_id.clone(),
            depth: slot.depth,
            state: NodeState::Active,
            body: Body::Question {
                question: question.question.clone(),
                description,
                options: question.answers.clone(),
                selected: None,
            },
        });
        DisplayedNode::new(slot, NodeKind::Question)
    }

    fn render_answer(&mut self, slot: NodeSlot, answer: &AnswerNode) -> DisplayedNode {
        let markup = self.answer_markup(answer);
        self.nodes.push(HtmlNode {
            render_id: slot.render_id,
            node_id: slot.node_id.clone(),
            depth: slot.depth,
            state: NodeState::Active,
            body: Body::Answer { markup },
        });
        DisplayedNode::new(slot, NodeKind::Answer)
    }

    fn remove(&mut self, node: &DisplayedNode) {
        self.nodes.retain(|n| n.render_id != node.render_id);
    }

    fn mark_active(&mut self, node: &DisplayedNode) {
        self.set_state(node.render_id, NodeState::Active);
    }

    fn mark_done(&mut self, node: &DisplayedNode) {
        self.set_state(node.render_id, NodeState::Done);
    }

    fn select_option(&mut self, node: &DisplayedNode, index: usize) {
        if let Some(HtmlNode {
            body: Body::Question { selected, .. },
            ..
        }) = self.node_mut(node.render_id)
        {
            *selected = Some(index);
        }
    }

    fn clear_selection(&mut self, node: &DisplayedNode) {
        if let Some(HtmlNode {
            body: Body::Question { selected, .. },
            ..
        }) = self.node_mut(node.render_id)
        {
            *selected = None;
        }
    }

    fn notify(&mut self, error: &TraversalError) {
        self.notifications.push(error.to_string());
    }

    fn dismiss_intro(&mut self) {
        self.intro_state = IntroState::Dismissed;
    }

    fn intro_retained(&mut self) {
        self.intro_state = IntroState::Retained;
    }
}
