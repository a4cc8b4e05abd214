//! Node payloads: questions with answer options, and terminal answers
//!
//! Payloads are classified by shape when they cross the repository boundary:
//! an object carrying an `answers` list is a question, an object carrying a
//! `title` is an answer. The id naming convention is not consulted here.

use super::id::{NodeId, NodeKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// One selectable option of a question node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    /// Label shown to the user
    pub text: String,
    /// Node this option leads to
    pub target: NodeId,
}

impl AnswerOption {
    pub fn new(text: impl Into<String>, target: impl Into<NodeId>) -> Self {
        Self {
            text: text.into(),
            target: target.into(),
        }
    }
}

/// A node presenting a question and its answer options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionNode {
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub answers: Vec<AnswerOption>,
}

impl QuestionNode {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            description: None,
            answers: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_answer(mut self, text: impl Into<String>, target: impl Into<NodeId>) -> Self {
        self.answers.push(AnswerOption::new(text, target));
        self
    }

    /// Position of `option` in the answer list, matched by text and target
    pub fn position_of(&self, option: &AnswerOption) -> Option<usize> {
        self.answers.iter().position(|a| a == option)
    }
}

/// A terminal node presenting a final result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerNode {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl AnswerNode {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            image: None,
            link: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

/// Why a fetched document could not be turned into a payload
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PayloadError {
    #[error("not valid JSON: {0}")]
    Json(String),

    #[error("expected a JSON object")]
    NotAnObject,

    #[error("object has neither an `answers` list nor a `title`")]
    UnrecognizedShape,

    #[error("invalid {kind} node: {reason}")]
    Invalid { kind: NodeKind, reason: String },
}

/// A fetched node, tagged by its shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodePayload {
    Question(QuestionNode),
    Answer(AnswerNode),
}

impl NodePayload {
    /// Classify and decode a raw JSON document
    pub fn from_value(value: Value) -> Result<Self, PayloadError> {
        let (has_answers, has_title) = match value.as_object() {
            Some(object) => (object.contains_key("answers"), object.contains_key("title")),
            None => return Err(PayloadError::NotAnObject),
        };

        if has_answers {
            serde_json::from_value(value)
                .map(NodePayload::Question)
                .map_err(|e| PayloadError::Invalid {
                    kind: NodeKind::Question,
                    reason: e.to_string(),
                })
        } else if has_title {
            serde_json::from_value(value)
                .map(NodePayload::Answer)
                .map_err(|e| PayloadError::Invalid {
                    kind: NodeKind::Answer,
                    reason: e.to_string(),
                })
        } else {
            Err(PayloadError::UnrecognizedShape)
        }
    }

    /// Decode a payload from JSON text
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PayloadError> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| PayloadError::Json(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NodePayload::Question(_) => NodeKind::Question,
            NodePayload::Answer(_) => NodeKind::Answer,
        }
    }

    pub fn as_question(&self) -> Option<&QuestionNode> {
        match self {
            NodePayload::Question(q) => Some(q),
            NodePayload::Answer(_) => None,
        }
    }

    pub fn as_answer(&self) -> Option<&AnswerNode> {
        match self {
            NodePayload::Answer(a) => Some(a),
            NodePayload::Question(_) => None,
        }
    }
}

impl From<QuestionNode> for NodePayload {
    fn from(q: QuestionNode) -> Self {
        NodePayload::Question(q)
    }
}

impl From<AnswerNode> for NodePayload {
    fn from(a: AnswerNode) -> Self {
        NodePayload::Answer(a)
    }
}
