//! Node identifiers and payload definitions

mod id;
mod payload;


pub use id::{NodeId, NodeKind, RenderId, WidgetId};
pub use payload::{AnswerNode, AnswerOption, NodePayload, PayloadError, QuestionNode};
