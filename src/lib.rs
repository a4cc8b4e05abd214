//! decision-tree: Interactive Question/Answer Tree Traversal
//!
//! Walks a tree of question nodes one answer at a time until a terminal
//! answer node is reached. Nodes are fetched on demand from a repository
//! and handed to a renderer; the traversal state machine in between keeps
//! the path from the start node to the current node.
//!
//! # Core Concepts
//!
//! - **Chain**: the displayed path, start node first
//! - **Truncation**: answering an earlier node discards everything below it
//! - **Repository**: where node definitions come from (files, HTTP, memory)
//! - **Renderer**: how displayed nodes are presented (HTML, terminal)
//!
//! # Example
//!
//! ```
//! use decision_tree::{HtmlRenderer, InMemoryRepository, TraversalController, TreeConfig};
//! use std::sync::Arc;
//!
//! let config = TreeConfig::default();
//! let renderer = HtmlRenderer::new(&config);
//! let controller = TraversalController::new(Arc::new(InMemoryRepository::new()), renderer, config);
//! assert!(!controller.is_started());
//! ```

pub mod chain;
pub mod config;
pub mod node;
pub mod render;
pub mod repository;
pub mod traversal;

pub use chain::{ChainEntry, ChainState};
pub use config::{ConfigError, TreeConfig};
pub use node::{
    AnswerNode, AnswerOption, NodeId, NodeKind, NodePayload, PayloadError, QuestionNode, RenderId,
    WidgetId,
};
pub use render::{DisplayedNode, HtmlRenderer, IntroState, NodeSlot, NodeState, Renderer, TerminalRenderer};
pub use repository::{
    FileRepository, HttpRepository, InMemoryRepository, NodeRepository, RepositoryError,
    RepositoryResult, ResponseCache,
};
pub use traversal::{
    DecisionTreeWidget, PendingSelection, SelectionOutcome, TraversalController, TraversalError,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
