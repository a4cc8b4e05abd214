//! Traversal: the state machine walking a tree one answer at a time

mod controller;
mod widget;

pub use controller::{PendingSelection, SelectionOutcome, TraversalController, TraversalError};
pub use widget::DecisionTreeWidget;
