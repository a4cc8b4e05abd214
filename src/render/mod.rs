//! Presentation layers
//!
//! `HtmlRenderer` produces the widget markup, `TerminalRenderer` drives the
//! interactive command line.

mod html;
mod terminal;
mod traits;

pub use html::{HtmlRenderer, IntroState};
pub use terminal::TerminalRenderer;
pub use traits::{DisplayedNode, NodeSlot, NodeState, Renderer};
