//! DecisionTreeWidget: the call-to-action entry point of one tree

use super::controller::{TraversalController, TraversalError};
use crate::config::TreeConfig;
use crate::node::NodeId;
use crate::render::Renderer;
use crate::repository::NodeRepository;
use std::sync::Arc;

/// One mounted tree, started from its call to action
///
/// The first activation starts the traversal at the start node. When the
/// introductory content is kept, later activations reset the tree to its
/// start node; when it is hidden the call to action is gone and later
/// activations do nothing.
pub struct DecisionTreeWidget<R: Renderer> {
    start_node: NodeId,
    controller: TraversalController<R>,
    intro_handled: bool,
}

impl<R: Renderer> DecisionTreeWidget<R> {
    pub fn new(start_node: impl Into<NodeId>, controller: TraversalController<R>) -> Self {
        Self {
            start_node: start_node.into(),
            controller,
            intro_handled: false,
        }
    }

    /// Build a widget and its controller in one go
    pub fn mount(
        start_node: impl Into<NodeId>,
        repository: Arc<dyn NodeRepository>,
        renderer: R,
        config: TreeConfig,
    ) -> Self {
        Self::new(start_node, TraversalController::new(repository, renderer, config))
    }

    pub fn start_node(&self) -> &NodeId {
        &self.start_node
    }

    pub fn controller(&self) -> &TraversalController<R> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut TraversalController<R> {
        &mut self.controller
    }

    pub fn into_controller(self) -> TraversalController<R> {
        self.controller
    }

    /// Handle a click on the call to action
    pub async fn activate(&mut self) -> Result<(), TraversalError> {
        let hide = self.controller.config().hide_original_content;

        if !self.controller.is_started() {
            if !self.intro_handled {
                let renderer = self.controller.renderer_mut();
                if hide {
                    renderer.dismiss_intro();
                } else {
                    renderer.intro_retained();
                }
                self.intro_handled = true;
            }
            self.controller.start(self.start_node.clone()).await?;
            return Ok(());
        }

        if hide {
            tracing::debug!(widget = %self.controller.widget_id(), "activation ignored, intro is hidden");
        } else {
            self.controller.reset();
        }
        Ok(())
    }
}
