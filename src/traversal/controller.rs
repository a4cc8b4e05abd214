//! TraversalController: owns one chain and reconciles it on every selection
//!
//! A selection runs in two halves. `begin_selection` truncates the chain back
//! to the node the answer was picked from and hands out a ticket;
//! `complete_selection` applies the fetched node, unless the chain changed
//! after the ticket was issued, in which case the response is discarded.
//! `select_answer` runs both halves around the repository fetch.

use crate::chain::{ChainEntry, ChainState};
use crate::config::TreeConfig;
use crate::node::{AnswerOption, NodeId, NodeKind, NodePayload, RenderId, WidgetId};
use crate::render::{DisplayedNode, NodeSlot, NodeState, Renderer};
use crate::repository::{NodeRepository, RepositoryError, RepositoryResult};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while driving a traversal
#[derive(Debug, Error)]
pub enum TraversalError {
    #[error("couldn't retrieve node {id}: {source}")]
    Fetch {
        id: NodeId,
        #[source]
        source: RepositoryError,
    },

    #[error("node {id} is malformed: {reason}")]
    MalformedPayload { id: NodeId, reason: String },

    #[error("node {0} is not on the current chain")]
    NotInChain(NodeId),

    #[error("node {from} has no answer leading to {target}")]
    UnknownAnswer { from: NodeId, target: NodeId },

    #[error("node {from} has no option {index}")]
    NoSuchOption { from: NodeId, index: usize },

    #[error("node {0} is terminal and has no answers")]
    TerminalNode(NodeId),

    #[error("response for {0} arrived after the tree changed")]
    Stale(NodeId),

    #[error("traversal has not been started")]
    NotStarted,

    #[error("traversal has already been started")]
    AlreadyStarted,
}

impl TraversalError {
    fn from_repository(id: &NodeId, error: RepositoryError) -> Self {
        match error {
            RepositoryError::Malformed { source, .. } => TraversalError::MalformedPayload {
                id: id.clone(),
                reason: source.to_string(),
            },
            source => TraversalError::Fetch {
                id: id.clone(),
                source,
            },
        }
    }

    /// True for caller mistakes, as opposed to failures of the data source
    pub fn is_precondition_violation(&self) -> bool {
        matches!(
            self,
            TraversalError::NotInChain(_)
                | TraversalError::UnknownAnswer { .. }
                | TraversalError::NoSuchOption { .. }
                | TraversalError::TerminalNode(_)
                | TraversalError::NotStarted
                | TraversalError::AlreadyStarted
        )
    }
}

/// Ticket for a selection whose target is being fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSelection {
    /// Node the answer was picked from
    pub from: NodeId,
    /// Chain position of `from` after truncation
    pub from_position: usize,
    /// Index of the picked option in `from`'s answer list
    pub option_index: usize,
    /// Node to fetch
    pub target: NodeId,
    generation: u64,
}

/// What became of a completed fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// The fetched node was rendered and appended to the chain
    Applied(DisplayedNode),
    /// The chain moved on while fetching; nothing was changed
    Discarded,
}

/// Drives one tree widget
///
/// Owns the chain exclusively. Every mutating method takes `&mut self`, so
/// two selections can never truncate the same chain concurrently.
pub struct TraversalController<R: Renderer> {
    widget_id: WidgetId,
    config: TreeConfig,
    repository: Arc<dyn NodeRepository>,
    renderer: R,
    chain: Option<ChainState>,
    next_render_seq: u64,
}

impl<R: Renderer> TraversalController<R> {
    pub fn new(repository: Arc<dyn NodeRepository>, renderer: R, config: TreeConfig) -> Self {
        Self {
            widget_id: WidgetId::new(),
            config,
            repository,
            renderer,
            chain: None,
            next_render_seq: 0,
        }
    }

    pub fn widget_id(&self) -> WidgetId {
        self.widget_id
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn repository(&self) -> &Arc<dyn NodeRepository> {
        &self.repository
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    pub fn is_started(&self) -> bool {
        self.chain.is_some()
    }

    pub fn chain(&self) -> Option<&ChainState> {
        self.chain.as_ref()
    }

    /// Node ids from the start node to the tip; empty before `start`
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.chain.as_ref().map(|c| c.node_ids()).unwrap_or_default()
    }

    /// Render ids aligned with `node_ids`
    pub fn render_ids(&self) -> Vec<RenderId> {
        self.chain.as_ref().map(|c| c.render_ids()).unwrap_or_default()
    }

    pub fn tip(&self) -> Option<&ChainEntry> {
        self.chain.as_ref().map(|c| c.tip())
    }

    /// Fetch and display the start node.
    ///
    /// On failure the error is surfaced through the renderer and returned,
    /// and the controller stays unstarted.
    pub async fn start(&mut self, root: impl Into<NodeId>) -> Result<DisplayedNode, TraversalError> {
        if self.chain.is_some() {
            return Err(TraversalError::AlreadyStarted);
        }
        let root = root.into();
        tracing::info!(widget = %self.widget_id, root = %root, "starting traversal");

        let payload = match self.repository.fetch(&root).await {
            Ok(payload) => payload,
            Err(e) => {
                let err = TraversalError::from_repository(&root, e);
                tracing::warn!(widget = %self.widget_id, error = %err, "start failed");
                self.renderer.notify(&err);
                return Err(err);
            }
        };
        self.check_kind(&root, &payload);

        let slot = NodeSlot::new(self.allocate_render_id(), root, 0);
        let mut displayed = display(&mut self.renderer, slot, &payload);
        displayed.state = NodeState::Active;
        self.renderer.mark_active(&displayed);

        self.chain = Some(ChainState::new(ChainEntry::new(payload, displayed.clone())));
        Ok(displayed)
    }

    /// Select `answer` on node `from`, fetch its target and display it.
    pub async fn select_answer(
        &mut self,
        from: &NodeId,
        answer: &AnswerOption,
    ) -> Result<DisplayedNode, TraversalError> {
        let pending = self.begin_selection(from, answer)?;
        let fetched = self.repository.fetch(&pending.target).await;
        let target = pending.target.clone();
        match self.complete_selection(pending, fetched)? {
            SelectionOutcome::Applied(node) => Ok(node),
            SelectionOutcome::Discarded => Err(TraversalError::Stale(target)),
        }
    }

    /// Select the option at `index` on node `from`.
    pub async fn select_answer_index(
        &mut self,
        from: &NodeId,
        index: usize,
    ) -> Result<DisplayedNode, TraversalError> {
        let chain = self.chain.as_ref().ok_or(TraversalError::NotStarted)?;
        let position = chain
            .position_of(from)
            .ok_or_else(|| TraversalError::NotInChain(from.clone()))?;
        let answer = match &chain.entries()[position].payload {
            NodePayload::Question(q) => q.answers.get(index).cloned().ok_or_else(|| {
                TraversalError::NoSuchOption {
                    from: from.clone(),
                    index,
                }
            })?,
            NodePayload::Answer(_) => return Err(TraversalError::TerminalNode(from.clone())),
        };
        self.select_answer(from, &answer).await
    }

    /// Truncate the chain back to `from` and issue a fetch ticket.
    ///
    /// Nothing is mutated when `from` is not on the chain or does not offer
    /// `answer`.
    pub fn begin_selection(
        &mut self,
        from: &NodeId,
        answer: &AnswerOption,
    ) -> Result<PendingSelection, TraversalError> {
        let chain = self.chain.as_mut().ok_or(TraversalError::NotStarted)?;

        let Some(position) = chain.position_of(from) else {
            tracing::error!(widget = %self.widget_id, node = %from, "selection from a node not on the chain");
            return Err(TraversalError::NotInChain(from.clone()));
        };

        let option_index = match &chain.entries()[position].payload {
            NodePayload::Question(q) => q.position_of(answer).ok_or_else(|| {
                TraversalError::UnknownAnswer {
                    from: from.clone(),
                    target: answer.target.clone(),
                }
            })?,
            NodePayload::Answer(_) => return Err(TraversalError::TerminalNode(from.clone())),
        };

        let removed = chain.truncate_to_position(position);
        if !removed.is_empty() {
            tracing::debug!(
                widget = %self.widget_id,
                node = %from,
                removed = removed.len(),
                "truncated chain"
            );
        }
        for entry in &removed {
            self.renderer.remove(&entry.displayed);
        }

        let from_node = &chain.tip().displayed;
        self.renderer.clear_selection(from_node);
        self.renderer.select_option(from_node, option_index);

        Ok(PendingSelection {
            from: from.clone(),
            from_position: position,
            option_index,
            target: answer.target.clone(),
            generation: chain.generation(),
        })
    }

    /// Apply the fetch result for a ticket from `begin_selection`.
    ///
    /// A failed fetch is surfaced through the renderer and returned; the chain
    /// stays truncated and the originating node is re-enabled for another try.
    pub fn complete_selection(
        &mut self,
        pending: PendingSelection,
        fetched: RepositoryResult<NodePayload>,
    ) -> Result<SelectionOutcome, TraversalError> {
        let generation = match &self.chain {
            Some(chain) => chain.generation(),
            None => return Err(TraversalError::NotStarted),
        };
        if generation != pending.generation {
            tracing::warn!(
                widget = %self.widget_id,
                target = %pending.target,
                "discarding stale response"
            );
            return Ok(SelectionOutcome::Discarded);
        }

        let payload = match fetched {
            Ok(payload) => payload,
            Err(e) => {
                let err = TraversalError::from_repository(&pending.target, e);
                tracing::warn!(widget = %self.widget_id, error = %err, "selection failed");
                if let Some(chain) = self.chain.as_mut() {
                    let from_node = &mut chain.tip_mut().displayed;
                    from_node.state = NodeState::Active;
                    self.renderer.clear_selection(from_node);
                    self.renderer.mark_active(from_node);
                }
                self.renderer.notify(&err);
                return Err(err);
            }
        };
        self.check_kind(&pending.target, &payload);

        let render_id = self.allocate_render_id();
        let slot = NodeSlot::new(render_id, pending.target.clone(), pending.from_position + 1);
        let mut displayed = display(&mut self.renderer, slot, &payload);

        let chain = self.chain.as_mut().ok_or(TraversalError::NotStarted)?;
        let from_node = &mut chain.tip_mut().displayed;
        from_node.state = NodeState::Done;
        self.renderer.mark_done(from_node);

        displayed.state = NodeState::Active;
        self.renderer.mark_active(&displayed);
        chain.push(ChainEntry::new(payload, displayed.clone()));

        tracing::debug!(
            widget = %self.widget_id,
            node = %pending.target,
            render_id = %render_id,
            depth = chain.len(),
            "node appended"
        );
        Ok(SelectionOutcome::Applied(displayed))
    }

    /// Remove everything above the start node and make it answerable again.
    ///
    /// Calling it repeatedly, or before `start`, is harmless.
    pub fn reset(&mut self) {
        let Some(chain) = self.chain.as_mut() else {
            return;
        };
        let removed = chain.reset();
        tracing::info!(widget = %self.widget_id, removed = removed.len(), "traversal reset");
        for entry in &removed {
            self.renderer.remove(&entry.displayed);
        }

        let root = &mut chain.tip_mut().displayed;
        root.state = NodeState::Active;
        self.renderer.clear_selection(root);
        self.renderer.mark_active(root);
    }

    fn allocate_render_id(&mut self) -> RenderId {
        let id = RenderId::new(self.next_render_seq);
        self.next_render_seq += 1;
        id
    }

    /// Payload shape decides how a node is displayed; a disagreeing id prefix
    /// only gets logged.
    fn check_kind(&self, id: &NodeId, payload: &NodePayload) {
        let by_name = NodeKind::classify(id, &self.config.node_prefix);
        if by_name != payload.kind() {
            tracing::warn!(
                widget = %self.widget_id,
                node = %id,
                named = %by_name,
                shape = %payload.kind(),
                "node id prefix disagrees with payload shape"
            );
        }
    }
}

fn display<R: Renderer>(renderer: &mut R, slot: NodeSlot, payload: &NodePayload) -> DisplayedNode {
    match payload {
        NodePayload::Question(q) => renderer.render_question(slot, q),
        NodePayload::Answer(a) => renderer.render_answer(slot, a),
    }
}
