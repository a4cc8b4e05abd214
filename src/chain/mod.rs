//! ChainState: the root-to-current path of displayed nodes
//!
//! Every entry pairs the semantic node id with its displayed instance, so the
//! id sequence and the render-id sequence can never drift apart. The chain is
//! never empty once created: the start node is always its first entry.

use crate::node::{NodeId, NodePayload, RenderId};
use crate::render::DisplayedNode;

/// One displayed node on the path
#[derive(Debug, Clone, PartialEq)]
pub struct ChainEntry {
    pub node_id: NodeId,
    pub payload: NodePayload,
    pub displayed: DisplayedNode,
}

impl ChainEntry {
    pub fn new(payload: NodePayload, displayed: DisplayedNode) -> Self {
        Self {
            node_id: displayed.node_id.clone(),
            payload,
            displayed,
        }
    }

    pub fn render_id(&self) -> RenderId {
        self.displayed.render_id
    }
}

/// Ordered path from the start node to the current tip
#[derive(Debug, Clone)]
pub struct ChainState {
    entries: Vec<ChainEntry>,
    /// Bumped on every mutation; used to detect stale fetch responses
    generation: u64,
}

impl ChainState {
    /// Create a chain holding only the start node
    pub fn new(root: ChainEntry) -> Self {
        Self {
            entries: vec![root],
            generation: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// A chain always holds at least its start node
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn root(&self) -> &ChainEntry {
        &self.entries[0]
    }

    pub fn tip(&self) -> &ChainEntry {
        &self.entries[self.entries.len() - 1]
    }

    pub fn tip_mut(&mut self) -> &mut ChainEntry {
        let last = self.entries.len() - 1;
        &mut self.entries[last]
    }

    pub fn entries(&self) -> &[ChainEntry] {
        &self.entries
    }

    pub fn get(&self, position: usize) -> Option<&ChainEntry> {
        self.entries.get(position)
    }

    pub fn get_mut(&mut self, position: usize) -> Option<&mut ChainEntry> {
        self.entries.get_mut(position)
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.entries.iter().map(|e| e.node_id.clone()).collect()
    }

    pub fn render_ids(&self) -> Vec<RenderId> {
        self.entries.iter().map(|e| e.render_id()).collect()
    }

    /// Position of the deepest entry with the given id
    pub fn position_of(&self, node_id: &NodeId) -> Option<usize> {
        self.entries.iter().rposition(|e| &e.node_id == node_id)
    }

    pub fn contains(&self, node_id: &NodeId) -> bool {
        self.position_of(node_id).is_some()
    }

    /// Pop entries until the deepest occurrence of `node_id` is the tip.
    ///
    /// Returns the removed entries, tip first, or `None` (leaving the chain
    /// untouched) when `node_id` is not on the chain.
    pub fn truncate_to(&mut self, node_id: &NodeId) -> Option<Vec<ChainEntry>> {
        let position = self.position_of(node_id)?;
        Some(self.truncate_to_position(position))
    }

    /// Pop entries until the entry at `position` is the tip.
    ///
    /// Positions past the tip remove nothing.
    pub fn truncate_to_position(&mut self, position: usize) -> Vec<ChainEntry> {
        let mut removed = Vec::new();
        while self.entries.len() > position + 1 {
            if let Some(entry) = self.entries.pop() {
                removed.push(entry);
            }
        }
        self.generation += 1;
        removed
    }

    /// Drop everything above the start node
    pub fn reset(&mut self) -> Vec<ChainEntry> {
        self.truncate_to_position(0)
    }

    /// Append a new tip
    pub fn push(&mut self, entry: ChainEntry) {
        self.entries.push(entry);
        self.generation += 1;
    }
}
