//! Per-path response cache shared by the remote repositories

use crate::node::NodePayload;
use dashmap::DashMap;

/// Decoded payloads keyed by resource path
///
/// A disabled cache never stores anything, so every fetch goes to the
/// underlying transport.
#[derive(Debug, Default)]
pub struct ResponseCache {
    enabled: bool,
    entries: DashMap<String, NodePayload>,
}

impl ResponseCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: DashMap::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn get(&self, path: &str) -> Option<NodePayload> {
        if !self.enabled {
            return None;
        }
        self.entries.get(path).map(|r| r.clone())
    }

    pub fn insert(&self, path: impl Into<String>, payload: &NodePayload) {
        if self.enabled {
            self.entries.insert(path.into(), payload.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}
