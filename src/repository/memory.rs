//! In-memory repository

use super::traits::{NodeRepository, RepositoryError, RepositoryResult};
use crate::node::{NodeId, NodePayload};
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Serves raw JSON documents registered up front
///
/// Documents are decoded on every fetch, so a malformed document surfaces
/// the same error a remote repository would report.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    documents: DashMap<NodeId, Value>,
    fetches: AtomicUsize,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a raw document
    pub fn insert(&self, id: impl Into<NodeId>, document: Value) {
        self.documents.insert(id.into(), document);
    }

    /// Register a typed payload
    pub fn insert_payload(
        &self,
        id: impl Into<NodeId>,
        payload: impl Into<NodePayload>,
    ) -> Result<(), serde_json::Error> {
        let document = serde_json::to_value(payload.into())?;
        self.documents.insert(id.into(), document);
        Ok(())
    }

    pub fn with_document(self, id: impl Into<NodeId>, document: Value) -> Self {
        self.insert(id, document);
        self
    }

    pub fn remove(&self, id: &NodeId) -> Option<Value> {
        self.documents.remove(id).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Number of fetches served so far, failed ones included
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl NodeRepository for InMemoryRepository {
    async fn fetch(&self, id: &NodeId) -> RepositoryResult<NodePayload> {
        self.fetches.fetch_add(1, Ordering::Relaxed);

        let document = self
            .documents
            .get(id)
            .map(|r| r.clone())
            .ok_or_else(|| RepositoryError::NotFound {
                path: id.to_string(),
            })?;

        NodePayload::from_value(document).map_err(|source| RepositoryError::Malformed {
            id: id.clone(),
            source,
        })
    }
}
