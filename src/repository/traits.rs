//! Repository trait definitions

use crate::node::{NodeId, NodePayload, PayloadError};
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while fetching a node
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("resource not found: {path}")]
    NotFound { path: String },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{path} returned status {status}")]
    Status { path: String, status: u16 },

    #[error("malformed node {id}: {source}")]
    Malformed {
        id: NodeId,
        #[source]
        source: PayloadError,
    },
}

impl RepositoryError {
    /// True when the resource was retrieved but its content is unusable
    pub fn is_malformed(&self) -> bool {
        matches!(self, RepositoryError::Malformed { .. })
    }
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Source of node definitions
///
/// Implementations must be thread-safe (Send + Sync) so one repository can
/// back several widgets. Payloads are classified by shape before they are
/// returned.
#[async_trait]
pub trait NodeRepository: Send + Sync {
    /// Fetch and decode the node with the given id
    async fn fetch(&self, id: &NodeId) -> RepositoryResult<NodePayload>;
}
