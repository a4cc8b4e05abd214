//! Data-folder backed repository

use super::cache::ResponseCache;
use super::traits::{NodeRepository, RepositoryError, RepositoryResult};
use crate::config::TreeConfig;
use crate::node::{NodeId, NodePayload};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Reads `{dataFolder}{id}.{extension}` documents from disk
///
/// The data folder is a plain prefix: `trees/` reads `trees/dtn-root.json`
/// while `trees/v2_` reads `trees/v2_dtn-root.json`.
#[derive(Debug)]
pub struct FileRepository {
    layout: TreeConfig,
    cache: ResponseCache,
}

impl FileRepository {
    /// Read documents stored directly inside `folder`
    pub fn new(folder: impl AsRef<Path>) -> Self {
        let mut prefix = folder.as_ref().to_string_lossy().into_owned();
        let has_separator = prefix.ends_with('/') || prefix.ends_with(std::path::MAIN_SEPARATOR);
        if !prefix.is_empty() && !has_separator {
            prefix.push(std::path::MAIN_SEPARATOR);
        }
        Self {
            layout: TreeConfig::default().with_data_folder(prefix),
            cache: ResponseCache::new(true),
        }
    }

    /// Build from the `dataFolder`, `resourceExtension` and `cacheResponses` options
    pub fn from_config(config: &TreeConfig) -> Self {
        Self {
            layout: config.clone(),
            cache: ResponseCache::new(config.cache_responses),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.layout.resource_extension = extension.into();
        self
    }

    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache = ResponseCache::new(enabled);
        self
    }

    /// Prefix every resource path starts with
    pub fn data_folder(&self) -> &str {
        &self.layout.data_folder
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// File path of a node; an empty data folder reads from the working directory
    pub fn path_for(&self, id: &NodeId) -> PathBuf {
        let path = self.layout.resource_path(id);
        if self.layout.data_folder.is_empty() {
            Path::new(".").join(path)
        } else {
            PathBuf::from(path)
        }
    }
}

#[async_trait]
impl NodeRepository for FileRepository {
    async fn fetch(&self, id: &NodeId) -> RepositoryResult<NodePayload> {
        let path = self.path_for(id);
        let key = path.to_string_lossy().to_string();

        if let Some(payload) = self.cache.get(&key) {
            tracing::debug!(node = %id, path = %key, "cache hit");
            return Ok(payload);
        }

        tracing::debug!(node = %id, path = %key, "reading node");
        let bytes = tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RepositoryError::NotFound { path: key.clone() }
            } else {
                RepositoryError::Io {
                    path: key.clone(),
                    source: e,
                }
            }
        })?;

        let payload = NodePayload::from_slice(&bytes).map_err(|source| RepositoryError::Malformed {
            id: id.clone(),
            source,
        })?;
        self.cache.insert(key, &payload);
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;

    fn write(dir: &Path, name: &str, body: &str) {
        std::fs::write(dir.join(name), body).unwrap();
    }

    #[tokio::test]
    async fn reads_question_node() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "dtn-root.json",
            r#"{"question": "Start?", "answers": [{"text": "Yes", "target": "dtn-a"}]}"#,
        );

        let repo = FileRepository::new(dir.path());
        let payload = repo.fetch(&NodeId::from("dtn-root")).await.unwrap();
        assert_eq!(payload.kind(), NodeKind::Question);
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileRepository::new(dir.path());
        let err = repo.fetch(&NodeId::from("dtn-nope")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn bad_document_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "dtn-bad.json", r#"{"question": "Start?"}"#);

        let repo = FileRepository::new(dir.path());
        let err = repo.fetch(&NodeId::from("dtn-bad")).await.unwrap_err();
        assert!(err.is_malformed());
    }

    #[tokio::test]
    async fn cached_node_survives_file_removal() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "done.json", r#"{"title": "Done", "description": "ok"}"#);

        let repo = FileRepository::new(dir.path());
        let id = NodeId::from("done");
        repo.fetch(&id).await.unwrap();
        std::fs::remove_file(dir.path().join("done.json")).unwrap();

        assert!(repo.fetch(&id).await.is_ok());
        assert_eq!(repo.cache().len(), 1);
    }

    #[tokio::test]
    async fn uncached_repository_rereads() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "done.json", r#"{"title": "Done", "description": "ok"}"#);

        let repo = FileRepository::new(dir.path()).with_cache(false);
        let id = NodeId::from("done");
        repo.fetch(&id).await.unwrap();
        std::fs::remove_file(dir.path().join("done.json")).unwrap();

        assert!(repo.fetch(&id).await.is_err());
    }

    #[test]
    fn from_config_uses_extension() {
        let config = TreeConfig {
            data_folder: "trees/".to_string(),
            resource_extension: "node".to_string(),
            ..TreeConfig::default()
        };
        let repo = FileRepository::from_config(&config);
        assert_eq!(
            repo.path_for(&NodeId::from("dtn-root")),
            PathBuf::from("trees/dtn-root.node")
        );
    }

    #[test]
    fn empty_folder_reads_working_directory() {
        let repo = FileRepository::from_config(&TreeConfig::default());
        assert_eq!(
            repo.path_for(&NodeId::from("done")),
            Path::new(".").join("done.json")
        );
    }

    #[tokio::test]
    async fn data_folder_is_a_plain_prefix() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "tree_dtn-root.json",
            r#"{"question": "Start?", "answers": [{"text": "Yes", "target": "dtn-a"}]}"#,
        );
        let config = TreeConfig::default()
            .with_data_folder(format!("{}/tree_", dir.path().display()));
        let repo = FileRepository::from_config(&config);
        let id = NodeId::from("dtn-root");

        assert_eq!(repo.path_for(&id), PathBuf::from(config.resource_path(&id)));
        assert_eq!(repo.path_for(&id), dir.path().join("tree_dtn-root.json"));
        let payload = repo.fetch(&id).await.unwrap();
        assert_eq!(payload.kind(), NodeKind::Question);
    }
}
