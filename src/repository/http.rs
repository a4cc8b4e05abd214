//! HTTP backed repository

use super::cache::ResponseCache;
use super::traits::{NodeRepository, RepositoryError, RepositoryResult};
use crate::config::TreeConfig;
use crate::node::{NodeId, NodePayload};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Fetches `{base_url}{id}.{extension}` documents over HTTP
#[derive(Debug, Clone)]
pub struct HttpRepository {
    layout: TreeConfig,
    http_client: reqwest::Client,
    cache: Arc<ResponseCache>,
}

impl HttpRepository {
    /// Create a repository rooted at `base_url`.
    ///
    /// The base URL is used verbatim as a prefix, so it normally ends in `/`.
    pub fn new(base_url: impl Into<String>) -> RepositoryResult<Self> {
        Self::from_config(&TreeConfig::default().with_data_folder(base_url))
    }

    /// Build from the `dataFolder`, `resourceExtension` and `cacheResponses` options
    pub fn from_config(config: &TreeConfig) -> RepositoryResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            layout: config.clone(),
            http_client,
            cache: Arc::new(ResponseCache::new(config.cache_responses)),
        })
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.layout.resource_extension = extension.into();
        self
    }

    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache = Arc::new(ResponseCache::new(enabled));
        self
    }

    /// Use a preconfigured client, e.g. one with custom proxy or TLS settings
    pub fn with_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = http_client;
        self
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// URL of a node
    pub fn url_for(&self, id: &NodeId) -> String {
        self.layout.resource_path(id)
    }
}

#[async_trait]
impl NodeRepository for HttpRepository {
    async fn fetch(&self, id: &NodeId) -> RepositoryResult<NodePayload> {
        let url = self.url_for(id);

        if let Some(payload) = self.cache.get(&url) {
            tracing::debug!(node = %id, url = %url, "cache hit");
            return Ok(payload);
        }

        tracing::debug!(node = %id, url = %url, "requesting node");
        let response = self.http_client.get(&url).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RepositoryError::NotFound { path: url });
        }
        if !status.is_success() {
            return Err(RepositoryError::Status {
                path: url,
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        let payload = NodePayload::from_slice(&bytes).map_err(|source| RepositoryError::Malformed {
            id: id.clone(),
            source,
        })?;
        self.cache.insert(url, &payload);
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;
    use crate::render::HtmlRenderer;
    use crate::traversal::{TraversalController, TraversalError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const ROOT: &str = r#"{"question": "Start?", "answers": [{"text": "Yes", "target": "dtn-a"}]}"#;

    fn response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
    }

    /// Serve one canned response per connection, in order; returns the base
    /// URL and the number of connections accepted
    async fn serve(responses: Vec<String>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}/", listener.local_addr().unwrap());
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        tokio::spawn(async move {
            for canned in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                counter.fetch_add(1, Ordering::SeqCst);

                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = socket.read(&mut buf).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..n]);
                }
                socket.write_all(canned.as_bytes()).await.unwrap();
                let _ = socket.shutdown().await;
            }
        });
        (base, hits)
    }

    fn repository(base: &str) -> HttpRepository {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        HttpRepository::new(base).unwrap().with_client(client)
    }

    #[test]
    fn url_joins_base_id_and_extension() {
        let repo = HttpRepository::new("https://example.org/tree/").unwrap();
        assert_eq!(
            repo.url_for(&NodeId::from("dtn-root")),
            "https://example.org/tree/dtn-root.json"
        );
    }

    #[test]
    fn from_config_respects_options() {
        let config = TreeConfig {
            data_folder: "http://localhost:8080/".to_string(),
            resource_extension: String::new(),
            cache_responses: false,
            ..TreeConfig::default()
        };
        let repo = HttpRepository::from_config(&config).unwrap();
        let id = NodeId::from("done");
        assert_eq!(repo.url_for(&id), "http://localhost:8080/done");
        assert_eq!(repo.url_for(&id), config.resource_path(&id));
        assert!(!repo.cache().is_enabled());
    }

    #[tokio::test]
    async fn fetch_decodes_success() {
        let (base, hits) = serve(vec![response("200 OK", ROOT)]).await;
        let repo = repository(&base);

        let payload = repo.fetch(&NodeId::from("dtn-root")).await.unwrap();
        assert_eq!(payload.kind(), NodeKind::Question);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn not_found_status_maps_to_not_found() {
        let (base, _) = serve(vec![response("404 Not Found", "")]).await;
        let repo = repository(&base);

        let err = repo.fetch(&NodeId::from("dtn-gone")).await.unwrap_err();
        match err {
            RepositoryError::NotFound { path } => assert!(path.ends_with("/dtn-gone.json")),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn server_error_maps_to_status() {
        let (base, _) = serve(vec![response("503 Service Unavailable", "busy")]).await;
        let repo = repository(&base);

        let err = repo.fetch(&NodeId::from("dtn-root")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn bad_body_maps_to_malformed() {
        let (base, _) = serve(vec![response("200 OK", r#"{"question": 42}"#)]).await;
        let repo = repository(&base);

        let err = repo.fetch(&NodeId::from("dtn-root")).await.unwrap_err();
        assert!(err.is_malformed());
    }

    #[tokio::test]
    async fn cache_hit_skips_network() {
        // the server answers a single connection only
        let (base, hits) = serve(vec![response("200 OK", ROOT)]).await;
        let repo = repository(&base);
        let id = NodeId::from("dtn-root");

        repo.fetch(&id).await.unwrap();
        let again = repo.fetch(&id).await.unwrap();

        assert_eq!(again.kind(), NodeKind::Question);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(repo.cache().len(), 1);
    }

    #[tokio::test]
    async fn uncached_repository_refetches() {
        let (base, hits) = serve(vec![response("200 OK", ROOT), response("200 OK", ROOT)]).await;
        let repo = repository(&base).with_cache(false);
        let id = NodeId::from("dtn-root");

        repo.fetch(&id).await.unwrap();
        repo.fetch(&id).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn controller_reports_malformed_body_separately() {
        let (base, _) = serve(vec![response("200 OK", "not json")]).await;
        let repo = Arc::new(repository(&base));
        let config = TreeConfig::default();
        let mut ctl = TraversalController::new(repo, HtmlRenderer::new(&config), config);

        let err = ctl.start("dtn-root").await.unwrap_err();
        assert!(matches!(err, TraversalError::MalformedPayload { .. }));
        assert!(!ctl.is_started());
    }
}
