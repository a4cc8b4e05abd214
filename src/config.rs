//! Widget configuration
//!
//! Keys use the camelCase names of the node resource format so existing
//! configuration files can be reused. Every key is optional.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::node::NodeId;

/// Errors loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Options recognized by a tree widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TreeConfig {
    /// Base path (folder or URL) prepended to every node id
    pub data_folder: String,
    /// Prefix identifying question-node ids
    pub node_prefix: String,
    /// Extension appended to every node id, without the dot
    pub resource_extension: String,
    /// Cache fetched nodes by path
    pub cache_responses: bool,
    /// Transition duration handed to renderers, in milliseconds
    #[serde(rename = "animationDuration")]
    pub animation_duration_ms: u64,
    /// Show the optional description under a question
    pub show_extra_description_text: bool,
    /// Remove the introductory content when the tree starts
    pub hide_original_content: bool,
    /// Link the title (and image) of answer nodes that carry a link
    pub answer_title_is_link: bool,
    /// Browsing context for answer links
    pub answer_link_target: String,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            data_folder: String::new(),
            node_prefix: "dtn".to_string(),
            resource_extension: "json".to_string(),
            cache_responses: true,
            animation_duration_ms: 600,
            show_extra_description_text: true,
            hide_original_content: true,
            answer_title_is_link: true,
            answer_link_target: "_blank".to_string(),
        }
    }
}

impl TreeConfig {
    /// Parse a YAML (or JSON) document
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load a YAML configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    pub fn with_data_folder(mut self, data_folder: impl Into<String>) -> Self {
        self.data_folder = data_folder.into();
        self
    }

    pub fn with_node_prefix(mut self, node_prefix: impl Into<String>) -> Self {
        self.node_prefix = node_prefix.into();
        self
    }

    pub fn with_hide_original_content(mut self, hide: bool) -> Self {
        self.hide_original_content = hide;
        self
    }

    pub fn with_answer_title_is_link(mut self, link: bool) -> Self {
        self.answer_title_is_link = link;
        self
    }

    /// Resource path of a node relative to the data folder root
    ///
    /// `{dataFolder}{id}.{resourceExtension}`, or `{dataFolder}{id}` when the
    /// extension is empty.
    pub fn resource_path(&self, id: &NodeId) -> String {
        if self.resource_extension.is_empty() {
            format!("{}{}", self.data_folder, id)
        } else {
            format!("{}{}.{}", self.data_folder, id, self.resource_extension)
        }
    }
}
