//! # Publishing
//!
//! Pushes the rendered page to a remote repository so it can be served as a
//! static site. A [`Publisher`] receives the full page content each
//! iteration; the remote decides whether that creates or replaces the file.

mod error;
mod github;

use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

pub use error::PublishError;
pub use github::GitHubPublisher;

/// Pushes page content to a remote location.
pub trait Publisher {
    /// Publish `content`, replacing whatever is there.
    fn publish(&self, content: &str) -> Result<PublishReceipt, PublishError>;
}

/// What the remote did with the content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishAction {
    /// The file did not exist and was created
    Created,
    /// An existing file was replaced
    Updated,
}

impl fmt::Display for PublishAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishAction::Created => write!(f, "created"),
            PublishAction::Updated => write!(f, "updated"),
        }
    }
}

/// Result of a successful publish
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    /// Create or update
    pub action: PublishAction,
    /// Commit produced by the write, if the remote reported one
    pub commit_sha: Option<String>,
}

impl fmt::Display for PublishReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.commit_sha {
            Some(sha) => write!(f, "{} ({})", self.action, short_sha(sha)),
            None => write!(f, "{}", self.action),
        }
    }
}

fn short_sha(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}

/// Settings for publishing through the GitHub contents API.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Publish after each iteration
    pub enabled: bool,
    /// API root
    pub api_base: String,
    /// Target repository as `owner/name`
    pub repository: String,
    /// Target branch
    pub branch: String,
    /// Path of the page inside the repository
    pub path: String,
    /// File holding the access token
    pub token_file: PathBuf,
    /// Commit message
    pub message: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_base: "https://api.github.com".to_string(),
            repository: "ohadshapira/tevel2".to_string(),
            branch: "main".to_string(),
            path: "index.html".to_string(),
            token_file: PathBuf::from("github_token.txt"),
            message: "Update dashboard HTML".to_string(),
            timeout_secs: 30,
        }
    }
}
