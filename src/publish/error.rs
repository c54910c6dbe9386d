use std::path::PathBuf;

/// Errors that can occur while publishing the dashboard
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// The credential file could not be read
    #[error("Failed to read credential from {}: {source}", path.display())]
    Credential {
        /// Credential file path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The credential file exists but holds no token
    #[error("Credential file {} is empty", .0.display())]
    EmptyCredential(PathBuf),

    /// Repository is not of the form `owner/name`
    #[error("Invalid repository '{0}', expected owner/name")]
    InvalidRepository(String),

    /// The API base is not an absolute URL that can carry a path
    #[error("Invalid API base URL '{0}'")]
    InvalidApiBase(String),

    /// Transport failure or unreadable response
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote rejected the credential
    #[error("Unauthorized (HTTP {0}); check the token's repository permissions")]
    Unauthorized(u16),

    /// The file changed remotely between reading its revision and writing
    #[error("Conflicting update: {0}")]
    Conflict(String),

    /// Any other unexpected status
    #[error("Unexpected HTTP {status}: {body}")]
    Status {
        /// Response status code
        status: u16,
        /// Response body
        body: String,
    },
}
