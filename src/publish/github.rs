use std::path::PathBuf;
use std::time::Duration;

use base64::prelude::*;
use log::{debug, info};
use reqwest::blocking::{Client, Response};
use reqwest::header::ACCEPT;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};

use super::{GitHubConfig, PublishAction, PublishError, PublishReceipt, Publisher};

const USER_AGENT: &str = concat!("satdash/", env!("CARGO_PKG_VERSION"));
const MEDIA_TYPE: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";

/// Publishes a single file through the GitHub repository contents API.
///
/// Each publish reads the current revision of the file (if any) and writes
/// the new content on top of it. The token is re-read from disk every time,
/// so it can be rotated without restarting.
pub struct GitHubPublisher {
    client: Client,
    contents_url: Url,
    branch: String,
    message: String,
    token_file: PathBuf,
}

#[derive(Debug, Deserialize)]
struct ContentsEntry {
    sha: String,
}

#[derive(Debug, Serialize)]
struct ContentsUpdate<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct UpdateResponse {
    commit: Option<CommitRef>,
}

#[derive(Debug, Deserialize)]
struct CommitRef {
    sha: Option<String>,
}

impl GitHubPublisher {
    /// Create a publisher. Fails on a malformed repository name.
    pub fn new(config: &GitHubConfig) -> Result<Self, PublishError> {
        let (owner, name) = parse_repository(&config.repository)?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let contents_url = contents_url(&config.api_base, owner, name, &config.path)?;

        Ok(Self {
            client,
            contents_url,
            branch: config.branch.clone(),
            message: config.message.clone(),
            token_file: config.token_file.clone(),
        })
    }

    /// Endpoint of the published file.
    pub fn contents_url(&self) -> &str {
        self.contents_url.as_str()
    }

    fn read_token(&self) -> Result<String, PublishError> {
        let raw = std::fs::read_to_string(&self.token_file).map_err(|source| {
            PublishError::Credential {
                path: self.token_file.clone(),
                source,
            }
        })?;
        let token = raw.trim();
        if token.is_empty() {
            return Err(PublishError::EmptyCredential(self.token_file.clone()));
        }
        Ok(token.to_string())
    }

    /// Revision of the current file, `None` when it does not exist yet.
    fn current_sha(&self, token: &str) -> Result<Option<String>, PublishError> {
        let response = self
            .client
            .get(self.contents_url.clone())
            .query(&[("ref", self.branch.as_str())])
            .bearer_auth(token)
            .header(ACCEPT, MEDIA_TYPE)
            .header(API_VERSION_HEADER, API_VERSION)
            .send()?;

        match response.status() {
            StatusCode::OK => {
                let entry: ContentsEntry = response.json()?;
                debug!("Current revision of {}: {}", self.contents_url, entry.sha);
                Ok(Some(entry.sha))
            }
            StatusCode::NOT_FOUND => Ok(None),
            _ => Err(status_error(response)),
        }
    }

    fn put_contents(
        &self,
        token: &str,
        content: &str,
        sha: Option<&str>,
    ) -> Result<Option<String>, PublishError> {
        let body = ContentsUpdate {
            message: &self.message,
            content: BASE64_STANDARD.encode(content),
            branch: &self.branch,
            sha,
        };

        let response = self
            .client
            .put(self.contents_url.clone())
            .bearer_auth(token)
            .header(ACCEPT, MEDIA_TYPE)
            .header(API_VERSION_HEADER, API_VERSION)
            .json(&body)
            .send()?;

        let status = response.status();
        if status.is_success() {
            let update: UpdateResponse = response.json()?;
            return Ok(update.commit.and_then(|c| c.sha));
        }
        match status {
            StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                Err(PublishError::Conflict(response.text().unwrap_or_default()))
            }
            _ => Err(status_error(response)),
        }
    }
}

impl Publisher for GitHubPublisher {
    fn publish(&self, content: &str) -> Result<PublishReceipt, PublishError> {
        let token = self.read_token()?;
        let sha = self.current_sha(&token)?;
        let action = if sha.is_some() {
            PublishAction::Updated
        } else {
            PublishAction::Created
        };

        let commit_sha = self.put_contents(&token, content, sha.as_deref())?;
        info!("Published {} ({})", self.contents_url, action);

        Ok(PublishReceipt { action, commit_sha })
    }
}

fn status_error(response: Response) -> PublishError {
    let status = response.status();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            PublishError::Unauthorized(status.as_u16())
        }
        _ => PublishError::Status {
            status: status.as_u16(),
            body: response.text().unwrap_or_default(),
        },
    }
}

/// Contents endpoint with every path segment percent-encoded.
fn contents_url(api_base: &str, owner: &str, name: &str, path: &str) -> Result<Url, PublishError> {
    let invalid = || PublishError::InvalidApiBase(api_base.to_string());
    let mut url = Url::parse(api_base).map_err(|_| invalid())?;
    url.path_segments_mut()
        .map_err(|_| invalid())?
        .pop_if_empty()
        .extend(["repos", owner, name, "contents"])
        .extend(path.split('/').filter(|segment| !segment.is_empty()));
    Ok(url)
}

fn parse_repository(repository: &str) -> Result<(&str, &str), PublishError> {
    match repository.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok((owner, name))
        }
        _ => Err(PublishError::InvalidRepository(repository.to_string())),
    }
}
