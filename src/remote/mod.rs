//! Remote platform API collaborators.
//!
//! One capability pair per platform: resolve a named ref to a commit SHA,
//! and fetch the package manifest at a ref. Plain sequential HTTP calls
//! with no internal retry; a failure carries the platform, repo, and ref
//! for diagnostics.

pub mod github;
pub mod gitlab;

use std::fmt;

use anyhow::Result;
use reqwest::header;
use thiserror::Error;

use crate::USER_AGENT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Github,
    Gitlab,
    Npm,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Platform::Github => "GitHub",
            Platform::Gitlab => "GitLab",
            Platform::Npm => "npm",
        };
        write!(f, "{label}")
    }
}

/// A failed platform lookup. Never retried; the switch sequence stops here.
#[derive(Error, Debug)]
#[error("failed to resolve {platform} ref '{reference}' of {repo}: {message}")]
pub struct RemoteError {
    pub platform: Platform,
    pub repo: String,
    pub reference: String,
    pub message: String,
}

impl RemoteError {
    pub fn new(
        platform: Platform,
        repo: &str,
        reference: &str,
        message: impl ToString,
    ) -> Self {
        Self {
            platform,
            repo: repo.to_string(),
            reference: reference.to_string(),
            message: message.to_string(),
        }
    }
}

/// Build an API client with our user agent and optional bearer auth.
pub fn build_client(token: Option<&str>) -> Result<reqwest::Client> {
    let mut headers = header::HeaderMap::new();
    headers.insert(header::USER_AGENT, header::HeaderValue::from_static(USER_AGENT));

    if let Some(t) = token {
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {t}"))?,
        );
    }

    Ok(reqwest::Client::builder()
        .default_headers(headers)
        .build()?)
}
