//! GitHub ref resolution over the REST API.

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use super::{Platform, RemoteError};

pub const API_BASE: &str = "https://api.github.com";
pub const RAW_BASE: &str = "https://raw.githubusercontent.com";

#[derive(Debug, Deserialize)]
struct CommitResponse {
    sha: String,
}

/// Resolve a branch, tag, or abbreviated SHA to a full commit SHA.
pub async fn resolve_ref(
    client: &Client,
    api_base: &str,
    repo: &str,
    reference: &str,
) -> Result<String, RemoteError> {
    let url = format!("{api_base}/repos/{repo}/commits/{reference}");
    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| RemoteError::new(Platform::Github, repo, reference, e))?;
    if !response.status().is_success() {
        return Err(RemoteError::new(
            Platform::Github,
            repo,
            reference,
            format!("HTTP {}", response.status()),
        ));
    }
    let commit: CommitResponse = response
        .json()
        .await
        .map_err(|e| RemoteError::new(Platform::Github, repo, reference, e))?;
    Ok(commit.sha)
}

/// Fetch the package manifest as published at a ref.
pub async fn fetch_manifest_at(
    client: &Client,
    raw_base: &str,
    repo: &str,
    reference: &str,
    subdir: Option<&str>,
) -> Result<Value, RemoteError> {
    let path = match subdir {
        Some(sub) => format!("{sub}/{}", crate::manifest::MANIFEST_FILE),
        None => crate::manifest::MANIFEST_FILE.to_string(),
    };
    let url = format!("{raw_base}/{repo}/{reference}/{path}");
    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| RemoteError::new(Platform::Github, repo, reference, e))?;
    if !response.status().is_success() {
        return Err(RemoteError::new(
            Platform::Github,
            repo,
            reference,
            format!("HTTP {}", response.status()),
        ));
    }
    response
        .json()
        .await
        .map_err(|e| RemoteError::new(Platform::Github, repo, reference, e))
}

/// Direct-URL specifier pinned to a ref, with the optional in-repo subdir.
pub fn specifier(repo: &str, reference: &str, subdir: Option<&str>) -> String {
    match subdir {
        Some(sub) => format!("https://github.com/{repo}#{reference}&path:/{sub}"),
        None => format!("https://github.com/{repo}#{reference}"),
    }
}
