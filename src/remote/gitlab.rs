//! GitLab ref resolution over the v4 projects API.
//!
//! Project paths (nested groups included) travel URL-encoded in the API
//! path, `group/sub/repo` as `group%2Fsub%2Frepo`.

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use urlencoding::encode;

use super::{Platform, RemoteError};

pub const API_BASE: &str = "https://gitlab.com/api/v4";

#[derive(Debug, Deserialize)]
struct CommitResponse {
    id: String,
}

/// Resolve a branch, tag, or abbreviated SHA to a full commit SHA.
pub async fn resolve_ref(
    client: &Client,
    api_base: &str,
    repo: &str,
    reference: &str,
) -> Result<String, RemoteError> {
    let url = format!(
        "{api_base}/projects/{}/repository/commits/{}",
        encode(repo),
        encode(reference)
    );
    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| RemoteError::new(Platform::Gitlab, repo, reference, e))?;
    if !response.status().is_success() {
        return Err(RemoteError::new(
            Platform::Gitlab,
            repo,
            reference,
            format!("HTTP {}", response.status()),
        ));
    }
    let commit: CommitResponse = response
        .json()
        .await
        .map_err(|e| RemoteError::new(Platform::Gitlab, repo, reference, e))?;
    Ok(commit.id)
}

/// Fetch the package manifest as published at a ref.
pub async fn fetch_manifest_at(
    client: &Client,
    api_base: &str,
    repo: &str,
    reference: &str,
    subdir: Option<&str>,
) -> Result<Value, RemoteError> {
    let path = match subdir {
        Some(sub) => format!("{sub}/{}", crate::manifest::MANIFEST_FILE),
        None => crate::manifest::MANIFEST_FILE.to_string(),
    };
    let url = format!(
        "{api_base}/projects/{}/repository/files/{}/raw?ref={}",
        encode(repo),
        encode(&path),
        encode(reference)
    );
    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| RemoteError::new(Platform::Gitlab, repo, reference, e))?;
    if !response.status().is_success() {
        return Err(RemoteError::new(
            Platform::Gitlab,
            repo,
            reference,
            format!("HTTP {}", response.status()),
        ));
    }
    response
        .json()
        .await
        .map_err(|e| RemoteError::new(Platform::Gitlab, repo, reference, e))
}

/// Tarball archive specifier; pnpm has no native GitLab protocol, so the
/// specifier is a direct archive download URL. `basename` is the last path
/// segment of the repo identifier.
pub fn specifier(repo: &str, reference: &str) -> String {
    let basename = repo.rsplit('/').next().unwrap_or(repo);
    format!("https://gitlab.com/{repo}/-/archive/{reference}/{basename}-{reference}.tar.gz")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specifier_derives_the_basename_from_nested_groups() {
        assert_eq!(
            specifier("group/sub/repo-name", "abc1234"),
            "https://gitlab.com/group/sub/repo-name/-/archive/abc1234/repo-name-abc1234.tar.gz"
        );
    }

    #[test]
    fn specifier_handles_a_flat_repo_path() {
        assert_eq!(
            specifier("group/repo", "deadbeef"),
            "https://gitlab.com/group/repo/-/archive/deadbeef/repo-deadbeef.tar.gz"
        );
    }
}
