//! Shared switch context.
//!
//! Groups the per-invocation state every switch operation needs, built once
//! at the command boundary and threaded through as a value. The endpoint
//! bases are fields so tests can point them at a mock server.

use std::path::PathBuf;

use reqwest::Client;

use crate::registry;
use crate::remote::{github, gitlab};

#[derive(Debug, Clone)]
pub struct Context {
    pub project_root: PathBuf,
    pub client: Client,
    pub github_api: String,
    pub github_raw: String,
    pub gitlab_api: String,
    pub npm_registry: String,
}

impl Context {
    pub fn new(project_root: PathBuf, client: Client) -> Self {
        Self {
            project_root,
            client,
            github_api: github::API_BASE.to_string(),
            github_raw: github::RAW_BASE.to_string(),
            gitlab_api: gitlab::API_BASE.to_string(),
            npm_registry: registry::REGISTRY_BASE.to_string(),
        }
    }
}
