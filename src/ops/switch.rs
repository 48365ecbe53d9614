//! The source-switching engine.
//!
//! Each operation writes the manifest first, which atomically establishes
//! the new source, then cleans up traces of the previous one. Every cleanup
//! step is idempotent, so a crash mid-sequence never leaves two sources
//! active and a retry converges on the same state.
//!
//! Only the dependency's tracked config drives decisions here; the current
//! manifest specifier is never classified to choose a code path.

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::bundler;
use crate::config::{DEFAULT_DIST_BRANCH, DependencyConfig};
use crate::manifest::Manifest;
use crate::registry;
use crate::remote::{github, gitlab};
use crate::workspace::{WORKSPACE_FILE, WorkspaceFile};

use super::{Context, SwitchError};

/// pnpm's reserved "resolve from this workspace" specifier.
pub const WORKSPACE_SENTINEL: &str = "workspace:*";

/// How the caller pinned the remote ref, if at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefRequest {
    /// Use the given ref text verbatim in the specifier.
    Raw(String),
    /// Resolve the given ref name to a commit SHA first.
    Resolve(String),
    /// Resolve the configured dist branch.
    DistBranch,
}

/// What a switch wrote, for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchOutcome {
    pub name: String,
    pub specifier: String,
}

fn missing(name: &str, kind: &'static str) -> SwitchError {
    SwitchError::MissingSourceConfig {
        name: name.to_string(),
        kind,
    }
}

/// Point the dependency at its local working copy.
pub fn switch_local(
    ctx: &Context,
    name: &str,
    cfg: &DependencyConfig,
) -> Result<SwitchOutcome, SwitchError> {
    let local_path = cfg.local_path.as_deref().ok_or_else(|| missing(name, "local"))?;

    let mut manifest = Manifest::load(&ctx.project_root)?;
    manifest.set_specifier(name, WORKSPACE_SENTINEL)?;
    manifest.save()?;

    let root = workspace_root(&ctx.project_root);
    debug!("Workspace root for {:?} is {:?}", ctx.project_root, root);
    let member = member_path(&root, &ctx.project_root, local_path);
    let mut file = WorkspaceFile::load(&root)?.unwrap_or_default();
    file.add_member(&member);
    if root == ctx.project_root {
        file.prepend_self();
    }
    file.save(&root)?;

    bundler::toggle_exclusion(&ctx.project_root, name, true)?;

    Ok(SwitchOutcome {
        name: name.to_string(),
        specifier: WORKSPACE_SENTINEL.to_string(),
    })
}

/// Pin the dependency to a GitHub ref.
pub async fn switch_github(
    ctx: &Context,
    name: &str,
    cfg: &DependencyConfig,
    request: RefRequest,
) -> Result<SwitchOutcome, SwitchError> {
    let repo = cfg.github.as_deref().ok_or_else(|| missing(name, "github"))?;
    let reference = match request {
        RefRequest::Raw(reference) => reference,
        RefRequest::Resolve(reference) => {
            github::resolve_ref(&ctx.client, &ctx.github_api, repo, &reference).await?
        }
        RefRequest::DistBranch => {
            let branch = cfg.dist_branch.as_deref().unwrap_or(DEFAULT_DIST_BRANCH);
            github::resolve_ref(&ctx.client, &ctx.github_api, repo, branch).await?
        }
    };
    debug!("Pinning {} to {}#{}", name, repo, reference);

    let specifier = github::specifier(repo, &reference, cfg.subdir.as_deref());
    activate_remote(ctx, name, cfg, &specifier)?;
    Ok(SwitchOutcome {
        name: name.to_string(),
        specifier,
    })
}

/// Pin the dependency to a GitLab ref (tarball specifier).
pub async fn switch_gitlab(
    ctx: &Context,
    name: &str,
    cfg: &DependencyConfig,
    request: RefRequest,
) -> Result<SwitchOutcome, SwitchError> {
    let repo = cfg.gitlab.as_deref().ok_or_else(|| missing(name, "gitlab"))?;
    let reference = match request {
        RefRequest::Raw(reference) => reference,
        RefRequest::Resolve(reference) => {
            gitlab::resolve_ref(&ctx.client, &ctx.gitlab_api, repo, &reference).await?
        }
        RefRequest::DistBranch => {
            let branch = cfg.dist_branch.as_deref().unwrap_or(DEFAULT_DIST_BRANCH);
            gitlab::resolve_ref(&ctx.client, &ctx.gitlab_api, repo, branch).await?
        }
    };
    debug!("Pinning {} to {}#{}", name, repo, reference);

    let specifier = gitlab::specifier(repo, &reference);
    activate_remote(ctx, name, cfg, &specifier)?;
    Ok(SwitchOutcome {
        name: name.to_string(),
        specifier,
    })
}

/// Point the dependency at a published registry version.
pub async fn switch_npm(
    ctx: &Context,
    name: &str,
    cfg: &DependencyConfig,
    version: Option<String>,
) -> Result<SwitchOutcome, SwitchError> {
    let package = cfg.npm.as_deref().unwrap_or(name);
    let version = match version {
        Some(version) => version.trim_start_matches('^').to_string(),
        None => registry::latest_version(&ctx.client, &ctx.npm_registry, package).await?,
    };

    let specifier = format!("^{version}");
    activate_remote(ctx, name, cfg, &specifier)?;
    Ok(SwitchOutcome {
        name: name.to_string(),
        specifier,
    })
}

/// Establish a remote specifier and scrub every trace of the local source.
///
/// The manifest write (specifier plus override cleanup, one rewrite) comes
/// first; membership and bundler cleanup follow and are each independently
/// safe to retry or skip.
fn activate_remote(
    ctx: &Context,
    name: &str,
    cfg: &DependencyConfig,
    specifier: &str,
) -> Result<(), SwitchError> {
    let mut manifest = Manifest::load(&ctx.project_root)?;
    manifest.set_specifier(name, specifier)?;
    manifest.remove_override(name);
    manifest.save()?;

    if let Some(local_path) = cfg.local_path.as_deref() {
        let root = workspace_root(&ctx.project_root);
        if let Some(mut file) = WorkspaceFile::load(&root)? {
            let member = member_path(&root, &ctx.project_root, local_path);
            if file.remove_member(&member) {
                if root == ctx.project_root {
                    file.save_or_remove(&root)?;
                } else {
                    // Ancestor workspace roots are never deleted; unrelated
                    // members may live there.
                    file.save(&root)?;
                }
            }
        }
    }

    bundler::toggle_exclusion(&ctx.project_root, name, false)?;
    Ok(())
}

/// Monorepo-aware workspace root: the nearest ancestor already carrying a
/// workspace file wins, otherwise the project root itself.
fn workspace_root(project_root: &Path) -> PathBuf {
    let mut current = project_root.parent();
    while let Some(dir) = current {
        if dir.join(WORKSPACE_FILE).exists() {
            return dir.to_path_buf();
        }
        current = dir.parent();
    }
    project_root.to_path_buf()
}

/// Membership entry for the dependency's working copy, relative to the
/// workspace root. At the project's own root this is the configured path
/// verbatim.
fn member_path(workspace_root: &Path, project_root: &Path, local_path: &str) -> String {
    if workspace_root == project_root {
        return local_path.to_string();
    }
    let absolute = normalize(&project_root.join(local_path));
    match absolute.strip_prefix(workspace_root) {
        Ok(relative) => relative.to_string_lossy().replace('\\', "/"),
        Err(_) => local_path.to_string(),
    }
}

/// Lexical normalization; the target may not exist yet, so no canonicalize.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                out.pop();
            }
            Component::CurDir => {}
            other => out.push(other),
        }
    }
    out
}
