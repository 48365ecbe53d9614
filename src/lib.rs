//! depflip - dependency source flipper
//!
//! Flips a pnpm dependency between four sources - a local workspace
//! checkout, a GitHub ref, a GitLab ref, or a published npm version -
//! while keeping `package.json`, `pnpm-workspace.yaml`, and the vite
//! config consistent.
//!
//! # Architecture
//!
//! - **cmd**: thin command handlers; select the target dependency, build a
//!   typed request, call the engine, report.
//! - **ops**: the source-switching engine. Writes the manifest first to
//!   establish the new source, then cleans up traces of the previous one;
//!   every cleanup step is idempotent.
//! - Collaborator modules (`manifest`, `workspace`, `bundler`, `remote`,
//!   `registry`, `install`) each own exactly one file or API surface.
//!
//! The manifest specifier string is the single source of truth for which
//! source is active; nothing else persists that state.

pub mod bundler;
pub mod cmd;
pub mod config;
pub mod install;
pub mod manifest;
pub mod ops;
pub mod registry;
pub mod remote;
pub mod status;
pub mod workspace;

use std::path::{Path, PathBuf};

use dirs::config_dir;

/// Returns the depflip config directory, or None if the user's config
/// directory cannot be resolved.
pub fn try_depflip_home() -> Option<PathBuf> {
    if let Ok(val) = std::env::var("DEPFLIP_HOME") {
        return Some(PathBuf::from(val));
    }
    config_dir().map(|d| d.join("depflip"))
}

/// Returns the canonical depflip config directory.
///
/// # Panics
/// Panics if the user's config directory cannot be determined.
pub fn depflip_home() -> PathBuf {
    try_depflip_home().expect("Could not determine config directory")
}

/// Global (user-scoped) config document path.
pub fn global_config_path() -> PathBuf {
    depflip_home().join("config.json")
}

/// Nearest ancestor of `start` (inclusive) holding a package manifest.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(manifest::MANIFEST_FILE).exists() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}

/// User Agent string
pub const USER_AGENT: &str = concat!("depflip/", env!("CARGO_PKG_VERSION"));
