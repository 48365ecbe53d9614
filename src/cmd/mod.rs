//! Command handlers.
//!
//! Thin boundary layer: pick the target dependency, assemble a typed
//! request, call the engine, report, optionally trigger the install step.

pub mod check;
pub mod init;
pub mod list;
pub mod switch;

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::config::{self, ConfigDocument};

/// Project root plus its config document, loaded once per invocation.
pub(crate) fn project_env() -> Result<(PathBuf, ConfigDocument)> {
    let cwd = std::env::current_dir()?;
    let root = crate::find_project_root(&cwd)
        .context("no package.json found in this directory or any parent")?;
    let config = ConfigDocument::load(&config::project_config_path(&root))?;
    Ok((root, config))
}

/// The addressed config document: user-global or the project's.
pub(crate) fn config_env(global: bool) -> Result<(PathBuf, ConfigDocument, Option<PathBuf>)> {
    if global {
        let path = crate::global_config_path();
        let config = ConfigDocument::load(&path)?;
        Ok((path, config, None))
    } else {
        let (root, config) = project_env()?;
        Ok((config::project_config_path(&root), config, Some(root)))
    }
}
