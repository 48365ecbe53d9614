//! Domain errors for source-switching operations.

use thiserror::Error;

use crate::config::{ConfigError, LookupError};
use crate::manifest::ManifestError;
use crate::remote::RemoteError;

#[derive(Error, Debug)]
pub enum SwitchError {
    #[error("dependency '{name}' has no {kind} source configured; add one with 'depflip set'")]
    MissingSourceConfig { name: String, kind: &'static str },

    #[error("conflicting ref flags: {0}")]
    ConflictingFlags(&'static str),

    #[error(transparent)]
    RemoteResolutionFailed(#[from] RemoteError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
