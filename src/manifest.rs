//! `package.json` accessor.
//!
//! Only the named dependency's specifier, the `pnpm.overrides` map, and
//! (for the explicit init/purge flows) the dependency entry itself are ever
//! touched. The document is rewritten whole, two-space indent, trailing
//! newline, key order preserved.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

/// The package manager's manifest file name.
pub const MANIFEST_FILE: &str = "package.json";

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("no package.json found in {}", .0.display())]
    Missing(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse package.json: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("dependency '{0}' is not declared in package.json")]
    DependencyNotDeclared(String),
}

/// Which dependency table an entry lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyGroup {
    Primary,
    Dev,
}

impl DependencyGroup {
    fn key(self) -> &'static str {
        match self {
            DependencyGroup::Primary => "dependencies",
            DependencyGroup::Dev => "devDependencies",
        }
    }
}

const GROUPS: [DependencyGroup; 2] = [DependencyGroup::Primary, DependencyGroup::Dev];

#[derive(Debug)]
pub struct Manifest {
    path: PathBuf,
    doc: Value,
}

impl Manifest {
    pub fn load(project_root: &Path) -> Result<Self, ManifestError> {
        let path = project_root.join(MANIFEST_FILE);
        if !path.exists() {
            return Err(ManifestError::Missing(project_root.to_path_buf()));
        }
        let content = fs::read_to_string(&path)?;
        let doc: Value = serde_json::from_str(&content)?;
        Ok(Self { path, doc })
    }

    pub fn save(&self) -> Result<(), ManifestError> {
        let mut content = serde_json::to_string_pretty(&self.doc)?;
        content.push('\n');
        fs::write(&self.path, content)?;
        Ok(())
    }

    fn group(&self, group: DependencyGroup) -> Option<&Map<String, Value>> {
        self.doc.get(group.key())?.as_object()
    }

    /// The active specifier for `name`, searching both groups.
    pub fn specifier(&self, name: &str) -> Option<&str> {
        GROUPS
            .into_iter()
            .find_map(|group| self.group(group)?.get(name)?.as_str())
    }

    pub fn group_of(&self, name: &str) -> Option<DependencyGroup> {
        GROUPS
            .into_iter()
            .find(|group| self.group(*group).is_some_and(|map| map.contains_key(name)))
    }

    pub fn has_dependency(&self, name: &str) -> bool {
        self.group_of(name).is_some()
    }

    /// Overwrite the specifier in whichever group declares the dependency.
    ///
    /// Switching never adds entries implicitly; an undeclared name is
    /// `DependencyNotDeclared`.
    pub fn set_specifier(&mut self, name: &str, value: &str) -> Result<(), ManifestError> {
        let group = self
            .group_of(name)
            .ok_or_else(|| ManifestError::DependencyNotDeclared(name.to_string()))?;
        self.doc[group.key()][name] = Value::String(value.to_string());
        Ok(())
    }

    /// Declare a dependency, creating the group table if needed.
    pub fn add_dependency(&mut self, name: &str, group: DependencyGroup, value: &str) {
        if !self.doc[group.key()].is_object() {
            self.doc[group.key()] = Value::Object(Map::new());
        }
        self.doc[group.key()][name] = Value::String(value.to_string());
    }

    /// Drop a dependency from both groups; true when anything was removed.
    pub fn remove_dependency(&mut self, name: &str) -> bool {
        let mut removed = false;
        for group in GROUPS {
            if let Some(map) = self.doc.get_mut(group.key()).and_then(Value::as_object_mut) {
                // shift_remove: plain remove would swap in the last key and
                // scramble the order of untouched siblings.
                removed |= map.shift_remove(name).is_some();
            }
        }
        removed
    }

    /// Drop `name` from `pnpm.overrides`.
    ///
    /// An emptied overrides map is removed, and a `pnpm` block emptied by
    /// that removal goes with it; sibling keys are left alone.
    pub fn remove_override(&mut self, name: &str) {
        let pnpm_empty = {
            let Some(pnpm) = self.doc.get_mut("pnpm").and_then(Value::as_object_mut) else {
                return;
            };
            if let Some(overrides) = pnpm.get_mut("overrides").and_then(Value::as_object_mut) {
                overrides.shift_remove(name);
                if overrides.is_empty() {
                    pnpm.shift_remove("overrides");
                }
            }
            pnpm.is_empty()
        };
        if pnpm_empty {
            if let Some(root) = self.doc.as_object_mut() {
                root.shift_remove("pnpm");
            }
        }
    }
}
