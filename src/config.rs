//! Tracked-dependency configuration documents.
//!
//! Two instances exist: a project-scoped `depflip.json` next to the project
//! manifest, and a user-global `config.json` under the depflip config
//! directory. Each is loaded and saved as a whole JSON document; a single
//! invocation only ever mutates one of them.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Project-scoped config file name, resolved at the project root.
pub const PROJECT_CONFIG_FILE: &str = "depflip.json";

/// Branch assumed to hold pre-built output when none is configured.
pub const DEFAULT_DIST_BRANCH: &str = "dist";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Name-selection failures, surfaced verbatim to the user.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LookupError {
    #[error("{}", ambiguous_message(.0))]
    AmbiguousSelection(Vec<String>),

    #[error("no tracked dependency matches '{0}'")]
    NotFound(String),
}

fn ambiguous_message(candidates: &[String]) -> String {
    if candidates.is_empty() {
        "no dependencies are tracked yet; run 'depflip init <name>' first".to_string()
    } else {
        format!(
            "dependency selection is ambiguous, candidates: {}",
            candidates.join(", ")
        )
    }
}

/// The known sources of one tracked dependency.
///
/// None of the fields is required at config-time; a missing source only
/// becomes an error when a switch actually targets it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyConfig {
    /// Working-copy path, relative to the project root (absolute in global
    /// mode).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_path: Option<String>,

    /// GitHub repository as `owner/repo`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,

    /// GitLab repository path; nested groups allowed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gitlab: Option<String>,

    /// Registry package name when it differs from the manifest key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub npm: Option<String>,

    /// Branch holding pre-built output; `dist` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dist_branch: Option<String>,

    /// In-repo subdirectory of the package, for monorepo upstreams.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subdir: Option<String>,
}

/// When `depflip check` should refuse local sources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CheckPolicy {
    PrePush,
    PreCommit,
    #[default]
    None,
}

/// One whole config document, project- or user-scoped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(default)]
    pub dependencies: BTreeMap<String, DependencyConfig>,

    #[serde(rename = "checkOn", skip_serializing_if = "Option::is_none")]
    pub check_on: Option<CheckPolicy>,
}

impl ConfigDocument {
    /// Load a document; an absent file is an empty document.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Whole-document rewrite: two-space indent, trailing newline.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut content = serde_json::to_string_pretty(self)?;
        content.push('\n');
        fs::write(path, content)?;
        Ok(())
    }

    fn names(&self) -> Vec<String> {
        self.dependencies.keys().cloned().collect()
    }

    /// Three-tier name selection.
    ///
    /// No query succeeds only when exactly one dependency is tracked. A
    /// query first tries a case-insensitive exact match, then a
    /// case-insensitive substring match that must hit exactly one entry.
    pub fn find_by_name(
        &self,
        query: Option<&str>,
    ) -> Result<(&str, &DependencyConfig), LookupError> {
        let Some(query) = query else {
            if self.dependencies.len() == 1 {
                let (name, dep) = self.dependencies.iter().next().unwrap();
                return Ok((name.as_str(), dep));
            }
            return Err(LookupError::AmbiguousSelection(self.names()));
        };

        let needle = query.to_lowercase();
        if let Some((name, dep)) = self
            .dependencies
            .iter()
            .find(|(name, _)| name.to_lowercase() == needle)
        {
            return Ok((name.as_str(), dep));
        }

        let hits: Vec<(&String, &DependencyConfig)> = self
            .dependencies
            .iter()
            .filter(|(name, _)| name.to_lowercase().contains(&needle))
            .collect();
        match hits.as_slice() {
            [] => Err(LookupError::NotFound(query.to_string())),
            [(name, dep)] => Ok((name.as_str(), *dep)),
            _ => Err(LookupError::AmbiguousSelection(
                hits.iter().map(|(name, _)| (*name).clone()).collect(),
            )),
        }
    }
}

/// Project config document path under a project root.
pub fn project_config_path(root: &Path) -> PathBuf {
    root.join(PROJECT_CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn doc_with(names: &[&str]) -> ConfigDocument {
        let mut doc = ConfigDocument::default();
        for name in names {
            doc.dependencies
                .insert((*name).to_string(), DependencyConfig::default());
        }
        doc
    }

    #[test]
    fn no_query_with_single_dependency_selects_it() {
        let doc = doc_with(&["@x/y"]);
        let (name, _) = doc.find_by_name(None).unwrap();
        assert_eq!(name, "@x/y");
    }

    #[test]
    fn no_query_with_two_dependencies_is_ambiguous_listing_both() {
        let doc = doc_with(&["@x/a", "@x/b"]);
        assert_eq!(
            doc.find_by_name(None),
            Err(LookupError::AmbiguousSelection(vec![
                "@x/a".to_string(),
                "@x/b".to_string()
            ]))
        );
    }

    #[test]
    fn exact_match_is_case_insensitive_and_beats_substring() {
        let doc = doc_with(&["@x/core", "core"]);
        let (name, _) = doc.find_by_name(Some("CORE")).unwrap();
        assert_eq!(name, "core");
    }

    #[test]
    fn unique_substring_match_succeeds() {
        let doc = doc_with(&["@x/parser", "@x/lexer"]);
        let (name, _) = doc.find_by_name(Some("pars")).unwrap();
        assert_eq!(name, "@x/parser");
    }

    #[test]
    fn multiple_substring_matches_are_ambiguous() {
        let doc = doc_with(&["@x/parser", "@x/lexer"]);
        assert_eq!(
            doc.find_by_name(Some("@x")),
            Err(LookupError::AmbiguousSelection(vec![
                "@x/lexer".to_string(),
                "@x/parser".to_string()
            ]))
        );
    }

    #[test]
    fn zero_matches_is_not_found() {
        let doc = doc_with(&["@x/parser"]);
        assert_eq!(
            doc.find_by_name(Some("nope")),
            Err(LookupError::NotFound("nope".to_string()))
        );
    }

    #[test]
    fn roundtrips_through_disk_with_camel_case_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(PROJECT_CONFIG_FILE);

        let mut doc = ConfigDocument::default();
        doc.dependencies.insert(
            "@x/y".to_string(),
            DependencyConfig {
                local_path: Some("../y".to_string()),
                github: Some("org/y".to_string()),
                dist_branch: Some("main-dist".to_string()),
                ..Default::default()
            },
        );
        doc.check_on = Some(CheckPolicy::PrePush);
        doc.save(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"localPath\": \"../y\""));
        assert!(raw.contains("\"distBranch\": \"main-dist\""));
        assert!(raw.contains("\"checkOn\": \"pre-push\""));
        assert!(raw.ends_with('\n'));

        let loaded = ConfigDocument::load(&path).unwrap();
        assert_eq!(loaded.dependencies["@x/y"].github.as_deref(), Some("org/y"));
        assert_eq!(loaded.check_on, Some(CheckPolicy::PrePush));
    }

    #[test]
    fn absent_file_loads_as_empty_document() {
        let dir = tempdir().unwrap();
        let doc = ConfigDocument::load(&dir.path().join(PROJECT_CONFIG_FILE)).unwrap();
        assert!(doc.dependencies.is_empty());
        assert!(doc.check_on.is_none());
    }
}
