//! Active-source classification over manifest specifier strings.

use std::fmt;

/// Which source a dependency specifier currently points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Local,
    Github,
    Gitlab,
    Npm,
    Unknown,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Source::Local => "local",
            Source::Github => "github",
            Source::Gitlab => "gitlab",
            Source::Npm => "npm",
            Source::Unknown => "unknown",
        };
        write!(f, "{label}")
    }
}

/// Classify a manifest specifier by its shape.
///
/// Purely presentational: switching decisions always come from the tracked
/// dependency config, never from this classification.
pub fn classify(specifier: &str) -> Source {
    if specifier.starts_with("workspace:") {
        return Source::Local;
    }
    // Both the direct-URL form and the legacy shorthand count as github.
    if specifier.starts_with("https://github.com/") || specifier.starts_with("github:") {
        return Source::Github;
    }
    if specifier.contains("/-/archive/") {
        return Source::Gitlab;
    }
    if specifier == "latest" {
        return Source::Npm;
    }
    let bare = specifier.strip_prefix('^').unwrap_or(specifier);
    if bare.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return Source::Npm;
    }
    Source::Unknown
}
