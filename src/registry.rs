//! npm registry lookups.

use std::collections::HashMap;

use reqwest::Client;
use serde::Deserialize;

use crate::remote::{Platform, RemoteError};

pub const REGISTRY_BASE: &str = "https://registry.npmjs.org";

/// Abbreviated-metadata Accept header; the full document runs to megabytes
/// for long-lived packages.
const ABBREVIATED_METADATA_ACCEPT: &str =
    "application/vnd.npm.install-v1+json; q=1.0, application/json; q=0.8, */*";

#[derive(Debug, Deserialize)]
struct PackageMetadata {
    #[serde(rename = "dist-tags", default)]
    dist_tags: HashMap<String, String>,
}

/// Latest published version according to the registry's `latest` dist-tag.
pub async fn latest_version(
    client: &Client,
    registry: &str,
    package: &str,
) -> Result<String, RemoteError> {
    // Scoped names keep the `@` and encode only the slash, as npm does.
    let url = format!("{registry}/{}", package.replace('/', "%2F"));
    let response = client
        .get(&url)
        .header(reqwest::header::ACCEPT, ABBREVIATED_METADATA_ACCEPT)
        .send()
        .await
        .map_err(|e| RemoteError::new(Platform::Npm, package, "latest", e))?;
    if !response.status().is_success() {
        return Err(RemoteError::new(
            Platform::Npm,
            package,
            "latest",
            format!("HTTP {}", response.status()),
        ));
    }
    let metadata: PackageMetadata = response
        .json()
        .await
        .map_err(|e| RemoteError::new(Platform::Npm, package, "latest", e))?;

    let version = metadata.dist_tags.get("latest").ok_or_else(|| {
        RemoteError::new(
            Platform::Npm,
            package,
            "latest",
            "registry document has no 'latest' dist-tag",
        )
    })?;
    semver::Version::parse(version).map_err(|e| {
        RemoteError::new(
            Platform::Npm,
            package,
            "latest",
            format!("registry returned invalid version '{version}': {e}"),
        )
    })?;
    Ok(version.clone())
}
