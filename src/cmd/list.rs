//! List command.

use anyhow::Result;
use serde_json::Value;

use crate::config::{DEFAULT_DIST_BRANCH, DependencyConfig};
use crate::manifest::Manifest;
use crate::ops::Context;
use crate::registry;
use crate::remote::{build_client, github, gitlab};
use crate::status::classify;

/// List tracked dependencies and their active sources.
pub async fn list(verbose: bool, global: bool) -> Result<()> {
    if global {
        return list_global();
    }

    let (root, config) = super::project_env()?;
    if config.dependencies.is_empty() {
        println!("No dependencies tracked. Run 'depflip init <name>' to get started.");
        return Ok(());
    }

    let manifest = Manifest::load(&root)?;
    let ctx = Context::new(root, build_client(None)?);

    println!("Tracked dependencies:");
    for (name, dep) in &config.dependencies {
        match manifest.specifier(name) {
            Some(specifier) => {
                println!("  {name} [{}] {specifier}", classify(specifier));
            }
            None => println!("  {name} [not declared]"),
        }
        if verbose {
            let latest = latest_label(&ctx, name, dep).await;
            let dist = dist_label(&ctx, dep).await;
            println!("      latest: {latest}  dist: {dist}");
        }
    }
    Ok(())
}

fn list_global() -> Result<()> {
    let config = crate::config::ConfigDocument::load(&crate::global_config_path())?;
    if config.dependencies.is_empty() {
        println!("No dependencies tracked globally.");
        return Ok(());
    }

    println!("Globally tracked dependencies:");
    for (name, dep) in &config.dependencies {
        let mut sources = Vec::new();
        if dep.local_path.is_some() {
            sources.push("local");
        }
        if dep.github.is_some() {
            sources.push("github");
        }
        if dep.gitlab.is_some() {
            sources.push("gitlab");
        }
        println!("  {name} ({})", sources.join(", "));
    }
    Ok(())
}

/// Informational lookups degrade to "unknown" rather than aborting the
/// listing.
async fn latest_label(ctx: &Context, name: &str, dep: &DependencyConfig) -> String {
    let package = dep.npm.as_deref().unwrap_or(name);
    registry::latest_version(&ctx.client, &ctx.npm_registry, package)
        .await
        .unwrap_or_else(|_| "unknown".to_string())
}

async fn dist_label(ctx: &Context, dep: &DependencyConfig) -> String {
    let branch = dep.dist_branch.as_deref().unwrap_or(DEFAULT_DIST_BRANCH);
    let subdir = dep.subdir.as_deref();
    let manifest = match (&dep.github, &dep.gitlab) {
        (Some(repo), _) => {
            github::fetch_manifest_at(&ctx.client, &ctx.github_raw, repo, branch, subdir)
                .await
                .ok()
        }
        (None, Some(repo)) => {
            gitlab::fetch_manifest_at(&ctx.client, &ctx.gitlab_api, repo, branch, subdir)
                .await
                .ok()
        }
        (None, None) => None,
    };
    manifest
        .as_ref()
        .and_then(|doc| doc.get("version"))
        .and_then(Value::as_str)
        .map_or_else(|| "unknown".to_string(), str::to_string)
}
