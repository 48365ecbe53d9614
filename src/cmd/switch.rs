//! The four switch commands.

use anyhow::Result;

use crate::config::{ConfigDocument, DependencyConfig, LookupError};
use crate::install;
use crate::ops::switch::{RefRequest, SwitchOutcome, switch_github, switch_gitlab, switch_local, switch_npm};
use crate::ops::{Context, SwitchError};
use crate::remote::build_client;

/// Positional selection for switch commands.
///
/// With exactly one tracked dependency a lone positional is the ref or
/// version, not a name; otherwise the first positional selects the
/// dependency and the second is the ref/version.
fn select<'a>(
    config: &'a ConfigDocument,
    args: &'a [String],
) -> Result<(&'a str, &'a DependencyConfig, Option<&'a str>), LookupError> {
    match args {
        [] => {
            let (name, dep) = config.find_by_name(None)?;
            Ok((name, dep, None))
        }
        [lone] => {
            if config.dependencies.len() == 1 {
                let (name, dep) = config.find_by_name(None)?;
                Ok((name, dep, Some(lone.as_str())))
            } else {
                let (name, dep) = config.find_by_name(Some(lone))?;
                Ok((name, dep, None))
            }
        }
        [query, reference, ..] => {
            let (name, dep) = config.find_by_name(Some(query))?;
            Ok((name, dep, Some(reference.as_str())))
        }
    }
}

/// Combine a positional ref with the `--branch`/`--resolve` flags.
fn ref_request(
    positional: Option<&str>,
    branch: Option<String>,
    resolve: bool,
) -> Result<RefRequest, SwitchError> {
    match (positional, branch) {
        (Some(_), Some(_)) => Err(SwitchError::ConflictingFlags(
            "pass either a positional ref or --branch, not both",
        )),
        (Some(reference), None) if resolve => Ok(RefRequest::Resolve(reference.to_string())),
        (Some(reference), None) => Ok(RefRequest::Raw(reference.to_string())),
        (None, Some(branch)) => Ok(RefRequest::Resolve(branch)),
        (None, None) => Ok(RefRequest::DistBranch),
    }
}

fn report(outcome: &SwitchOutcome) {
    println!("Switched '{}' to {}", outcome.name, outcome.specifier);
}

pub async fn local(name: Option<&str>, no_install: bool) -> Result<()> {
    let (root, config) = super::project_env()?;
    let (name, dep) = config.find_by_name(name)?;

    let ctx = Context::new(root.clone(), build_client(None)?);
    let outcome = switch_local(&ctx, name, dep)?;
    report(&outcome);

    if !no_install {
        install::run_install(&root).await;
    }
    Ok(())
}

pub async fn github(
    args: &[String],
    branch: Option<String>,
    resolve: bool,
    no_install: bool,
) -> Result<()> {
    let (root, config) = super::project_env()?;
    let (name, dep, positional) = select(&config, args)?;
    let request = ref_request(positional, branch, resolve)?;

    let token = std::env::var("GITHUB_TOKEN").ok();
    let ctx = Context::new(root.clone(), build_client(token.as_deref())?);
    let outcome = switch_github(&ctx, name, dep, request).await?;
    report(&outcome);

    if !no_install {
        install::run_install(&root).await;
    }
    Ok(())
}

pub async fn gitlab(
    args: &[String],
    branch: Option<String>,
    resolve: bool,
    no_install: bool,
) -> Result<()> {
    let (root, config) = super::project_env()?;
    let (name, dep, positional) = select(&config, args)?;
    let request = ref_request(positional, branch, resolve)?;

    let token = std::env::var("GITLAB_TOKEN").ok();
    let ctx = Context::new(root.clone(), build_client(token.as_deref())?);
    let outcome = switch_gitlab(&ctx, name, dep, request).await?;
    report(&outcome);

    if !no_install {
        install::run_install(&root).await;
    }
    Ok(())
}

pub async fn npm(args: &[String], no_install: bool) -> Result<()> {
    let (root, config) = super::project_env()?;
    let (name, dep, version) = select(&config, args)?;

    let ctx = Context::new(root.clone(), build_client(None)?);
    let outcome = switch_npm(&ctx, name, dep, version.map(str::to_string)).await?;
    report(&outcome);

    if !no_install {
        install::run_install(&root).await;
    }
    Ok(())
}
