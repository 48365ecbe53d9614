//! Tracked-dependency management: init, set, rm.

use anyhow::{Result, bail, ensure};

use crate::config::{CheckPolicy, DependencyConfig};
use crate::install;
use crate::manifest::{DependencyGroup, Manifest};
use crate::ops::Context;
use crate::ops::switch::switch_local;
use crate::remote::build_client;

/// Source fields shared by `init` and `set`.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SourceArgs {
    /// Local working-copy path, relative to the project root
    #[arg(long, value_name = "PATH")]
    pub local: Option<String>,

    /// GitHub repository as owner/repo
    #[arg(long, value_name = "OWNER/REPO")]
    pub github: Option<String>,

    /// GitLab repository path (nested groups allowed)
    #[arg(long, value_name = "GROUP/REPO")]
    pub gitlab: Option<String>,

    /// Registry package name, when it differs from the manifest key
    #[arg(long, value_name = "NAME")]
    pub npm: Option<String>,

    /// Branch holding pre-built output (default: dist)
    #[arg(long, value_name = "BRANCH")]
    pub dist_branch: Option<String>,

    /// In-repo subdirectory of the package, for monorepo upstreams
    #[arg(long, value_name = "DIR")]
    pub subdir: Option<String>,
}

impl SourceArgs {
    fn is_empty(&self) -> bool {
        self.local.is_none()
            && self.github.is_none()
            && self.gitlab.is_none()
            && self.npm.is_none()
            && self.dist_branch.is_none()
            && self.subdir.is_none()
    }

    fn into_config(self) -> DependencyConfig {
        DependencyConfig {
            local_path: self.local,
            github: self.github,
            gitlab: self.gitlab,
            npm: self.npm,
            dist_branch: self.dist_branch,
            subdir: self.subdir,
        }
    }

    /// Overlay the given fields onto an existing entry.
    fn apply(self, dep: &mut DependencyConfig) {
        if self.local.is_some() {
            dep.local_path = self.local;
        }
        if self.github.is_some() {
            dep.github = self.github;
        }
        if self.gitlab.is_some() {
            dep.gitlab = self.gitlab;
        }
        if self.npm.is_some() {
            dep.npm = self.npm;
        }
        if self.dist_branch.is_some() {
            dep.dist_branch = self.dist_branch;
        }
        if self.subdir.is_some() {
            dep.subdir = self.subdir;
        }
    }
}

/// Start tracking a dependency.
pub async fn init(
    name: &str,
    source: SourceArgs,
    activate: bool,
    dev: bool,
    global: bool,
    no_install: bool,
) -> Result<()> {
    ensure!(
        !(activate && global),
        "--activate only applies to project-tracked dependencies"
    );

    let (doc_path, mut config, root) = super::config_env(global)?;
    ensure!(
        !config.dependencies.contains_key(name),
        "'{name}' is already tracked; use 'depflip set' to modify it"
    );

    let dep = source.into_config();
    config.dependencies.insert(name.to_string(), dep.clone());
    config.save(&doc_path)?;
    println!("Tracking '{name}'.");

    if !activate {
        return Ok(());
    }
    let root = root.expect("--activate is project-scoped");

    // Declare the dependency before any switch logic runs; switching never
    // adds manifest entries implicitly.
    let mut manifest = Manifest::load(&root)?;
    if !manifest.has_dependency(name) {
        let group = if dev {
            DependencyGroup::Dev
        } else {
            DependencyGroup::Primary
        };
        manifest.add_dependency(name, group, "latest");
        manifest.save()?;
        println!("Declared '{name}' in {}.", group_label(group));
    }

    if dep.local_path.is_some() {
        let ctx = Context::new(root.clone(), build_client(None)?);
        let outcome = switch_local(&ctx, name, &dep)?;
        println!("Switched '{}' to {}", outcome.name, outcome.specifier);
        if !no_install {
            install::run_install(&root).await;
        }
    }
    Ok(())
}

fn group_label(group: DependencyGroup) -> &'static str {
    match group {
        DependencyGroup::Primary => "dependencies",
        DependencyGroup::Dev => "devDependencies",
    }
}

/// Update a tracked dependency and/or the document's check policy.
pub fn set(
    name: Option<&str>,
    source: SourceArgs,
    check_on: Option<CheckPolicy>,
    global: bool,
) -> Result<()> {
    let (doc_path, mut config, _root) = super::config_env(global)?;

    if let Some(policy) = check_on {
        config.check_on = Some(policy);
        println!("Check policy set.");
    }

    if !source.is_empty() || name.is_some() {
        let found = {
            let (found, _) = config.find_by_name(name)?;
            found.to_string()
        };
        let dep = config
            .dependencies
            .get_mut(&found)
            .expect("found by name above");
        source.apply(dep);
        println!("Updated '{found}'.");
    } else if check_on.is_none() {
        bail!("nothing to change; pass a source flag or --check-on");
    }

    config.save(&doc_path)?;
    Ok(())
}

/// Stop tracking a dependency.
pub fn rm(name: Option<&str>, global: bool, purge: bool) -> Result<()> {
    ensure!(
        !(purge && global),
        "--purge only applies to project-tracked dependencies"
    );

    let (doc_path, mut config, root) = super::config_env(global)?;
    let found = {
        let (found, _) = config.find_by_name(name)?;
        found.to_string()
    };
    config.dependencies.remove(&found);
    config.save(&doc_path)?;
    println!("Stopped tracking '{found}'.");

    if purge {
        let root = root.expect("--purge is project-scoped");
        let mut manifest = Manifest::load(&root)?;
        if manifest.remove_dependency(&found) {
            manifest.save()?;
            println!("Dropped '{found}' from package.json.");
        }
    }
    Ok(())
}
