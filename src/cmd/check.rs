//! Check command: refuse to ship local sources.

use std::fs;
use std::path::Path;

use anyhow::{Result, bail};

use crate::config::CheckPolicy;
use crate::manifest::Manifest;
use crate::status::{Source, classify};

/// Fail when any tracked dependency still points at a local source.
pub fn check(install_hook: bool) -> Result<()> {
    let (root, config) = super::project_env()?;

    if install_hook {
        return write_hook(&root, config.check_on.unwrap_or_default());
    }

    let manifest = Manifest::load(&root)?;
    let local: Vec<&str> = config
        .dependencies
        .keys()
        .filter(|name| {
            manifest
                .specifier(name)
                .is_some_and(|specifier| classify(specifier) == Source::Local)
        })
        .map(String::as_str)
        .collect();

    if local.is_empty() {
        println!("No local sources active.");
        Ok(())
    } else {
        bail!("local sources still active: {}", local.join(", "));
    }
}

fn write_hook(root: &Path, policy: CheckPolicy) -> Result<()> {
    let hook_name = match policy {
        CheckPolicy::PrePush => "pre-push",
        CheckPolicy::PreCommit => "pre-commit",
        CheckPolicy::None => {
            bail!("no check policy configured; run 'depflip set --check-on pre-push' first")
        }
    };

    let hooks_dir = root.join(".git").join("hooks");
    if !hooks_dir.exists() {
        bail!("{} is not a git repository", root.display());
    }

    let path = hooks_dir.join(hook_name);
    fs::write(&path, "#!/bin/sh\nexec depflip check\n")?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
    }
    println!("Installed {hook_name} hook.");
    Ok(())
}
