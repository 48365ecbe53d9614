//! Package-manager install trigger.
//!
//! Runs `pnpm install` in the project root after a switch. A failed or
//! missing install never unwinds the file mutations that already happened;
//! manifest correctness and install success are reported independently.

use std::path::Path;

use tracing::debug;

pub async fn run_install(project_root: &Path) {
    let pnpm = match which::which("pnpm") {
        Ok(path) => path,
        Err(_) => {
            eprintln!("warning: pnpm not found on PATH, skipping install");
            return;
        }
    };
    debug!("Running {:?} install in {:?}", pnpm, project_root);

    let result = tokio::process::Command::new(pnpm)
        .arg("install")
        .current_dir(project_root)
        .status()
        .await;
    match result {
        Ok(status) if status.success() => {}
        Ok(status) => eprintln!(
            "warning: pnpm install exited with {status}; the source switch itself is complete"
        ),
        Err(err) => eprintln!("warning: failed to run pnpm install: {err}"),
    }
}
