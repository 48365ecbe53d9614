//! Bundler exclude-list toggle.
//!
//! Narrow boundary capability: flip one package name in the `exclude: [...]`
//! array of a vite config, leaving the rest of the file exactly as found.
//! Silently a no-op when no config file (or no exclude array) exists.

use std::fs;
use std::io;
use std::path::Path;

use regex::Regex;

/// Config files probed in order; the first that exists wins.
pub const BUNDLER_CONFIG_FILES: &[&str] = &[
    "vite.config.ts",
    "vite.config.js",
    "vite.config.mts",
    "vite.config.mjs",
];

/// Add or remove `name` in the exclude array of the project's bundler
/// config.
pub fn toggle_exclusion(project_root: &Path, name: &str, add: bool) -> io::Result<()> {
    let Some(path) = BUNDLER_CONFIG_FILES
        .iter()
        .map(|f| project_root.join(f))
        .find(|p| p.exists())
    else {
        return Ok(());
    };

    let content = fs::read_to_string(&path)?;
    let Some(updated) = toggle_in_source(&content, name, add) else {
        return Ok(());
    };
    if updated != content {
        fs::write(&path, updated)?;
    }
    Ok(())
}

/// Rewrite the first `exclude: [...]` array; None when there is none.
fn toggle_in_source(source: &str, name: &str, add: bool) -> Option<String> {
    let array = Regex::new(r"exclude\s*:\s*\[([^\]]*)\]").unwrap();
    let body_match = array.captures(source)?.get(1).unwrap();
    let body = body_match.as_str();

    let present = entries(body).iter().any(|entry| entry == name);
    let new_body = match (add, present) {
        (true, true) | (false, false) => return Some(source.to_string()),
        (true, false) => add_entry(body, name),
        (false, true) => remove_entry(body, name),
    };

    let mut out = String::with_capacity(source.len() + name.len() + 4);
    out.push_str(&source[..body_match.start()]);
    out.push_str(&new_body);
    out.push_str(&source[body_match.end()..]);
    Some(out)
}

fn entries(body: &str) -> Vec<String> {
    body.split(',')
        .map(|piece| piece.trim().trim_matches(|c| c == '\'' || c == '"').to_string())
        .filter(|entry| !entry.is_empty())
        .collect()
}

fn add_entry(body: &str, name: &str) -> String {
    let trimmed = body.trim_end();
    if trimmed.is_empty() {
        return format!("'{name}'");
    }
    if trimmed.ends_with(',') {
        format!("{trimmed} '{name}'")
    } else {
        format!("{trimmed}, '{name}'")
    }
}

fn remove_entry(body: &str, name: &str) -> String {
    let quoted = format!(r#"['"]{}['"]"#, regex::escape(name));
    // Prefer eating the comma that follows, then one that precedes, then
    // the bare entry.
    for pattern in [
        format!(r"{quoted}\s*,\s*"),
        format!(r",\s*{quoted}"),
        format!(r"\s*{quoted}"),
    ] {
        let re = Regex::new(&pattern).unwrap();
        if re.is_match(body) {
            return re.replace(body, "").into_owned();
        }
    }
    body.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const CONFIG: &str = "import { defineConfig } from 'vite'\n\nexport default defineConfig({\n  optimizeDeps: {\n    exclude: ['@x/y']\n  }\n})\n";

    #[test]
    fn adds_and_removes_within_the_array_only() {
        let added = toggle_in_source(CONFIG, "@x/z", true).unwrap();
        assert!(added.contains("exclude: ['@x/y', '@x/z']"));

        let removed = toggle_in_source(&added, "@x/y", false).unwrap();
        assert!(removed.contains("exclude: ['@x/z']"));
        assert!(removed.starts_with("import { defineConfig } from 'vite'\n"));
    }

    #[test]
    fn add_is_idempotent() {
        assert_eq!(toggle_in_source(CONFIG, "@x/y", true).unwrap(), CONFIG);
    }

    #[test]
    fn remove_of_an_absent_name_is_a_no_op() {
        assert_eq!(toggle_in_source(CONFIG, "@x/z", false).unwrap(), CONFIG);
    }

    #[test]
    fn removing_the_last_entry_leaves_an_empty_array() {
        let removed = toggle_in_source(CONFIG, "@x/y", false).unwrap();
        assert!(removed.contains("exclude: []"));
    }

    #[test]
    fn populates_an_empty_array() {
        let source = "export default { optimizeDeps: { exclude: [] } }\n";
        let added = toggle_in_source(source, "@x/y", true).unwrap();
        assert!(added.contains("exclude: ['@x/y']"));
    }

    #[test]
    fn source_without_an_exclude_array_is_untouched() {
        assert!(toggle_in_source("export default {}\n", "@x/y", true).is_none());
    }

    #[test]
    fn missing_config_file_is_a_silent_no_op() {
        let dir = tempdir().unwrap();
        toggle_exclusion(dir.path(), "@x/y", true).unwrap();
        assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn toggling_on_disk_respects_double_quotes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vite.config.ts");
        fs::write(&path, "export default { optimizeDeps: { exclude: [\"@x/y\"] } }\n").unwrap();

        toggle_exclusion(dir.path(), "@x/y", false).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("exclude: []"));
    }
}
