//! `pnpm-workspace.yaml` membership store.
//!
//! Only the `packages:` block list is interpreted. Every other line is
//! carried through byte-identical, so a workspace file holding unrelated
//! top-level keys survives member add/remove untouched. This is a
//! deliberate line-oriented editor, not a YAML AST round-trip.

use std::fs;
use std::io;
use std::path::Path;

/// The workspace membership file name.
pub const WORKSPACE_FILE: &str = "pnpm-workspace.yaml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceFile {
    /// Lines up to and including the `packages:` line (or the whole file
    /// when the block is absent).
    head: Vec<String>,
    /// Raw member item lines, in file order.
    items: Vec<String>,
    /// Lines after the last member item.
    tail: Vec<String>,
    has_block: bool,
}

impl Default for WorkspaceFile {
    fn default() -> Self {
        Self {
            head: vec!["packages:".to_string()],
            items: Vec::new(),
            tail: Vec::new(),
            has_block: true,
        }
    }
}

fn is_item(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("- ") || trimmed == "-"
}

fn item_value(line: &str) -> String {
    let trimmed = line.trim_start().trim_start_matches('-').trim();
    trimmed
        .trim_matches(|c| c == '\'' || c == '"')
        .to_string()
}

impl WorkspaceFile {
    /// Load the membership file under `root`; None when it does not exist.
    pub fn load(root: &Path) -> io::Result<Option<Self>> {
        let path = root.join(WORKSPACE_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Ok(Some(Self::parse(&content)))
    }

    pub fn parse(content: &str) -> Self {
        let lines: Vec<String> = content.lines().map(str::to_string).collect();
        let Some(block_at) = lines.iter().position(|l| l.trim_end() == "packages:") else {
            return Self {
                head: lines,
                items: Vec::new(),
                tail: Vec::new(),
                has_block: false,
            };
        };

        let mut end = block_at + 1;
        while end < lines.len() && is_item(&lines[end]) {
            end += 1;
        }
        Self {
            head: lines[..=block_at].to_vec(),
            items: lines[block_at + 1..end].to_vec(),
            tail: lines[end..].to_vec(),
            has_block: true,
        }
    }

    /// Parsed member values, quotes stripped.
    pub fn members(&self) -> Vec<String> {
        self.items.iter().map(|line| item_value(line)).collect()
    }

    pub fn contains(&self, member: &str) -> bool {
        self.items.iter().any(|line| item_value(line) == member)
    }

    /// Append a member if absent.
    pub fn add_member(&mut self, member: &str) {
        if !self.has_block {
            self.head.push("packages:".to_string());
            self.has_block = true;
        }
        if !self.contains(member) {
            self.items.push(format!("  - '{member}'"));
        }
    }

    /// Put the self entry `.` at the front of the list if absent.
    pub fn prepend_self(&mut self) {
        if !self.contains(".") {
            self.items.insert(0, "  - '.'".to_string());
        }
    }

    /// Remove a member by value, whatever its quoting; true when removed.
    pub fn remove_member(&mut self, member: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|line| item_value(line) != member);
        before != self.items.len()
    }

    /// True when nothing but the `packages:` block (and blank lines) lives
    /// in the file.
    fn members_only(&self) -> bool {
        self.has_block
            && self
                .head
                .iter()
                .all(|l| l.trim_end() == "packages:" || l.trim().is_empty())
            && self.tail.iter().all(|l| l.trim().is_empty())
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in self.head.iter().chain(&self.items).chain(&self.tail) {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    pub fn save(&self, root: &Path) -> io::Result<()> {
        fs::write(root.join(WORKSPACE_FILE), self.render())
    }

    /// Persist, deleting the file instead when only the self entry (or
    /// nothing) remains and the file carries no unrelated content.
    pub fn save_or_remove(&self, root: &Path) -> io::Result<()> {
        let removable = self.members().iter().all(|m| m == ".") && self.members_only();
        if removable {
            let path = root.join(WORKSPACE_FILE);
            if path.exists() {
                fs::remove_file(path)?;
            }
            return Ok(());
        }
        self.save(root)
    }
}
