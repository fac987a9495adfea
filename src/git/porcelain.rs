//! Parser for `git worktree list --porcelain`.
//!
//! The format is one attribute per line. A record starts at every
//! `worktree <path>` line; `HEAD`, `branch`, `detached` and `bare` lines
//! fill in the open record. Unknown attributes (`locked`, `prunable`, ...)
//! are skipped.

use std::path::PathBuf;

const WORKTREE_PREFIX: &str = "worktree ";
const HEAD_PREFIX: &str = "HEAD ";
const BRANCH_PREFIX: &str = "branch ";
const BRANCH_REF_PREFIX: &str = "refs/heads/";

/// One entry of a worktree listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeRecord {
    pub path: PathBuf,
    /// `None` when HEAD is detached.
    pub branch: Option<String>,
    /// Commit hash; empty when git did not report one.
    pub head: String,
    pub bare: bool,
    pub detached: bool,
}

impl WorktreeRecord {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            branch: None,
            head: String::new(),
            bare: false,
            detached: false,
        }
    }

    /// True for a record with no branch that is neither detached nor bare.
    #[must_use]
    pub fn is_main(&self) -> bool {
        self.branch.is_none() && !self.detached && !self.bare
    }

    /// Abbreviated commit hash for display
    #[must_use]
    pub fn short_head(&self) -> &str {
        let end = self
            .head
            .char_indices()
            .nth(7)
            .map_or(self.head.len(), |(idx, _)| idx);
        &self.head[..end]
    }

    /// Branch name, or a placeholder describing why there is none
    #[must_use]
    pub fn display_name(&self) -> &str {
        match &self.branch {
            Some(branch) => branch,
            None if self.bare => "(bare)",
            None if self.detached => "(detached)",
            None => "(no branch)",
        }
    }
}

/// Parses porcelain output into records, preserving git's order.
///
/// Never fails: lines that are not understood are dropped, as are attribute
/// lines that appear before the first `worktree` line.
#[must_use]
pub fn parse_worktree_list(output: &str) -> Vec<WorktreeRecord> {
    let mut records = Vec::new();
    let mut current: Option<WorktreeRecord> = None;

    for line in output.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(path) = line.strip_prefix(WORKTREE_PREFIX) {
            if let Some(record) = current.take() {
                records.push(record);
            }
            current = Some(WorktreeRecord::new(PathBuf::from(path)));
            continue;
        }

        let Some(record) = current.as_mut() else {
            continue;
        };

        if let Some(head) = line.strip_prefix(HEAD_PREFIX) {
            record.head = head.to_string();
        } else if let Some(branch) = line.strip_prefix(BRANCH_PREFIX) {
            let name = branch.strip_prefix(BRANCH_REF_PREFIX).unwrap_or(branch);
            record.branch = Some(name.to_string());
        } else if line == "detached" {
            record.detached = true;
        } else if line == "bare" {
            record.bare = true;
        }
    }

    if let Some(record) = current {
        records.push(record);
    }

    records
}
