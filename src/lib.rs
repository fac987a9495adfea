//! # wtm
//!
//! A git worktree manager with lifecycle hooks. Worktrees are created under a
//! shared storage root (`~/.worktrees/<repo-name>/<branch-name>/` by default),
//! and repository-defined shell commands run before and after each worktree is
//! added or removed.
//!
//! ## Features
//!
//! - **Centralized Storage** - New worktrees land in one predictable place
//! - **Lifecycle Hooks** - `pre_add`, `post_add`, `pre_remove` and `post_remove`
//!   commands from `.wtm-hooks.yaml`, with `WORKTREE_*` environment variables
//! - **Porcelain Parsing** - Worktree state comes straight from
//!   `git worktree list --porcelain`, so worktrees made by plain git show up too
//! - **Shell Integration** - `wtm jump` changes directory through a shell function
//!
//! ## Quick Start
//!
//! ```bash
//! # Create a worktree (and the branch, if it doesn't exist yet)
//! wtm add feature/auth
//!
//! # Go there
//! wtm jump auth
//!
//! # Remove it together with its branch
//! wtm remove feature/auth
//! ```
//!
//! ## Module Structure
//!
//! - [`commands`] - One module per subcommand
//! - [`hooks`] - Hook file loading, environment building and execution
//! - [`git`] - git2 lookups plus the `git` binary for worktree changes
//! - [`storage`] - Default worktree locations and branch name sanitization
//! - [`config`] - Optional `.wtm.toml` repository settings
//! - [`selection`] - Abstracts interactive selection prompts for testability
//! - [`logging`] - Leveled console output and `log_*!` macros

pub mod commands;
pub mod config;
pub mod git;
pub mod hooks;
pub mod logging;
pub mod selection;
pub mod storage;

pub use anyhow::Result;
