//! Test support utilities for wtm integration tests
//!
//! Provides a throwaway git repository with an isolated worktree storage
//! root, plus helpers for writing hook files into it.

pub mod hook_files;
pub mod test_env;

pub use hook_files::{write_hook_file, write_settings_file};
pub use test_env::CliTestEnvironment;
