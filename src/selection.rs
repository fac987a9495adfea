use anyhow::Result;
use inquire::Select;
use std::path::PathBuf;

use crate::git::WorktreeRecord;

/// Trait for providing interactive selection functionality
/// This allows us to abstract away the interactive prompts for testing
pub trait SelectionProvider {
    /// Present a selection menu and return the user's choice
    ///
    /// # Errors
    /// Returns an error if the selection process fails or user cancels
    fn select(&self, prompt: &str, options: Vec<String>) -> Result<String>;
}

/// Real implementation using inquire::Select for production use
pub struct RealSelectionProvider;

impl SelectionProvider for RealSelectionProvider {
    fn select(&self, prompt: &str, options: Vec<String>) -> Result<String> {
        let selection = Select::new(prompt, options)
            .with_page_size(10)
            .with_vim_mode(true)
            .prompt()?;
        Ok(selection)
    }
}

/// Mock implementation for testing that returns a predetermined value
pub struct MockSelectionProvider {
    pub response: String,
}

impl MockSelectionProvider {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

impl SelectionProvider for MockSelectionProvider {
    fn select(&self, _prompt: &str, options: Vec<String>) -> Result<String> {
        // Validate that the response is actually in the options
        if options.contains(&self.response) {
            Ok(self.response.clone())
        } else {
            anyhow::bail!("Mock response '{}' not found in options", self.response)
        }
    }
}

/// Formats a worktree as a selection option: "branch (path)"
#[must_use]
pub fn format_worktree_option(record: &WorktreeRecord) -> String {
    format!("{} ({})", record.display_name(), record.path.display())
}

/// Lets the user pick one of `records`
///
/// # Errors
/// Returns an error if there is nothing to choose from, the prompt fails, or
/// the answer cannot be mapped back to a worktree
pub fn select_worktree(
    prompt: &str,
    records: &[WorktreeRecord],
    provider: &dyn SelectionProvider,
) -> Result<WorktreeRecord> {
    if records.is_empty() {
        anyhow::bail!("No worktrees found");
    }

    let options: Vec<String> = records.iter().map(format_worktree_option).collect();
    let selection = provider.select(prompt, options)?;
    let path = extract_path_from_selection(&selection)?;

    records
        .iter()
        .find(|record| record.path == path)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Selected worktree not found: {}", path.display()))
}

/// Helper function to parse path from selection string formatted as "branch (path)"
///
/// # Errors
/// Returns an error if the selection string is not in the expected format
pub fn extract_path_from_selection(selection: &str) -> Result<PathBuf> {
    if let Some(path_start) = selection.rfind(" (") {
        if let Some(path_str) = selection[path_start + 2..].strip_suffix(')') {
            return Ok(PathBuf::from(path_str));
        }
    }
    anyhow::bail!("Invalid selection format: {}", selection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::parse_worktree_list;

    fn records() -> Vec<WorktreeRecord> {
        parse_worktree_list(
            "worktree /src/app\nbranch refs/heads/main\n\nworktree /wt/app/feature-x\nbranch refs/heads/feature/x\n",
        )
    }

    #[test]
    fn test_mock_selection_provider_valid_response() {
        let options = vec!["option1".to_string(), "option2".to_string()];
        let provider = MockSelectionProvider::new("option1");

        let result = provider.select("Test prompt", options);
        assert!(matches!(result, Ok(ref s) if s == "option1"));
    }

    #[test]
    fn test_mock_selection_provider_invalid_response() {
        let options = vec!["option1".to_string(), "option2".to_string()];
        let provider = MockSelectionProvider::new("invalid");

        let result = provider.select("Test prompt", options);
        assert!(result.is_err());
    }

    #[test]
    fn test_extract_path_from_selection() {
        let selection = "feature/x (/some/path)";
        let result = extract_path_from_selection(selection);
        assert!(matches!(result, Ok(ref p) if p == &PathBuf::from("/some/path")));
    }

    #[test]
    fn test_extract_from_invalid_selection() {
        let invalid_selection = "invalid format";
        assert!(extract_path_from_selection(invalid_selection).is_err());
    }

    #[test]
    fn test_select_worktree_maps_back_to_record() {
        let provider = MockSelectionProvider::new("feature/x (/wt/app/feature-x)");
        let result = select_worktree("Pick:", &records(), &provider);
        assert!(matches!(result, Ok(ref r) if r.branch.as_deref() == Some("feature/x")));
    }

    #[test]
    fn test_select_worktree_with_no_records() {
        let provider = MockSelectionProvider::new("anything");
        assert!(select_worktree("Pick:", &[], &provider).is_err());
    }
}
