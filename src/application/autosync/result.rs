//! Autosync result types

use crate::application::tasks::TaskReport;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutosyncResult {
    pub assemble: Option<TaskReport>,
    pub regenerate: Option<TaskReport>,
    /// Whether the run produced changes to publish
    pub changes: bool,
    /// Files staged (or, in check-only mode, found modified)
    pub changed_files: Vec<String>,
    pub commit_sha: Option<String>,
    pub pushed: bool,
}

impl AutosyncResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Step outputs published to the CI provider
    pub fn outputs(&self) -> Vec<(&'static str, String)> {
        let mut outputs = vec![("changes", self.changes.to_string())];
        if let Some(sha) = &self.commit_sha {
            outputs.push(("commit", sha.clone()));
        }
        outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outputs_include_commit_only_when_committed() {
        let mut result = AutosyncResult::new();
        assert_eq!(result.outputs(), vec![("changes", "false".to_string())]);

        result.changes = true;
        result.commit_sha = Some("abc123".to_string());
        assert_eq!(
            result.outputs(),
            vec![("changes", "true".to_string()), ("commit", "abc123".to_string())]
        );
    }
}
