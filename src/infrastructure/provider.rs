//! CI provider detection and step outputs
//!
//! GitHub Actions is recognised by `GITHUB_ACTIONS`, GitLab CI by
//! `GITLAB_CI`. On GitHub, results are appended to the file named by
//! `GITHUB_OUTPUT` as `key=value` lines.

use std::fs::OpenOptions;
use std::io::Write;

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitProvider {
    GitHub,
    GitLab,
}

impl GitProvider {
    /// Detect the provider from the process environment
    pub fn detect() -> Option<Self> {
        Self::detect_with(|key| std::env::var(key).ok())
    }

    pub fn detect_with(get_env: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let is_set = |key: &str| get_env(key).is_some_and(|v| !v.is_empty());
        if is_set("GITHUB_ACTIONS") {
            Some(GitProvider::GitHub)
        } else if is_set("GITLAB_CI") {
            Some(GitProvider::GitLab)
        } else {
            None
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GitProvider::GitHub => "GitHub",
            GitProvider::GitLab => "GitLab",
        }
    }

    /// Publish step outputs; a no-op outside GitHub or without `GITHUB_OUTPUT`
    pub fn set_outputs(
        &self,
        get_env: impl Fn(&str) -> Option<String>,
        outputs: &[(&str, String)],
    ) -> std::io::Result<()> {
        if *self != GitProvider::GitHub {
            return Ok(());
        }
        let Some(path) = get_env("GITHUB_OUTPUT").filter(|p| !p.is_empty()) else {
            debug!("GITHUB_OUTPUT not set, skipping step outputs");
            return Ok(());
        };

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        for (key, value) in outputs {
            writeln!(file, "{}={}", key, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn detects_github_first() {
        let get = env(&[("GITHUB_ACTIONS", "true"), ("GITLAB_CI", "true")]);
        assert_eq!(GitProvider::detect_with(get), Some(GitProvider::GitHub));
    }

    #[test]
    fn detects_gitlab() {
        assert_eq!(
            GitProvider::detect_with(env(&[("GITLAB_CI", "true")])),
            Some(GitProvider::GitLab)
        );
    }

    #[test]
    fn empty_variables_do_not_count() {
        assert_eq!(GitProvider::detect_with(env(&[("GITHUB_ACTIONS", "")])), None);
        assert_eq!(GitProvider::detect_with(env(&[])), None);
    }

    #[test]
    fn github_outputs_are_appended() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("output");
        std::fs::write(&out, "existing=1\n").unwrap();
        let get = env(&[("GITHUB_OUTPUT", out.to_str().unwrap())]);

        GitProvider::GitHub
            .set_outputs(&get, &[("changes", "true".to_string()), ("commit", "abc".to_string())])
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(&out).unwrap(),
            "existing=1\nchanges=true\ncommit=abc\n"
        );
    }

    #[test]
    fn gitlab_outputs_are_skipped() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("output");
        let get = env(&[("GITHUB_OUTPUT", out.to_str().unwrap())]);

        GitProvider::GitLab
            .set_outputs(&get, &[("changes", "false".to_string())])
            .unwrap();

        assert!(!out.exists());
    }
}
