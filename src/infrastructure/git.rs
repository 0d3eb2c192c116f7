//! Git driver
//!
//! Implements the VersionControl port by shelling out to `git -C <root>`.
//! Every call is a single attempt; a non-zero exit becomes
//! `ComplySyncError::ExternalTool` with the captured output.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::domain::ports::{Signature, VersionControl};
use crate::error::{ComplySyncError, ComplySyncResult};

#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
}

impl GitCli {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn run(&self, args: &[&str], envs: &[(&str, &str)]) -> ComplySyncResult<String> {
        debug!(args = ?args, "git");
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.root)
            .args(args)
            .envs(envs.iter().copied())
            .output()?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            return Err(ComplySyncError::ExternalTool {
                program: format!("git {}", args.first().copied().unwrap_or_default()),
                status: output.status.to_string(),
                stdout,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(stdout)
    }

    fn with_pathspecs<'a>(args: &[&'a str], patterns: &'a [String]) -> Vec<&'a str> {
        let mut all = args.to_vec();
        all.push("--");
        all.extend(patterns.iter().map(String::as_str));
        all
    }
}

/// Paths from `git status --porcelain -z` output
///
/// Renames and copies carry their original path as an extra entry, which is
/// skipped.
pub fn parse_porcelain_z(output: &str) -> Vec<String> {
    let mut paths = Vec::new();
    let mut entries = output.split('\0').filter(|e| !e.is_empty());
    while let Some(entry) = entries.next() {
        if entry.len() < 4 {
            continue;
        }
        let (status, path) = entry.split_at(3);
        paths.push(path.to_string());
        if status.contains('R') || status.contains('C') {
            entries.next();
        }
    }
    paths
}

impl VersionControl for GitCli {
    fn changed_files(&self, patterns: &[String]) -> ComplySyncResult<Vec<String>> {
        let args = Self::with_pathspecs(&["status", "--porcelain", "-z", "--untracked-files=all"], patterns);
        Ok(parse_porcelain_z(&self.run(&args, &[])?))
    }

    fn stage(&self, patterns: &[String]) -> ComplySyncResult<()> {
        let args = Self::with_pathspecs(&["add", "--all"], patterns);
        self.run(&args, &[]).map(|_| ())
    }

    fn staged_files(&self) -> ComplySyncResult<Vec<String>> {
        let out = self.run(&["diff", "--cached", "--name-only", "-z"], &[])?;
        Ok(out
            .split('\0')
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn commit(
        &self,
        message: &str,
        committer: &Signature,
        author: Option<&Signature>,
    ) -> ComplySyncResult<String> {
        let author = author.unwrap_or(committer);
        let envs = [
            ("GIT_COMMITTER_NAME", committer.name.as_str()),
            ("GIT_COMMITTER_EMAIL", committer.email.as_str()),
            ("GIT_AUTHOR_NAME", author.name.as_str()),
            ("GIT_AUTHOR_EMAIL", author.email.as_str()),
        ];
        self.run(&["commit", "--no-verify", "-m", message], &envs)?;

        let sha = self.run(&["rev-parse", "HEAD"], &[])?.trim().to_string();
        info!(commit = %sha, author = %author, "committed changes");
        Ok(sha)
    }

    fn push(&self, remote: &str, branch: &str) -> ComplySyncResult<()> {
        let refspec = format!("HEAD:{}", branch);
        self.run(&["push", remote, &refspec], &[])?;
        info!(remote, branch, "pushed changes");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn git_available() -> bool {
        Command::new("git").arg("--version").output().is_ok()
    }

    fn init_repo(dir: &Path) {
        let status = Command::new("git")
            .arg("init")
            .arg("-q")
            .arg(dir)
            .status()
            .unwrap();
        assert!(status.success());
    }

    #[test]
    fn porcelain_parsing_skips_rename_sources() {
        let out = " M catalogs/a/catalog.json\0R  new.md\0old.md\0?? md/ac-1.md\0";
        assert_eq!(
            parse_porcelain_z(out),
            vec!["catalogs/a/catalog.json", "new.md", "md/ac-1.md"]
        );
    }

    #[test]
    fn porcelain_parsing_empty() {
        assert!(parse_porcelain_z("").is_empty());
    }

    #[test]
    fn commit_records_committer_and_author() {
        if !git_available() {
            return;
        }
        let dir = tempdir().unwrap();
        init_repo(dir.path());
        std::fs::write(dir.path().join("file.txt"), "content").unwrap();

        let git = GitCli::new(dir.path());
        let patterns = vec![".".to_string()];
        assert_eq!(git.changed_files(&patterns).unwrap(), vec!["file.txt"]);

        git.stage(&patterns).unwrap();
        assert_eq!(git.staged_files().unwrap(), vec!["file.txt"]);

        let committer = Signature::new("bot", "bot@example.com");
        let author = Signature::new("Jane", "jane@example.com");
        let sha = git.commit("Sync automatic updates", &committer, Some(&author)).unwrap();
        assert_eq!(sha.len(), 40);

        let log = git
            .run(&["log", "-1", "--format=%an <%ae>|%cn <%ce>|%s"], &[])
            .unwrap();
        assert_eq!(
            log.trim(),
            "Jane <jane@example.com>|bot <bot@example.com>|Sync automatic updates"
        );
        assert!(git.changed_files(&patterns).unwrap().is_empty());
    }

    #[test]
    fn failing_command_reports_external_tool_error() {
        if !git_available() {
            return;
        }
        let dir = tempdir().unwrap();
        init_repo(dir.path());

        let err = GitCli::new(dir.path()).push("nowhere", "main").unwrap_err();
        match err {
            ComplySyncError::ExternalTool { program, stderr, .. } => {
                assert_eq!(program, "git push");
                assert!(!stderr.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
