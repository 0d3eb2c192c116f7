//! Autosync Use Case
//!
//! Orchestrates tasks and publishing.

use std::path::PathBuf;

use tracing::info;

use crate::application::authored::AuthoredObject;
use crate::application::tasks::{AssembleTask, RegenerateTask};
use crate::domain::ports::VersionControl;
use crate::domain::value_objects::SkipPatterns;
use crate::error::{ComplySyncError, ComplySyncResult};

use super::options::{AutosyncOptions, PublishOptions};
use super::result::AutosyncResult;

pub struct AutosyncUseCase<VC>
where
    VC: VersionControl,
{
    root: PathBuf,
    vcs: VC,
}

impl<VC> AutosyncUseCase<VC>
where
    VC: VersionControl,
{
    pub fn new(root: impl Into<PathBuf>, vcs: VC) -> Self {
        Self {
            root: root.into(),
            vcs,
        }
    }

    /// Run the tasks, then publish
    pub fn execute(
        &self,
        authored: &dyn AuthoredObject,
        skip: &SkipPatterns,
        options: &AutosyncOptions,
    ) -> ComplySyncResult<AutosyncResult> {
        let assemble = if options.skip_assemble {
            info!("skipping assemble");
            None
        } else {
            Some(AssembleTask::new(&self.root, &options.markdown_dir, skip).execute(authored)?)
        };

        let regenerate = if options.skip_regenerate {
            info!("skipping regenerate");
            None
        } else {
            Some(
                RegenerateTask::new(&self.root, options.kind, &options.markdown_dir, skip)
                    .execute(authored)?,
            )
        };

        let mut result = self.publish(&options.publish)?;
        result.assemble = assemble;
        result.regenerate = regenerate;
        Ok(result)
    }

    /// Commit and push whatever changed under the file patterns
    pub fn publish(&self, options: &PublishOptions) -> ComplySyncResult<AutosyncResult> {
        let mut result = AutosyncResult::new();

        if options.check_only {
            let changed = self.vcs.changed_files(&options.file_patterns)?;
            if !changed.is_empty() {
                return Err(ComplySyncError::CheckFailed { files: changed });
            }
            info!("check passed, no changes");
            return Ok(result);
        }

        self.vcs.stage(&options.file_patterns)?;
        let staged = self.vcs.staged_files()?;
        if staged.is_empty() {
            info!("nothing to commit");
            return Ok(result);
        }

        result.changes = true;
        result.changed_files = staged;
        let sha = self.vcs.commit(
            &options.commit_message,
            &options.committer,
            options.author.as_ref(),
        )?;
        result.commit_sha = Some(sha);

        if options.dry_run {
            info!(branch = %options.branch, "dry run, not pushing");
        } else {
            self.vcs.push(&options.remote, &options.branch)?;
            result.pushed = true;
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::Signature;
    use crate::domain::value_objects::ModelKind;
    use std::cell::RefCell;
    use std::path::Path;
    use tempfile::tempdir;

    #[derive(Default)]
    struct FakeVcs {
        changed: Vec<String>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeVcs {
        fn with_changes(files: &[&str]) -> Self {
            Self {
                changed: files.iter().map(|f| f.to_string()).collect(),
                calls: RefCell::default(),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl VersionControl for FakeVcs {
        fn changed_files(&self, _patterns: &[String]) -> ComplySyncResult<Vec<String>> {
            self.calls.borrow_mut().push("status".to_string());
            Ok(self.changed.clone())
        }

        fn stage(&self, patterns: &[String]) -> ComplySyncResult<()> {
            self.calls.borrow_mut().push(format!("add {}", patterns.join(" ")));
            Ok(())
        }

        fn staged_files(&self) -> ComplySyncResult<Vec<String>> {
            Ok(self.changed.clone())
        }

        fn commit(
            &self,
            message: &str,
            committer: &Signature,
            author: Option<&Signature>,
        ) -> ComplySyncResult<String> {
            let author = author.unwrap_or(committer);
            self.calls
                .borrow_mut()
                .push(format!("commit {} by {} as {}", message, author, committer));
            Ok("deadbeef".to_string())
        }

        fn push(&self, remote: &str, branch: &str) -> ComplySyncResult<()> {
            self.calls.borrow_mut().push(format!("push {} HEAD:{}", remote, branch));
            Ok(())
        }
    }

    struct NoopAuthored;

    impl AuthoredObject for NoopAuthored {
        fn assemble(&self, _markdown_path: &Path) -> ComplySyncResult<bool> {
            Ok(false)
        }

        fn regenerate(&self, _model_path: &Path, _markdown_path: &Path) -> ComplySyncResult<usize> {
            Ok(0)
        }
    }

    fn publish_options() -> PublishOptions {
        PublishOptions::new("main", Signature::new("bot", "bot@example.com"))
    }

    #[test]
    fn commits_and_pushes_staged_changes() {
        let vcs = FakeVcs::with_changes(&["catalogs/a/catalog.json"]);
        let use_case = AutosyncUseCase::new(".", vcs);

        let result = use_case.publish(&publish_options()).unwrap();

        assert!(result.changes);
        assert!(result.pushed);
        assert_eq!(result.commit_sha.as_deref(), Some("deadbeef"));
        assert_eq!(
            use_case.vcs.calls(),
            vec![
                "add .",
                "commit Sync automatic updates by bot <bot@example.com> as bot <bot@example.com>",
                "push origin HEAD:main",
            ]
        );
    }

    #[test]
    fn author_is_passed_through() {
        let use_case = AutosyncUseCase::new(".", FakeVcs::with_changes(&["a"]));
        let options = publish_options()
            .with_author(Some(Signature::new("Jane", "jane@example.com")))
            .with_commit_message("Update controls");

        use_case.publish(&options).unwrap();

        assert!(use_case.vcs.calls()[1]
            .starts_with("commit Update controls by Jane <jane@example.com> as bot"));
    }

    #[test]
    fn nothing_staged_means_no_commit() {
        let use_case = AutosyncUseCase::new(".", FakeVcs::default());

        let result = use_case.publish(&publish_options()).unwrap();

        assert!(!result.changes);
        assert!(result.commit_sha.is_none());
        assert_eq!(use_case.vcs.calls(), vec!["add ."]);
    }

    #[test]
    fn dry_run_commits_without_pushing() {
        let use_case = AutosyncUseCase::new(".", FakeVcs::with_changes(&["a"]));

        let result = use_case
            .publish(&publish_options().with_dry_run(true))
            .unwrap();

        assert!(result.changes);
        assert!(!result.pushed);
        assert!(!use_case.vcs.calls().iter().any(|c| c.starts_with("push")));
    }

    #[test]
    fn check_only_fails_on_changes() {
        let use_case = AutosyncUseCase::new(".", FakeVcs::with_changes(&["md/ac-1.md"]));

        let err = use_case
            .publish(&publish_options().with_check_only(true))
            .unwrap_err();

        assert!(matches!(err, ComplySyncError::CheckFailed { ref files } if files == &["md/ac-1.md"]));
        assert_eq!(use_case.vcs.calls(), vec!["status"]);
    }

    #[test]
    fn check_only_passes_when_clean() {
        let use_case = AutosyncUseCase::new(".", FakeVcs::default());
        let result = use_case
            .publish(&publish_options().with_check_only(true))
            .unwrap();
        assert!(!result.changes);
    }

    #[test]
    fn execute_honours_skip_flags() {
        let dir = tempdir().unwrap();
        let use_case = AutosyncUseCase::new(dir.path(), FakeVcs::default());
        let options = AutosyncOptions {
            kind: ModelKind::Catalog,
            markdown_dir: PathBuf::from("does-not-exist"),
            skip_assemble: true,
            skip_regenerate: false,
            publish: publish_options(),
        };

        let result = use_case
            .execute(&NoopAuthored, &SkipPatterns::empty(), &options)
            .unwrap();

        assert!(result.assemble.is_none());
        assert_eq!(result.regenerate.map(|r| r.processed), Some(0));
    }
}
