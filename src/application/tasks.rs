//! Assemble and regenerate tasks
//!
//! A task applies one authored-object operation to every object of a kind
//! in the workspace, skipping names matched by the skip patterns.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::application::authored::AuthoredObject;
use crate::domain::ports::ModelRepository;
use crate::domain::value_objects::{ModelKind, SkipPatterns};
use crate::error::{ComplySyncError, ComplySyncResult};
use crate::infrastructure::WorkspaceModelStore;

/// Counts reported by a task run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskReport {
    pub processed: usize,
    pub skipped: usize,
    /// Assemble: models changed. Regenerate: markdown files written.
    pub changed: usize,
}

/// Assemble every object directory under `<root>/<markdown_dir>`
pub struct AssembleTask<'a> {
    root: PathBuf,
    markdown_dir: PathBuf,
    skip: &'a SkipPatterns,
}

impl<'a> AssembleTask<'a> {
    pub fn new(root: impl Into<PathBuf>, markdown_dir: impl Into<PathBuf>, skip: &'a SkipPatterns) -> Self {
        Self {
            root: root.into(),
            markdown_dir: markdown_dir.into(),
            skip,
        }
    }

    pub fn execute(&self, authored: &dyn AuthoredObject) -> ComplySyncResult<TaskReport> {
        let dir = self.root.join(&self.markdown_dir);
        if !dir.is_dir() {
            return Err(ComplySyncError::DirectoryNotFound { path: dir });
        }

        let mut report = TaskReport::default();
        for name in object_dirs(&dir)? {
            if self.skip.is_skipped(&name) {
                debug!(object = %name, "skipping");
                report.skipped += 1;
                continue;
            }
            if authored.assemble(&self.markdown_dir.join(&name))? {
                report.changed += 1;
            }
            report.processed += 1;
        }

        info!(
            processed = report.processed,
            skipped = report.skipped,
            changed = report.changed,
            "assemble task finished"
        );
        Ok(report)
    }
}

/// Regenerate markdown for every model of one kind
pub struct RegenerateTask<'a> {
    store: WorkspaceModelStore,
    kind: ModelKind,
    markdown_dir: PathBuf,
    skip: &'a SkipPatterns,
}

impl<'a> RegenerateTask<'a> {
    pub fn new(
        root: impl Into<PathBuf>,
        kind: ModelKind,
        markdown_dir: impl Into<PathBuf>,
        skip: &'a SkipPatterns,
    ) -> Self {
        Self {
            store: WorkspaceModelStore::new(root),
            kind,
            markdown_dir: markdown_dir.into(),
            skip,
        }
    }

    pub fn execute(&self, authored: &dyn AuthoredObject) -> ComplySyncResult<TaskReport> {
        let mut report = TaskReport::default();
        for name in self.store.names(self.kind)? {
            if self.skip.is_skipped(&name) {
                debug!(object = %name, "skipping");
                report.skipped += 1;
                continue;
            }
            let model_path = Path::new(self.kind.model_dir()).join(&name);
            report.changed += authored.regenerate(&model_path, &self.markdown_dir.join(&name))?;
            report.processed += 1;
        }

        info!(
            kind = %self.kind,
            processed = report.processed,
            skipped = report.skipped,
            files = report.changed,
            "regenerate task finished"
        );
        Ok(report)
    }
}

/// Visible subdirectories of `dir`, sorted by name
fn object_dirs(dir: &Path) -> ComplySyncResult<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if !name.starts_with('.') {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}
