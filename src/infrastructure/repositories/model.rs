//! Workspace model store
//!
//! Implements the ModelRepository port over the conventional on-disk layout
//! `<root>/<kind dir>/<name>/<kind file>`.

use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use similar::TextDiff;
use tracing::debug;

use crate::domain::entities::oscal::{from_document, to_document, OscalDocument};
use crate::domain::ports::file_system::FileSystem;
use crate::domain::ports::ModelRepository;
use crate::domain::value_objects::ModelKind;
use crate::error::{ComplySyncError, ComplySyncResult};
use crate::infrastructure::fs::LocalFs;

#[derive(Debug, Clone)]
pub struct WorkspaceModelStore<F: FileSystem = LocalFs> {
    root: PathBuf,
    fs: F,
}

impl WorkspaceModelStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_fs(root, LocalFs::new())
    }
}

impl<F: FileSystem> WorkspaceModelStore<F> {
    pub fn with_fs(root: impl Into<PathBuf>, fs: F) -> Self {
        Self {
            root: root.into(),
            fs,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    /// Absolute location of the model `name` of `kind`
    pub fn model_path(&self, kind: ModelKind, name: &str) -> PathBuf {
        self.root
            .join(kind.model_dir())
            .join(name)
            .join(kind.file_name())
    }

    fn read_model<T: OscalDocument>(&self, path: &Path) -> ComplySyncResult<(String, T)> {
        if !self.fs.exists(path) {
            return Err(ComplySyncError::ModelNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = self.fs.read(path)?;
        let model = from_document(&content).map_err(|message| ComplySyncError::InvalidModel {
            path: path.to_path_buf(),
            message,
        })?;
        Ok((content, model))
    }
}

impl<F: FileSystem> ModelRepository for WorkspaceModelStore<F> {
    fn load<T: OscalDocument>(&self, name: &str) -> ComplySyncResult<T> {
        self.read_model(&self.model_path(T::KIND, name))
            .map(|(_, model)| model)
    }

    fn load_href<T: OscalDocument>(&self, href: &str) -> ComplySyncResult<T> {
        self.read_model(&self.root.join(href)).map(|(_, model)| model)
    }

    fn save<T: OscalDocument>(&self, name: &str, model: &T) -> ComplySyncResult<bool> {
        let path = self.model_path(T::KIND, name);
        let mut model = model.clone();

        let previous = match self.read_model::<T>(&path) {
            Ok((content, existing)) => {
                model.metadata_mut().last_modified = existing.metadata().last_modified.clone();
                if model == existing {
                    debug!(path = %path.display(), "model unchanged");
                    return Ok(false);
                }
                Some(content)
            }
            Err(ComplySyncError::ModelNotFound { .. }) => None,
            // An unreadable model is overwritten
            Err(e) => {
                debug!(path = %path.display(), error = %e, "replacing unreadable model");
                None
            }
        };

        model.metadata_mut().last_modified = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let content = to_document(&model).map_err(|e| ComplySyncError::InvalidModel {
            path: path.clone(),
            message: e.to_string(),
        })?;

        if let Some(old) = previous {
            let diff = TextDiff::from_lines(&old, &content)
                .unified_diff()
                .header(
                    &format!("a/{}", path.display()),
                    &format!("b/{}", path.display()),
                )
                .to_string();
            debug!("model changed:\n{}", diff);
        }

        self.fs.write(&path, &content)?;
        Ok(true)
    }

    fn exists(&self, kind: ModelKind, name: &str) -> bool {
        self.fs.exists(&self.model_path(kind, name))
    }

    fn names(&self, kind: ModelKind) -> ComplySyncResult<Vec<String>> {
        let dir = self.root.join(kind.model_dir());
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if !path.join(kind.file_name()).is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::oscal::{Catalog, Metadata, Profile};
    use tempfile::tempdir;

    fn catalog() -> Catalog {
        Catalog::new("cat-uuid", Metadata::new("Test Catalog"))
    }

    #[test]
    fn save_writes_conventional_path() {
        let dir = tempdir().unwrap();
        let store = WorkspaceModelStore::new(dir.path());

        assert!(store.save("nist", &catalog()).unwrap());

        let path = dir.path().join("catalogs/nist/catalog.json");
        assert!(path.is_file());
        assert!(store.exists(ModelKind::Catalog, "nist"));

        let loaded: Catalog = store.load("nist").unwrap();
        assert_eq!(loaded.uuid, "cat-uuid");
        assert!(!loaded.metadata.last_modified.is_empty());
    }

    #[test]
    fn unchanged_model_is_not_rewritten() {
        let dir = tempdir().unwrap();
        let store = WorkspaceModelStore::new(dir.path());
        store.save("nist", &catalog()).unwrap();
        let path = store.model_path(ModelKind::Catalog, "nist");
        let before = std::fs::read_to_string(&path).unwrap();

        assert!(!store.save("nist", &catalog()).unwrap());

        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn changed_model_is_rewritten() {
        let dir = tempdir().unwrap();
        let store = WorkspaceModelStore::new(dir.path());
        store.save("nist", &catalog()).unwrap();

        let mut changed = catalog();
        changed.metadata.title = "Renamed".to_string();
        assert!(store.save("nist", &changed).unwrap());

        let loaded: Catalog = store.load("nist").unwrap();
        assert_eq!(loaded.metadata.title, "Renamed");
    }

    #[test]
    fn load_href_is_workspace_relative() {
        let dir = tempdir().unwrap();
        let store = WorkspaceModelStore::new(dir.path());
        store.save("nist", &catalog()).unwrap();

        let loaded: Catalog = store.load_href("catalogs/nist/catalog.json").unwrap();
        assert_eq!(loaded.uuid, "cat-uuid");
    }

    #[test]
    fn missing_model_is_reported_with_path() {
        let dir = tempdir().unwrap();
        let store = WorkspaceModelStore::new(dir.path());

        let err = store.load::<Profile>("absent").unwrap_err();
        match err {
            ComplySyncError::ModelNotFound { path } => {
                assert!(path.ends_with("profiles/absent/profile.json"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn wrong_document_kind_is_invalid() {
        let dir = tempdir().unwrap();
        let store = WorkspaceModelStore::new(dir.path());
        store.save("nist", &catalog()).unwrap();

        let err = store
            .load_href::<Profile>("catalogs/nist/catalog.json")
            .unwrap_err();
        assert!(matches!(err, ComplySyncError::InvalidModel { .. }));
    }

    #[test]
    fn names_lists_only_model_directories() {
        let dir = tempdir().unwrap();
        let store = WorkspaceModelStore::new(dir.path());
        store.save("b", &catalog()).unwrap();
        store.save("a", &catalog()).unwrap();
        std::fs::create_dir_all(dir.path().join("catalogs/empty")).unwrap();

        assert_eq!(store.names(ModelKind::Catalog).unwrap(), vec!["a", "b"]);
        assert!(store.names(ModelKind::Profile).unwrap().is_empty());
    }
}
