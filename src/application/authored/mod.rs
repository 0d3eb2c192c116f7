//! Authored objects
//!
//! An authored object mediates between a named OSCAL model and its
//! directory of control markdown. Each kind implements the same two
//! operations:
//!
//! - `assemble(markdown_path)` - markdown -> model at the conventional location
//! - `regenerate(model_path, markdown_path)` - model -> markdown
//!
//! The object name is always the last component of the given path. Any
//! validation (the SSP index lookup) happens before the filesystem is
//! touched.

mod catalog;
mod compdef;
mod profile;
mod ssp;

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::entities::oscal::OscalDocument;
use crate::domain::entities::Index;
use crate::domain::ports::{FileSystem, ModelRepository};
use crate::domain::services::{ControlBody, ResolvedControl};
use crate::domain::value_objects::ModelKind;
use crate::error::{ComplySyncError, ComplySyncResult};
use crate::infrastructure::WorkspaceModelStore;
use crate::parser::render_document;

pub use catalog::AuthoredCatalog;
pub use compdef::AuthoredComponentDefinition;
pub use profile::AuthoredProfile;
pub use ssp::{generate_ssp_markdown, AuthoredSsp};

pub const CONTROL_STATEMENT: &str = "Control Statement";
pub const CONTROL_GUIDANCE: &str = "Control Guidance";
pub const PROFILE_GUIDANCE: &str = "Profile Guidance";
pub const IMPLEMENTATION: &str = "Implementation";

/// Directory for controls that belong to no group
pub const UNGROUPED_DIR: &str = "controls";

pub const SSP_INDEX_REQUIRED: &str = "Must set ssp_index_path when using SSP as oscal model.";

pub trait AuthoredObject {
    /// Build the model from the markdown under `markdown_path`
    ///
    /// Returns whether the stored model changed.
    fn assemble(&self, markdown_path: &Path) -> ComplySyncResult<bool>;

    /// Write markdown for the model named by the last component of `model_path`
    ///
    /// Returns the number of control files written.
    fn regenerate(&self, model_path: &Path, markdown_path: &Path) -> ComplySyncResult<usize>;
}

/// Build the authored object for `kind` in the workspace at `root`
///
/// SSPs need an index; asking for one without it is a configuration error.
pub fn authored_object<'a>(
    kind: ModelKind,
    root: &Path,
    index: Option<&'a Index>,
) -> ComplySyncResult<Box<dyn AuthoredObject + 'a>> {
    let store = WorkspaceModelStore::new(root);
    Ok(match kind {
        ModelKind::Catalog => Box::new(AuthoredCatalog::new(store)),
        ModelKind::Profile => Box::new(AuthoredProfile::new(store)),
        ModelKind::ComponentDefinition => Box::new(AuthoredComponentDefinition::new(store)),
        ModelKind::SystemSecurityPlan => {
            let index = index
                .ok_or_else(|| ComplySyncError::Configuration(SSP_INDEX_REQUIRED.to_string()))?;
            Box::new(AuthoredSsp::new(store, index))
        }
    })
}

/// Object name: the last component of `path`
pub fn object_name(path: &Path) -> ComplySyncResult<String> {
    path.components()
        .next_back()
        .and_then(|c| c.as_os_str().to_str())
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .map(str::to_string)
        .ok_or_else(|| ComplySyncError::Configuration(format!(
            "cannot determine object name from path '{}'",
            path.display()
        )))
}

/// Resolve a workspace-relative path; absolute paths pass through
pub fn workspace_path(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Load the model `name` if it exists; unreadable models are still errors
pub fn load_existing<T: OscalDocument>(
    store: &WorkspaceModelStore,
    name: &str,
) -> ComplySyncResult<Option<T>> {
    match store.load::<T>(name) {
        Ok(model) => Ok(Some(model)),
        Err(ComplySyncError::ModelNotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Group directory a resolved control is written under
pub fn group_dir(control: &ResolvedControl) -> &str {
    control.group_id.as_deref().unwrap_or(UNGROUPED_DIR)
}

/// Render and write one control markdown file
pub fn write_control<F: FileSystem, T: Serialize>(
    fs: &F,
    path: &Path,
    frontmatter: &T,
    body: &ControlBody,
    control_id: &str,
    title: &str,
) -> ComplySyncResult<()> {
    let document = render_document(frontmatter, &body.render(control_id, title), path)?;
    fs.write(path, &document)?;
    Ok(())
}

pub fn control_file(dir: &Path, subdir: &str, control_id: &str) -> PathBuf {
    dir.join(subdir).join(format!("{}.md", control_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_name_is_last_component() {
        assert_eq!(object_name(Path::new("md_ssp/test-ssp")).unwrap(), "test-ssp");
        assert_eq!(object_name(Path::new("/abs/md/test-ssp/")).unwrap(), "test-ssp");
        assert_eq!(
            object_name(Path::new("system-security-plans/test-ssp")).unwrap(),
            "test-ssp"
        );
    }

    #[test]
    fn object_name_rejects_empty_paths() {
        assert!(object_name(Path::new("")).is_err());
        assert!(object_name(Path::new("..")).is_err());
    }

    #[test]
    fn workspace_path_keeps_absolute() {
        let root = Path::new("/ws");
        assert_eq!(workspace_path(root, Path::new("md/a")), PathBuf::from("/ws/md/a"));
        assert_eq!(workspace_path(root, Path::new("/other/a")), PathBuf::from("/other/a"));
    }

    #[test]
    fn ssp_without_index_is_configuration_error() {
        let err = authored_object(ModelKind::SystemSecurityPlan, Path::new("."), None)
            .err()
            .unwrap();
        assert!(err.is_configuration());
        assert_eq!(err.to_string(), SSP_INDEX_REQUIRED);
    }

    #[test]
    fn other_kinds_need_no_index() {
        for kind in [ModelKind::Catalog, ModelKind::Profile, ModelKind::ComponentDefinition] {
            assert!(authored_object(kind, Path::new("."), None).is_ok());
        }
    }
}
