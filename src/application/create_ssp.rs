//! Create SSP Use Case
//!
//! Registers a new SSP in the index, writes its starting markdown from the
//! profile and component definitions, and assembles the first model.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::application::authored::{generate_ssp_markdown, workspace_path, AuthoredObject, AuthoredSsp};
use crate::domain::entities::IndexEntry;
use crate::domain::ports::{IndexRepository, ModelRepository};
use crate::domain::value_objects::ModelKind;
use crate::error::{ComplySyncError, ComplySyncResult};
use crate::infrastructure::WorkspaceModelStore;

use super::load_index_or_new;

#[derive(Debug, Clone)]
pub struct CreateSspOptions {
    pub name: String,
    pub profile: String,
    pub components: Vec<String>,
    /// Parent directory of the SSP's markdown, relative to the workspace root
    pub markdown_dir: PathBuf,
    pub index_path: PathBuf,
}

pub struct CreateSspUseCase<IR>
where
    IR: IndexRepository,
{
    root: PathBuf,
    index_repo: IR,
}

impl<IR> CreateSspUseCase<IR>
where
    IR: IndexRepository,
{
    pub fn new(root: impl Into<PathBuf>, index_repo: IR) -> Self {
        Self {
            root: root.into(),
            index_repo,
        }
    }

    /// Returns the number of control files written
    pub fn execute(&self, options: &CreateSspOptions) -> ComplySyncResult<usize> {
        let store = WorkspaceModelStore::new(&self.root);
        if !store.exists(ModelKind::Profile, &options.profile) {
            return Err(ComplySyncError::ModelNotFound {
                path: store.model_path(ModelKind::Profile, &options.profile),
            });
        }
        for comp in &options.components {
            if !store.exists(ModelKind::ComponentDefinition, comp) {
                return Err(ComplySyncError::ModelNotFound {
                    path: store.model_path(ModelKind::ComponentDefinition, comp),
                });
            }
        }

        let index_path = workspace_path(&self.root, &options.index_path);
        let mut index = load_index_or_new(&self.index_repo, &index_path)?;
        let entry = IndexEntry::new(&options.profile, &options.components);
        if let Some(previous) = index.insert(&options.name, entry) {
            warn!(ssp = %options.name, previous_profile = previous.profile(), "replacing index entry");
        }
        self.index_repo
            .save(&index, &index_path)
            .map_err(|e| ComplySyncError::InvalidIndex {
                path: index_path.clone(),
                message: e.to_string(),
            })?;

        let markdown_path = options.markdown_dir.join(&options.name);
        let written = generate_ssp_markdown(
            &store,
            &options.profile,
            options.components.iter().map(String::as_str),
            &workspace_path(&self.root, &markdown_path),
        )?;

        AuthoredSsp::new(store, &index).assemble(&markdown_path)?;
        info!(ssp = %options.name, controls = written, "created SSP");
        Ok(written)
    }
}
