//! ModelRepository port - abstraction over the workspace's JSON models
//!
//! Models live at `<root>/<kind dir>/<name>/<kind file>`; cross references
//! between models are workspace-relative `href`s.

use crate::domain::entities::oscal::OscalDocument;
use crate::domain::value_objects::ModelKind;
use crate::error::ComplySyncResult;

pub trait ModelRepository {
    /// Load the model `name` of type `T`
    fn load<T: OscalDocument>(&self, name: &str) -> ComplySyncResult<T>;

    /// Load the model referenced by a workspace-relative href
    fn load_href<T: OscalDocument>(&self, href: &str) -> ComplySyncResult<T>;

    /// Save a model; returns `false` when the stored model was already equal
    fn save<T: OscalDocument>(&self, name: &str, model: &T) -> ComplySyncResult<bool>;

    fn exists(&self, kind: ModelKind, name: &str) -> bool;

    /// Names of all models of `kind`, sorted
    fn names(&self, kind: ModelKind) -> ComplySyncResult<Vec<String>>;

    /// Workspace-relative href for the model `name` of `kind`
    fn href_for(&self, kind: ModelKind, name: &str) -> String {
        format!("{}/{}/{}", kind.model_dir(), name, kind.file_name())
    }
}
