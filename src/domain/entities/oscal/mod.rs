//! OSCAL object model subset
//!
//! Only the fields the markdown round trip reads or writes are modelled.
//! Everything else is carried through untouched in each record's `extra`
//! map, so loading and saving a document never drops content.
//!
//! Every document is a JSON object with a single root key naming its kind
//! (`{"catalog": {...}}`), and all keys are kebab-case.

pub mod catalog;
pub mod component;
pub mod profile;
pub mod ssp;

use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::domain::value_objects::ModelKind;

pub use catalog::Catalog;
pub use component::ComponentDefinition;
pub use profile::Profile;
pub use ssp::SystemSecurityPlan;

/// Keys of a record that are not modelled, kept verbatim
pub type Extra = serde_json::Map<String, serde_json::Value>;

/// OSCAL schema version written into new documents
pub const OSCAL_VERSION: &str = "1.1.2";

/// Document metadata shared by every model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Metadata {
    pub title: String,
    #[serde(default)]
    pub last_modified: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_oscal_version")]
    pub oscal_version: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Default for Metadata {
    fn default() -> Self {
        Self::new("")
    }
}

impl Metadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            last_modified: String::new(),
            version: default_version(),
            oscal_version: default_oscal_version(),
            extra: Extra::new(),
        }
    }
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_oscal_version() -> String {
    OSCAL_VERSION.to_string()
}

/// Named block of prose (statement, guidance, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Part {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub prose: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Part {
    pub fn new(name: impl Into<String>, prose: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prose: prose.into(),
            ..Self::default()
        }
    }
}

/// A top-level OSCAL model stored as its own JSON document
pub trait OscalDocument: Serialize + DeserializeOwned + Clone + PartialEq {
    const KIND: ModelKind;

    fn metadata(&self) -> &Metadata;

    fn metadata_mut(&mut self) -> &mut Metadata;
}

struct Wrapped<'a, T>(&'a T);

impl<T: OscalDocument> Serialize for Wrapped<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(T::KIND.root_key(), self.0)?;
        map.end()
    }
}

/// Serialize a model as a pretty-printed, root-wrapped JSON document
pub fn to_document<T: OscalDocument>(model: &T) -> serde_json::Result<String> {
    let mut out = serde_json::to_string_pretty(&Wrapped(model))?;
    out.push('\n');
    Ok(out)
}

/// Parse a root-wrapped JSON document
pub fn from_document<T: OscalDocument>(content: &str) -> Result<T, String> {
    let mut value: serde_json::Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
    let root = T::KIND.root_key();
    let inner = value
        .get_mut(root)
        .map(serde_json::Value::take)
        .ok_or_else(|| format!("missing top-level '{}' key", root))?;
    serde_json::from_value(inner).map_err(|e| e.to_string())
}
