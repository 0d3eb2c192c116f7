//! Component definition model

use serde::{Deserialize, Serialize};

use super::{Extra, Metadata, OscalDocument};
use crate::domain::value_objects::ModelKind;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ComponentDefinition {
    pub uuid: String,
    pub metadata: Metadata,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<DefinedComponent>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DefinedComponent {
    pub uuid: String,
    #[serde(rename = "type")]
    pub component_type: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub control_implementations: Vec<ControlImplementation>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ControlImplementation {
    pub uuid: String,
    pub source: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub implemented_requirements: Vec<ImplementedRequirement>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ImplementedRequirement {
    pub uuid: String,
    pub control_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl DefinedComponent {
    /// First implemented requirement for `control_id` across all control implementations
    pub fn requirement_for(&self, control_id: &str) -> Option<&ImplementedRequirement> {
        self.control_implementations
            .iter()
            .flat_map(|ci| ci.implemented_requirements.iter())
            .find(|ir| ir.control_id == control_id)
    }
}

impl OscalDocument for ComponentDefinition {
    const KIND: ModelKind = ModelKind::ComponentDefinition;

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
