//! System security plan model

use serde::{Deserialize, Serialize};

use super::{Extra, Metadata, OscalDocument};
use crate::domain::value_objects::ModelKind;

/// Title of the component standing for the system as a whole
pub const THIS_SYSTEM: &str = "This System";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SystemSecurityPlan {
    pub uuid: String,
    pub metadata: Metadata,
    pub import_profile: ImportProfile,
    pub system_characteristics: SystemCharacteristics,
    pub system_implementation: SystemImplementation,
    pub control_implementation: ControlImplementation,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ImportProfile {
    pub href: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SystemCharacteristics {
    pub system_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SystemImplementation {
    pub components: Vec<SystemComponent>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SystemComponent {
    pub uuid: String,
    #[serde(rename = "type")]
    pub component_type: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: Status,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub state: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ControlImplementation {
    #[serde(default)]
    pub description: String,
    pub implemented_requirements: Vec<ImplementedRequirement>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ImplementedRequirement {
    pub uuid: String,
    pub control_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by_components: Vec<ByComponent>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ByComponent {
    pub component_uuid: String,
    pub uuid: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl SystemSecurityPlan {
    pub fn component_by_uuid(&self, uuid: &str) -> Option<&SystemComponent> {
        self.system_implementation
            .components
            .iter()
            .find(|c| c.uuid == uuid)
    }

    pub fn requirement_for(&self, control_id: &str) -> Option<&ImplementedRequirement> {
        self.control_implementation
            .implemented_requirements
            .iter()
            .find(|r| r.control_id == control_id)
    }

    pub fn component_by_title(&self, title: &str) -> Option<&SystemComponent> {
        self.system_implementation
            .components
            .iter()
            .find(|c| c.title == title)
    }
}

impl SystemComponent {
    pub fn operational(
        uuid: impl Into<String>,
        component_type: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            uuid: uuid.into(),
            component_type: component_type.into(),
            title: title.into(),
            description: description.into(),
            status: Status {
                state: "operational".to_string(),
                ..Status::default()
            },
            ..Self::default()
        }
    }
}

impl OscalDocument for SystemSecurityPlan {
    const KIND: ModelKind = ModelKind::SystemSecurityPlan;

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
