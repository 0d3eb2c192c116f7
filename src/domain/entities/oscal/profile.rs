//! Profile model: control selection and tailoring over imported catalogs

use serde::{Deserialize, Serialize};

use super::{Extra, Metadata, OscalDocument, Part};
use crate::domain::value_objects::ModelKind;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Profile {
    pub uuid: String,
    pub metadata: Metadata,
    pub imports: Vec<Import>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modify: Option<Modify>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Import {
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_all: Option<IncludeAll>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include_controls: Vec<SelectControls>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Marker object: `"include-all": {}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncludeAll {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SelectControls {
    pub with_ids: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Modify {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub set_parameters: Vec<SetParameter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alters: Vec<Alter>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SetParameter {
    pub param_id: String,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Alter {
    pub control_id: String,
    #[serde(default)]
    pub adds: Vec<Add>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Add {
    pub parts: Vec<Part>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Import {
    pub fn with_ids<I, S>(href: impl Into<String>, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            href: href.into(),
            include_controls: vec![SelectControls {
                with_ids: ids.into_iter().map(Into::into).collect(),
                ..SelectControls::default()
            }],
            ..Self::default()
        }
    }

    /// Ids listed under `include-controls`, in document order
    pub fn selected_ids(&self) -> impl Iterator<Item = &str> {
        self.include_controls
            .iter()
            .flat_map(|s| s.with_ids.iter().map(String::as_str))
    }

    pub fn selects(&self, control_id: &str) -> bool {
        self.include_all.is_some()
            || self
                .include_controls
                .iter()
                .any(|s| s.with_ids.iter().any(|id| id == control_id))
    }
}

impl Profile {
    pub fn set_parameters(&self) -> &[SetParameter] {
        self.modify
            .as_ref()
            .map(|m| m.set_parameters.as_slice())
            .unwrap_or(&[])
    }

    pub fn alters(&self) -> &[Alter] {
        self.modify.as_ref().map(|m| m.alters.as_slice()).unwrap_or(&[])
    }

    /// Prose added to a control by this profile under `part_name`
    pub fn added_prose(&self, control_id: &str, part_name: &str) -> String {
        self.alters()
            .iter()
            .filter(|a| a.control_id == control_id)
            .flat_map(|a| a.adds.iter())
            .flat_map(|add| add.parts.iter())
            .filter(|p| p.name == part_name && !p.prose.is_empty())
            .map(|p| p.prose.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl OscalDocument for Profile {
    const KIND: ModelKind = ModelKind::Profile;

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn include_all_selects_everything() {
        let import = Import {
            href: "catalogs/c/catalog.json".to_string(),
            include_all: Some(IncludeAll {}),
            ..Import::default()
        };
        assert!(import.selects("ac-1"));

        let json = serde_json::to_value(&import).unwrap();
        assert_eq!(json["include-all"], serde_json::json!({}));
    }

    #[test]
    fn include_controls_selects_listed_ids() {
        let import = Import::with_ids("catalogs/c/catalog.json", ["ac-1", "ac-2"]);
        assert!(import.selects("ac-2"));
        assert!(!import.selects("ac-3"));
        assert_eq!(import.selected_ids().collect::<Vec<_>>(), vec!["ac-1", "ac-2"]);
    }

    #[test]
    fn added_prose_joins_matching_parts() {
        let profile = Profile {
            uuid: "p".to_string(),
            metadata: Metadata::new("P"),
            modify: Some(Modify {
                alters: vec![Alter {
                    control_id: "ac-1".to_string(),
                    adds: vec![Add {
                        parts: vec![Part::new("guidance", "one"), Part::new("other", "x")],
                        ..Add::default()
                    }],
                    ..Alter::default()
                }],
                ..Modify::default()
            }),
            ..Profile::default()
        };
        assert_eq!(profile.added_prose("ac-1", "guidance"), "one");
        assert_eq!(profile.added_prose("ac-2", "guidance"), "");
    }
}
