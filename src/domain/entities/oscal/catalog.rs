//! Catalog model: groups of controls with statements, guidance and parameters

use serde::{Deserialize, Serialize};

use super::{Extra, Metadata, OscalDocument, Part};
use crate::domain::value_objects::ModelKind;

pub const STATEMENT_PART: &str = "statement";
pub const GUIDANCE_PART: &str = "guidance";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Catalog {
    pub uuid: String,
    pub metadata: Metadata,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<Group>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub controls: Vec<Control>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Group {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub controls: Vec<Control>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Control {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<Part>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub controls: Vec<Control>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Parameter {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A control together with the group and (for enhancements) the parent it was found in
#[derive(Debug, Clone, Copy)]
pub struct ControlRef<'a> {
    pub group: Option<&'a Group>,
    pub parent: Option<&'a Control>,
    pub control: &'a Control,
}

impl Catalog {
    pub fn new(uuid: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            uuid: uuid.into(),
            metadata,
            ..Self::default()
        }
    }

    /// All controls in document order, enhancements following their parent
    pub fn all_controls(&self) -> Vec<ControlRef<'_>> {
        let mut out = Vec::new();
        for group in &self.groups {
            for control in &group.controls {
                push_flattened(Some(group), None, control, &mut out);
            }
        }
        for control in &self.controls {
            push_flattened(None, None, control, &mut out);
        }
        out
    }

    pub fn find_control(&self, id: &str) -> Option<ControlRef<'_>> {
        self.all_controls().into_iter().find(|c| c.control.id == id)
    }
}

fn push_flattened<'a>(
    group: Option<&'a Group>,
    parent: Option<&'a Control>,
    control: &'a Control,
    out: &mut Vec<ControlRef<'a>>,
) {
    out.push(ControlRef {
        group,
        parent,
        control,
    });
    for child in &control.controls {
        push_flattened(group, Some(control), child, out);
    }
}

impl Control {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn part_prose(&self, name: &str) -> &str {
        self.parts
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.prose.as_str())
            .unwrap_or("")
    }

    pub fn statement(&self) -> &str {
        self.part_prose(STATEMENT_PART)
    }

    pub fn guidance(&self) -> &str {
        self.part_prose(GUIDANCE_PART)
    }
}

impl OscalDocument for Catalog {
    const KIND: ModelKind = ModelKind::Catalog;

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

    fn catalog() -> Catalog {
        let mut ac1 = Control::new("ac-1", "Policy and Procedures");
        ac1.parts.push(Part::new(STATEMENT_PART, "Develop a policy."));
        let mut ac2 = Control::new("ac-2", "Account Management");
        ac2.controls.push(Control::new("ac-2.1", "Automated Management"));

        let mut catalog = Catalog::new("c", Metadata::new("Catalog"));
        catalog.groups.push(Group {
            id: "ac".to_string(),
            title: "Access Control".to_string(),
            controls: vec![ac1, ac2],
            ..Group::default()
        });
        catalog.controls.push(Control::new("x-1", "Loose"));
        catalog
    }

    #[test]
    fn all_controls_flattens_in_order() {
        let catalog = catalog();
        let ids: Vec<&str> = catalog
            .all_controls()
            .iter()
            .map(|c| c.control.id.as_str())
            .collect();
        assert_eq!(ids, vec!["ac-1", "ac-2", "ac-2.1", "x-1"]);
    }

    #[test]
    fn enhancements_keep_parent_group() {
        let catalog = catalog();
        let found = catalog.find_control("ac-2.1").unwrap();
        assert_eq!(found.group.map(|g| g.id.as_str()), Some("ac"));
        assert_eq!(found.parent.map(|c| c.id.as_str()), Some("ac-2"));
        assert!(catalog.find_control("ac-2").unwrap().parent.is_none());
        assert!(catalog.find_control("x-1").unwrap().group.is_none());
    }

    #[test]
    fn part_prose_defaults_to_empty() {
        let catalog = catalog();
        let ac1 = catalog.find_control("ac-1").unwrap().control;
        assert_eq!(ac1.statement(), "Develop a policy.");
        assert_eq!(ac1.guidance(), "");
    }
}
