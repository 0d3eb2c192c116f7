//! Authored catalog
//!
//! Layout: `<markdown dir>/<group-id>/<control-id>.md`, enhancements living
//! next to their parent and naming it in `parent-id`. Assembling edits the
//! existing catalog: controls keep their position and anything the markdown
//! does not express. Controls new to the catalog follow the known ones in
//! file order, and new groups follow the known groups sorted by id.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{
    control_file, load_existing, object_name, workspace_path, write_control, AuthoredObject, CONTROL_GUIDANCE,
    CONTROL_STATEMENT, UNGROUPED_DIR,
};
use crate::domain::entities::oscal::catalog::{
    Control, Group, Parameter, GUIDANCE_PART, STATEMENT_PART,
};
use crate::domain::entities::oscal::{Catalog, Metadata, Part};
use crate::domain::ports::ModelRepository;
use crate::domain::services::{ControlBody, Section};
use crate::domain::value_objects::DerivedUuid;
use crate::error::ComplySyncResult;
use crate::infrastructure::WorkspaceModelStore;
use crate::parser::{find_markdown_files, parse_control_file};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CatalogFrontmatter {
    pub control_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_title: Option<String>,
    /// Control this one enhances
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterFrontmatter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ParameterFrontmatter {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

impl From<&Parameter> for ParameterFrontmatter {
    fn from(param: &Parameter) -> Self {
        Self {
            id: param.id.clone(),
            label: param.label.clone(),
            values: param.values.clone(),
        }
    }
}

pub struct AuthoredCatalog {
    store: WorkspaceModelStore,
}

impl AuthoredCatalog {
    pub fn new(store: WorkspaceModelStore) -> Self {
        Self { store }
    }
}

/// One control read from markdown, before it is placed in the catalog
struct Placed {
    control: Control,
    group: Option<(String, Option<String>)>,
    parent_id: Option<String>,
    /// Position in the existing catalog, then position on disk
    order: (usize, usize),
}

/// Set the prose of the part called `name`, dropping it when emptied unless it carries more
fn set_part_prose(parts: &mut Vec<Part>, name: &str, prose: &str) {
    match parts.iter().position(|p| p.name == name) {
        Some(i) if prose.is_empty() && parts[i].id.is_none() && parts[i].extra.is_empty() => {
            parts.remove(i);
        }
        Some(i) => parts[i].prose = prose.to_string(),
        None if !prose.is_empty() => parts.push(Part::new(name, prose)),
        None => {}
    }
}

fn control_from_markdown(fm: &CatalogFrontmatter, body: &ControlBody, previous: Option<&Control>) -> Control {
    let mut control = previous
        .cloned()
        .unwrap_or_else(|| Control::new(&fm.control_id, ""));
    control.title = fm.title.clone();
    control.controls.clear();

    let old_params = std::mem::take(&mut control.params);
    control.params = fm
        .parameters
        .iter()
        .map(|p| {
            let mut param = old_params
                .iter()
                .find(|old| old.id == p.id)
                .cloned()
                .unwrap_or_else(|| Parameter {
                    id: p.id.clone(),
                    ..Parameter::default()
                });
            param.label = p.label.clone();
            param.values = p.values.clone();
            param
        })
        .collect();

    set_part_prose(&mut control.parts, STATEMENT_PART, body.section_prose(CONTROL_STATEMENT));
    set_part_prose(&mut control.parts, GUIDANCE_PART, body.section_prose(CONTROL_GUIDANCE));
    control
}

/// Move the enhancements of `control` (and theirs) out of `children` into it
fn attach_enhancements(control: &mut Control, children: &mut HashMap<String, Vec<Control>>) {
    if let Some(enhancements) = children.remove(&control.id) {
        for mut enhancement in enhancements {
            attach_enhancements(&mut enhancement, children);
            control.controls.push(enhancement);
        }
    }
}

impl AuthoredObject for AuthoredCatalog {
    fn assemble(&self, markdown_path: &Path) -> ComplySyncResult<bool> {
        let name = object_name(markdown_path)?;
        let dir = workspace_path(self.store.root(), markdown_path);

        let mut catalog = load_existing::<Catalog>(&self.store, &name)?.unwrap_or_else(|| {
            Catalog::new(
                DerivedUuid::from_seed(&format!("catalog/{}", name)),
                Metadata::new(&name),
            )
        });
        let known = catalog.all_controls();
        let rank: HashMap<&str, usize> = known
            .iter()
            .enumerate()
            .map(|(i, found)| (found.control.id.as_str(), i))
            .collect();

        let mut placed = Vec::new();
        for (position, path) in find_markdown_files(&dir)?.into_iter().enumerate() {
            let file = parse_control_file::<CatalogFrontmatter>(&path)?;
            let fm = file.frontmatter;
            let previous = known.iter().find(|f| f.control.id == fm.control_id).map(|f| f.control);
            placed.push(Placed {
                control: control_from_markdown(&fm, &file.body, previous),
                order: (rank.get(fm.control_id.as_str()).copied().unwrap_or(usize::MAX), position),
                group: fm.group_id.map(|id| (id, fm.group_title)),
                parent_id: fm.parent_id,
            });
        }
        placed.sort_by_key(|p| p.order);

        let authored_ids: Vec<String> = placed.iter().map(|p| p.control.id.clone()).collect();
        let mut children: HashMap<String, Vec<Control>> = HashMap::new();
        let mut top_level = Vec::new();
        for entry in placed {
            match entry.parent_id {
                Some(parent) if authored_ids.contains(&parent) => {
                    children.entry(parent).or_default().push(entry.control);
                }
                Some(parent) => {
                    warn!(control = %entry.control.id, parent = %parent, "parent control not found, keeping it at top level");
                    top_level.push((entry.control, entry.group));
                }
                None => top_level.push((entry.control, entry.group)),
            }
        }

        let previous_groups: Vec<Group> = std::mem::take(&mut catalog.groups);
        let mut new_groups: BTreeMap<String, Group> = BTreeMap::new();
        let mut groups: Vec<Group> = previous_groups
            .into_iter()
            .map(|mut g| {
                g.controls.clear();
                g
            })
            .collect();
        let mut ungrouped = Vec::new();

        for (mut control, group) in top_level {
            attach_enhancements(&mut control, &mut children);
            let Some((group_id, group_title)) = group else {
                ungrouped.push(control);
                continue;
            };
            let target = match groups.iter_mut().find(|g| g.id == group_id) {
                Some(existing) => existing,
                None => new_groups.entry(group_id.clone()).or_insert_with(|| Group {
                    id: group_id,
                    ..Group::default()
                }),
            };
            if let Some(title) = group_title {
                target.title = title;
            }
            target.controls.push(control);
        }

        // Enhancements whose parents only form a cycle among themselves
        let stranded: Vec<String> = children.keys().cloned().collect();
        for parent in stranded {
            let Some(enhancements) = children.remove(&parent) else {
                continue;
            };
            for mut control in enhancements {
                warn!(control = %control.id, parent = %parent, "enhancement cycle, keeping it at top level");
                attach_enhancements(&mut control, &mut children);
                ungrouped.push(control);
            }
        }

        groups.retain(|g| !g.controls.is_empty());
        groups.extend(new_groups.into_values());
        catalog.groups = groups;
        catalog.controls = ungrouped;

        let changed = self.store.save(&name, &catalog)?;
        info!(catalog = %name, controls = authored_ids.len(), changed, "assembled catalog");
        Ok(changed)
    }

    fn regenerate(&self, model_path: &Path, markdown_path: &Path) -> ComplySyncResult<usize> {
        let name = object_name(model_path)?;
        let catalog: Catalog = self.store.load(&name)?;
        let dir = workspace_path(self.store.root(), markdown_path);

        let mut written = 0;
        for found in catalog.all_controls() {
            let control = found.control;
            let frontmatter = CatalogFrontmatter {
                control_id: control.id.clone(),
                title: control.title.clone(),
                group_id: found.group.map(|g| g.id.clone()),
                group_title: found.group.map(|g| g.title.clone()),
                parent_id: found.parent.map(|p| p.id.clone()),
                parameters: control.params.iter().map(ParameterFrontmatter::from).collect(),
            };
            let body = ControlBody::new(vec![
                Section::new(CONTROL_STATEMENT, control.statement()),
                Section::new(CONTROL_GUIDANCE, control.guidance()),
            ]);
            let subdir = found.group.map(|g| g.id.as_str()).unwrap_or(UNGROUPED_DIR);
            let path = control_file(&dir, subdir, &control.id);
            write_control(self.store.fs(), &path, &frontmatter, &body, &control.id, &control.title)?;
            written += 1;
        }

        info!(catalog = %name, controls = written, "regenerated catalog markdown");
        Ok(written)
    }
}
