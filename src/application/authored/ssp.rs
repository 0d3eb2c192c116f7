//! Authored system security plan
//!
//! An SSP is only meaningful together with its index entry: the entry names
//! the profile the plan implements and the component definitions whose
//! components take part in it. Both operations look the entry up before
//! reading or writing anything, so a missing entry leaves the workspace
//! untouched.
//!
//! Layout: `<markdown dir>/<group-id>/<control-id>.md`, with one `###`
//! subsection per component under `## Implementation`.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{
    control_file, group_dir, load_existing, object_name, workspace_path, write_control,
    AuthoredObject, CONTROL_STATEMENT, IMPLEMENTATION, UNGROUPED_DIR,
};
use crate::domain::entities::oscal::component::DefinedComponent;
use crate::domain::entities::oscal::ssp::{
    ByComponent, ImplementedRequirement, SystemCharacteristics, SystemComponent, THIS_SYSTEM,
};
use crate::domain::entities::oscal::{ComponentDefinition, Metadata, SystemSecurityPlan};
use crate::domain::entities::{Index, IndexEntry, IndexLookupError};
use crate::domain::ports::ModelRepository;
use crate::domain::services::{resolve_profile, ControlBody, Section, Subsection};
use crate::domain::value_objects::{DerivedUuid, ModelKind};
use crate::error::{ComplySyncError, ComplySyncResult};
use crate::infrastructure::WorkspaceModelStore;
use crate::parser::{find_markdown_files, parse_control_file};

pub const THIS_SYSTEM_TYPE: &str = "this-system";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SspFrontmatter {
    pub control_id: String,
    #[serde(default)]
    pub title: String,
}

pub struct AuthoredSsp<'a> {
    store: WorkspaceModelStore,
    index: &'a Index,
}

impl<'a> AuthoredSsp<'a> {
    pub fn new(store: WorkspaceModelStore, index: &'a Index) -> Self {
        Self { store, index }
    }

    fn entry(&self, name: &str) -> ComplySyncResult<&'a IndexEntry> {
        self.index
            .get_entry(name)
            .map_err(|IndexLookupError::NotFound { name }| ComplySyncError::NotInIndex {
                kind: ModelKind::SystemSecurityPlan.display_name(),
                name,
            })
    }

    /// "This System" followed by every component of the indexed definitions
    ///
    /// Components already in `existing` keep their unmodelled content; "This
    /// System" is kept as it is.
    fn system_components(
        &self,
        name: &str,
        entry: &IndexEntry,
        existing: &[SystemComponent],
    ) -> ComplySyncResult<Vec<SystemComponent>> {
        let previous = |title: &str| existing.iter().find(|c| c.title == title).cloned();

        let mut components = vec![previous(THIS_SYSTEM).unwrap_or_else(|| {
            SystemComponent::operational(
                DerivedUuid::from_seed(&format!("{}/this-system", name)),
                THIS_SYSTEM_TYPE,
                THIS_SYSTEM,
                "The system as a whole",
            )
        })];
        for comp in load_components(&self.store, entry.components().iter().map(String::as_str))? {
            let component = match previous(&comp.title) {
                Some(mut kept) => {
                    kept.uuid = comp.uuid;
                    kept.component_type = comp.component_type;
                    kept.description = comp.description;
                    kept
                }
                None => SystemComponent::operational(comp.uuid, comp.component_type, comp.title, comp.description),
            };
            components.push(component);
        }
        Ok(components)
    }

    fn requirement_from_markdown(
        name: &str,
        path: &Path,
        components: &[SystemComponent],
        existing: Option<&SystemSecurityPlan>,
    ) -> ComplySyncResult<ImplementedRequirement> {
        let file = parse_control_file::<SspFrontmatter>(path)?;
        let control_id = file.frontmatter.control_id;
        let previous = existing.and_then(|ssp| ssp.requirement_for(&control_id));

        let mut by_components = Vec::new();
        for sub in file.body.subsections(IMPLEMENTATION) {
            let component = components
                .iter()
                .find(|c| c.title == sub.heading)
                .ok_or_else(|| ComplySyncError::InvalidMarkdown {
                    file: path.to_path_buf(),
                    message: format!("unknown component '{}' under {}", sub.heading, IMPLEMENTATION),
                })?;
            let mut by_component = previous
                .and_then(|r| r.by_components.iter().find(|bc| bc.component_uuid == component.uuid))
                .cloned()
                .unwrap_or_else(|| ByComponent {
                    component_uuid: component.uuid.clone(),
                    uuid: DerivedUuid::from_seed(&format!("{}/{}/{}", name, control_id, component.uuid))
                        .into_string(),
                    ..ByComponent::default()
                });
            by_component.description = sub.prose.clone();
            by_components.push(by_component);
        }

        let mut requirement = previous.cloned().unwrap_or_else(|| ImplementedRequirement {
            uuid: DerivedUuid::from_seed(&format!("{}/{}", name, control_id)).into_string(),
            control_id,
            ..ImplementedRequirement::default()
        });
        requirement.by_components = by_components;
        Ok(requirement)
    }

    fn write_from_model(
        &self,
        ssp: &SystemSecurityPlan,
        profile: &str,
        dir: &Path,
    ) -> ComplySyncResult<usize> {
        let resolved = resolve_profile(&self.store, profile)?;

        let mut written = 0;
        for req in &ssp.control_implementation.implemented_requirements {
            let control = resolved.find(&req.control_id);
            if control.is_none() {
                warn!(control = %req.control_id, profile, "control not found in profile");
            }
            let title = control.map(|c| c.title.clone()).unwrap_or_default();

            let mut implementation = Section::new(IMPLEMENTATION, "");
            for bc in &req.by_components {
                match ssp.component_by_uuid(&bc.component_uuid) {
                    Some(component) => implementation.subsections.push(Subsection {
                        heading: component.title.clone(),
                        prose: bc.description.clone(),
                    }),
                    None => warn!(
                        control = %req.control_id,
                        component = %bc.component_uuid,
                        "by-component references an unknown system component"
                    ),
                }
            }
            let body = ControlBody::new(vec![
                Section::new(
                    CONTROL_STATEMENT,
                    control.map(|c| c.statement.as_str()).unwrap_or_default(),
                ),
                implementation,
            ]);
            let frontmatter = SspFrontmatter {
                control_id: req.control_id.clone(),
                title: title.clone(),
            };
            let subdir = control.map(group_dir).unwrap_or(UNGROUPED_DIR);
            let path = control_file(dir, subdir, &req.control_id);
            write_control(self.store.fs(), &path, &frontmatter, &body, &req.control_id, &title)?;
            written += 1;
        }
        Ok(written)
    }
}

impl AuthoredObject for AuthoredSsp<'_> {
    fn assemble(&self, markdown_path: &Path) -> ComplySyncResult<bool> {
        let name = object_name(markdown_path)?;
        let entry = self.entry(&name)?;
        let dir = workspace_path(self.store.root(), markdown_path);

        let existing = load_existing::<SystemSecurityPlan>(&self.store, &name)?;
        let components = self.system_components(
            &name,
            entry,
            existing
                .as_ref()
                .map(|ssp| ssp.system_implementation.components.as_slice())
                .unwrap_or_default(),
        )?;
        let implemented_requirements = find_markdown_files(&dir)?
            .iter()
            .map(|path| Self::requirement_from_markdown(&name, path, &components, existing.as_ref()))
            .collect::<ComplySyncResult<Vec<_>>>()?;
        let href = self.store.href_for(ModelKind::Profile, entry.profile());

        let mut ssp = existing.unwrap_or_else(|| SystemSecurityPlan {
            uuid: DerivedUuid::from_seed(&format!("ssp/{}", name)).into_string(),
            metadata: Metadata::new(&name),
            system_characteristics: SystemCharacteristics {
                system_name: name.clone(),
                ..SystemCharacteristics::default()
            },
            ..SystemSecurityPlan::default()
        });
        ssp.import_profile.href = href;
        ssp.system_implementation.components = components;
        ssp.control_implementation.implemented_requirements = implemented_requirements;

        let changed = self.store.save(&name, &ssp)?;
        info!(
            ssp = %name,
            requirements = ssp.control_implementation.implemented_requirements.len(),
            changed,
            "assembled SSP"
        );
        Ok(changed)
    }

    fn regenerate(&self, model_path: &Path, markdown_path: &Path) -> ComplySyncResult<usize> {
        let name = object_name(model_path)?;
        let entry = self.entry(&name)?;
        let dir = workspace_path(self.store.root(), markdown_path);

        let written = match load_existing::<SystemSecurityPlan>(&self.store, &name)? {
            Some(ssp) => self.write_from_model(&ssp, entry.profile(), &dir)?,
            None => {
                info!(ssp = %name, "no SSP model yet, generating markdown from profile and components");
                generate_ssp_markdown(
                    &self.store,
                    entry.profile(),
                    entry.components().iter().map(String::as_str),
                    &dir,
                )?
            }
        };

        info!(ssp = %name, controls = written, "regenerated SSP markdown");
        Ok(written)
    }
}

fn load_components<'n>(
    store: &WorkspaceModelStore,
    names: impl IntoIterator<Item = &'n str>,
) -> ComplySyncResult<Vec<DefinedComponent>> {
    let mut components = Vec::new();
    for name in names {
        let compdef: ComponentDefinition = store.load(name)?;
        components.extend(compdef.components);
    }
    Ok(components)
}

/// Write SSP markdown for every control of `profile`
///
/// Each control gets a "This System" subsection and one subsection per
/// component implementing it, seeded with the component's description of
/// the requirement. Prose already present in an existing file wins.
pub fn generate_ssp_markdown<'n>(
    store: &WorkspaceModelStore,
    profile: &str,
    compdefs: impl IntoIterator<Item = &'n str>,
    markdown_dir: &Path,
) -> ComplySyncResult<usize> {
    let resolved = resolve_profile(store, profile)?;
    let components = load_components(store, compdefs)?;

    let mut written = 0;
    for control in &resolved.controls {
        let path = control_file(markdown_dir, group_dir(control), &control.id);
        let existing = existing_prose(&path);

        let mut implementation = Section::new(IMPLEMENTATION, "");
        let seeds = std::iter::once((THIS_SYSTEM, "")).chain(components.iter().filter_map(|c| {
            c.requirement_for(&control.id)
                .map(|req| (c.title.as_str(), req.description.as_str()))
        }));
        for (heading, seed) in seeds {
            let prose = existing
                .get(heading)
                .filter(|p| !p.is_empty())
                .map(String::as_str)
                .unwrap_or(seed);
            implementation = implementation.with_subsection(heading, prose);
        }

        let body = ControlBody::new(vec![
            Section::new(CONTROL_STATEMENT, control.statement.as_str()),
            implementation,
        ]);
        let frontmatter = SspFrontmatter {
            control_id: control.id.clone(),
            title: control.title.clone(),
        };
        write_control(store.fs(), &path, &frontmatter, &body, &control.id, &control.title)?;
        written += 1;
    }

    info!(profile, controls = written, "generated SSP markdown");
    Ok(written)
}

/// Implementation prose by component title from a previously written file
fn existing_prose(path: &Path) -> HashMap<String, String> {
    if !path.is_file() {
        return HashMap::new();
    }
    match parse_control_file::<SspFrontmatter>(path) {
        Ok(file) => file
            .body
            .subsections(IMPLEMENTATION)
            .iter()
            .map(|s| (s.heading.clone(), s.prose.clone()))
            .collect(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable control markdown");
            HashMap::new()
        }
    }
}
