//! Authored component definition
//!
//! Layout: `<markdown dir>/<component title>/<control-id>.md`. Each
//! component directory becomes one defined component; files are grouped
//! into control implementations by their `source` profile.

use std::collections::{BTreeMap, HashMap};
use std::path::{Component as PathComponent, Path};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{
    load_existing, object_name, workspace_path, write_control, AuthoredObject, CONTROL_STATEMENT, IMPLEMENTATION,
};
use crate::domain::entities::oscal::component::{
    ControlImplementation, DefinedComponent, ImplementedRequirement,
};
use crate::domain::entities::oscal::{ComponentDefinition, Metadata};
use crate::domain::ports::ModelRepository;
use crate::domain::services::{resolve_href, ControlBody, ResolvedProfile, Section};
use crate::domain::value_objects::{DerivedUuid, ModelKind};
use crate::error::{ComplySyncError, ComplySyncResult};
use crate::infrastructure::WorkspaceModelStore;
use crate::parser::{find_markdown_files, parse_control_file};

pub const DEFAULT_COMPONENT_TYPE: &str = "service";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ComponentFrontmatter {
    pub control_id: String,
    #[serde(default)]
    pub title: String,
    /// Href of the profile the requirement implements
    pub source: String,
    #[serde(default = "default_component_type")]
    pub component_type: String,
    #[serde(default)]
    pub component_description: String,
}

fn default_component_type() -> String {
    DEFAULT_COMPONENT_TYPE.to_string()
}

pub struct AuthoredComponentDefinition {
    store: WorkspaceModelStore,
}

impl AuthoredComponentDefinition {
    pub fn new(store: WorkspaceModelStore) -> Self {
        Self { store }
    }

    fn assemble_component(
        &self,
        name: &str,
        title: &str,
        dir: &Path,
        existing: Option<&DefinedComponent>,
    ) -> ComplySyncResult<Option<DefinedComponent>> {
        let mut by_source: BTreeMap<String, Vec<ImplementedRequirement>> = BTreeMap::new();
        let mut header: Option<ComponentFrontmatter> = None;

        for path in find_markdown_files(dir)? {
            let file = parse_control_file::<ComponentFrontmatter>(&path)?;
            let fm = file.frontmatter;
            let mut requirement = existing
                .and_then(|c| c.requirement_for(&fm.control_id))
                .cloned()
                .unwrap_or_else(|| ImplementedRequirement {
                    uuid: DerivedUuid::from_seed(&format!("{}/{}/{}", name, title, fm.control_id))
                        .into_string(),
                    control_id: fm.control_id.clone(),
                    ..ImplementedRequirement::default()
                });
            requirement.description = file.body.section_prose(IMPLEMENTATION).to_string();
            by_source.entry(fm.source.clone()).or_default().push(requirement);
            header.get_or_insert(fm);
        }

        let Some(header) = header else {
            warn!(component = %title, "component directory has no control markdown");
            return Ok(None);
        };

        let control_implementations = by_source
            .into_iter()
            .map(|(source, implemented_requirements)| {
                let mut ci = existing
                    .and_then(|c| c.control_implementations.iter().find(|ci| ci.source == source))
                    .cloned()
                    .unwrap_or_else(|| ControlImplementation {
                        uuid: DerivedUuid::from_seed(&format!("{}/{}/{}", name, title, source)).into_string(),
                        source,
                        ..ControlImplementation::default()
                    });
                ci.implemented_requirements = implemented_requirements;
                ci
            })
            .collect();

        let mut component = existing.cloned().unwrap_or_else(|| DefinedComponent {
            uuid: DerivedUuid::from_seed(&format!("{}/{}", name, title)).into_string(),
            title: title.to_string(),
            ..DefinedComponent::default()
        });
        component.component_type = header.component_type;
        component.description = header.component_description;
        component.control_implementations = control_implementations;
        Ok(Some(component))
    }
}

/// Component titles name directories, so each must be a single plain path component
fn check_titles(compdef: &ComponentDefinition, model: &Path) -> ComplySyncResult<()> {
    for component in &compdef.components {
        let title = component.title.as_str();
        let mut parts = Path::new(title).components();
        let single = matches!(
            (parts.next(), parts.next()),
            (Some(PathComponent::Normal(part)), None) if part == title
        );
        if !single || title.starts_with('.') {
            return Err(ComplySyncError::InvalidModel {
                path: model.to_path_buf(),
                message: format!("component title '{}' cannot be used as a directory name", title),
            });
        }
    }
    Ok(())
}

impl AuthoredObject for AuthoredComponentDefinition {
    fn assemble(&self, markdown_path: &Path) -> ComplySyncResult<bool> {
        let name = object_name(markdown_path)?;
        let dir = workspace_path(self.store.root(), markdown_path);
        if !dir.is_dir() {
            return Err(ComplySyncError::DirectoryNotFound { path: dir });
        }

        let mut compdef = load_existing::<ComponentDefinition>(&self.store, &name)?.unwrap_or_else(|| {
            ComponentDefinition {
                uuid: DerivedUuid::from_seed(&format!("component-definition/{}", name)).into_string(),
                metadata: Metadata::new(&name),
                ..ComponentDefinition::default()
            }
        });

        let mut titles = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }
            if let Some(title) = path.file_name().and_then(|n| n.to_str()) {
                if !title.starts_with('.') {
                    titles.push(title.to_string());
                }
            }
        }
        titles.sort();

        let mut components = Vec::new();
        for title in &titles {
            let existing = compdef.components.iter().find(|c| &c.title == title);
            if let Some(component) = self.assemble_component(&name, title, &dir.join(title), existing)? {
                components.push(component);
            }
        }
        compdef.components = components;

        let changed = self.store.save(&name, &compdef)?;
        info!(compdef = %name, changed, "assembled component definition");
        Ok(changed)
    }

    fn regenerate(&self, model_path: &Path, markdown_path: &Path) -> ComplySyncResult<usize> {
        let name = object_name(model_path)?;
        let compdef: ComponentDefinition = self.store.load(&name)?;
        check_titles(&compdef, &self.store.model_path(ModelKind::ComponentDefinition, &name))?;
        let dir = workspace_path(self.store.root(), markdown_path);

        let mut resolved: HashMap<&str, ResolvedProfile> = HashMap::new();
        let mut written = 0;
        for component in &compdef.components {
            for ci in &component.control_implementations {
                let profile = resolved.entry(ci.source.as_str()).or_insert_with(|| {
                    resolve_href(&self.store, &ci.source).unwrap_or_else(|e| {
                        warn!(source = %ci.source, error = %e, "cannot resolve source profile");
                        ResolvedProfile::default()
                    })
                });

                for req in &ci.implemented_requirements {
                    let control = profile.find(&req.control_id);
                    if control.is_none() {
                        warn!(control = %req.control_id, source = %ci.source, "control not found in source profile");
                    }
                    let title = control.map(|c| c.title.clone()).unwrap_or_default();
                    let frontmatter = ComponentFrontmatter {
                        control_id: req.control_id.clone(),
                        title: title.clone(),
                        source: ci.source.clone(),
                        component_type: component.component_type.clone(),
                        component_description: component.description.clone(),
                    };
                    let body = ControlBody::new(vec![
                        Section::new(
                            CONTROL_STATEMENT,
                            control.map(|c| c.statement.as_str()).unwrap_or_default(),
                        ),
                        Section::new(IMPLEMENTATION, req.description.as_str()),
                    ]);
                    let path = dir
                        .join(&component.title)
                        .join(format!("{}.md", req.control_id));
                    write_control(self.store.fs(), &path, &frontmatter, &body, &req.control_id, &title)?;
                    written += 1;
                }
            }
        }

        info!(compdef = %name, controls = written, "regenerated component definition markdown");
        Ok(written)
    }
}
