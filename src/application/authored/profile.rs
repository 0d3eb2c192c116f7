//! Authored profile
//!
//! Layout: `<markdown dir>/<group-id>/<control-id>.md`. Each file selects one
//! control from the catalog or profile named by `source`; files sharing a
//! source become one import. `set-parameters` and the "Profile Guidance"
//! section become the profile's modifications.
//!
//! Assembling edits the existing profile in place: an import whose selection
//! did not change is kept as written (`include-all` included), and
//! modifications the markdown does not express survive.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{
    control_file, group_dir, load_existing, object_name, workspace_path, write_control, AuthoredObject,
    CONTROL_STATEMENT, PROFILE_GUIDANCE,
};
use crate::domain::entities::oscal::catalog::GUIDANCE_PART;
use crate::domain::entities::oscal::profile::{Add, Alter, Import, Modify, SelectControls, SetParameter};
use crate::domain::entities::oscal::{Metadata, Part, Profile};
use crate::domain::ports::ModelRepository;
use crate::domain::services::{resolve_href, resolve_profile, ControlBody, ResolvedProfile, Section};
use crate::domain::value_objects::DerivedUuid;
use crate::error::{ComplySyncError, ComplySyncResult};
use crate::infrastructure::WorkspaceModelStore;
use crate::parser::{find_markdown_files, parse_control_file};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProfileFrontmatter {
    pub control_id: String,
    #[serde(default)]
    pub title: String,
    /// Href of the imported catalog or profile
    pub source: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub set_parameters: BTreeMap<String, Vec<String>>,
}

/// What the markdown directory says about the profile
#[derive(Debug, Default)]
struct AuthoredSelection {
    /// Source href and the control ids selected from it, in first-seen order
    sources: Vec<(String, Vec<String>)>,
    set_parameters: BTreeMap<String, Vec<String>>,
    /// Control id and its profile guidance (possibly empty)
    guidance: Vec<(String, String)>,
}

impl AuthoredSelection {
    fn read(dir: &Path) -> ComplySyncResult<Self> {
        let mut selection = Self::default();
        for path in find_markdown_files(dir)? {
            let file = parse_control_file::<ProfileFrontmatter>(&path)?;
            let fm = file.frontmatter;

            match selection.sources.iter_mut().find(|(href, _)| *href == fm.source) {
                Some((_, ids)) => ids.push(fm.control_id.clone()),
                None => selection.sources.push((fm.source, vec![fm.control_id.clone()])),
            }
            selection.set_parameters.extend(fm.set_parameters);
            selection
                .guidance
                .push((fm.control_id, file.body.section_prose(PROFILE_GUIDANCE).to_string()));
        }
        Ok(selection)
    }

    fn control_ids(&self) -> HashSet<&str> {
        self.sources
            .iter()
            .flat_map(|(_, ids)| ids.iter().map(String::as_str))
            .collect()
    }
}

pub struct AuthoredProfile {
    store: WorkspaceModelStore,
}

impl AuthoredProfile {
    pub fn new(store: WorkspaceModelStore) -> Self {
        Self { store }
    }

    /// Resolve every source once; unresolvable sources are skipped with a warning
    fn resolve_sources(&self, selection: &AuthoredSelection) -> HashMap<String, ResolvedProfile> {
        let mut resolved = HashMap::new();
        for (href, _) in &selection.sources {
            match resolve_href(&self.store, href) {
                Ok(profile) => {
                    resolved.insert(href.clone(), profile);
                }
                Err(e) => warn!(source = %href, error = %e, "cannot resolve import source"),
            }
        }
        resolved
    }
}

/// Rebuild the import list, keeping existing imports whose selection is unchanged
fn merge_imports(
    previous: &[Import],
    selection: &AuthoredSelection,
    resolved: &HashMap<String, ResolvedProfile>,
) -> Vec<Import> {
    let mut imports = Vec::new();
    let mut placed = HashSet::new();

    for import in previous {
        let Some((href, ids)) = selection.sources.iter().find(|(href, _)| *href == import.href) else {
            continue;
        };
        if placed.insert(href.as_str()) {
            imports.push(merge_import(import, ids, resolved.get(href)));
        }
    }
    for (href, ids) in &selection.sources {
        if placed.insert(href.as_str()) {
            imports.push(Import::with_ids(href.clone(), ids.iter().cloned()));
        }
    }
    imports
}

fn merge_import(previous: &Import, ids: &[String], resolved: Option<&ResolvedProfile>) -> Import {
    let wanted: BTreeSet<&str> = ids.iter().map(String::as_str).collect();

    let unchanged = if previous.include_all.is_some() {
        resolved.is_some_and(|r| r.control_ids().collect::<BTreeSet<_>>() == wanted)
    } else {
        previous.selected_ids().collect::<BTreeSet<_>>() == wanted
    };
    if unchanged {
        return previous.clone();
    }

    debug!(source = %previous.href, "import selection changed");
    let mut with_ids: Vec<String> = previous
        .selected_ids()
        .filter(|id| wanted.contains(id))
        .map(str::to_string)
        .collect();
    for id in ids {
        if !with_ids.contains(id) {
            with_ids.push(id.clone());
        }
    }

    let mut import = previous.clone();
    import.include_all = None;
    import.include_controls = vec![SelectControls {
        with_ids,
        ..SelectControls::default()
    }];
    import
}

/// Point the first guidance part added to `control_id` at `prose`
fn set_guidance(modify: &mut Modify, control_id: &str, prose: &str) {
    let mut parts = modify
        .alters
        .iter_mut()
        .filter(|a| a.control_id == control_id)
        .flat_map(|a| a.adds.iter_mut())
        .flat_map(|add| add.parts.iter_mut())
        .filter(|p| p.name == GUIDANCE_PART);

    match parts.next() {
        Some(first) => {
            first.prose = prose.to_string();
            for rest in parts {
                rest.prose.clear();
            }
        }
        None if !prose.is_empty() => modify.alters.push(Alter {
            control_id: control_id.to_string(),
            adds: vec![Add {
                parts: vec![Part::new(GUIDANCE_PART, prose)],
                ..Add::default()
            }],
            ..Alter::default()
        }),
        None => {}
    }
}

/// Drop emptied guidance parts, then adds and alters left with nothing in them
fn prune_alters(modify: &mut Modify) {
    for alter in &mut modify.alters {
        for add in &mut alter.adds {
            add.parts.retain(|p| {
                !(p.name == GUIDANCE_PART && p.prose.is_empty() && p.id.is_none() && p.extra.is_empty())
            });
        }
        alter.adds.retain(|add| !add.parts.is_empty() || !add.extra.is_empty());
    }
    modify.alters.retain(|a| !a.adds.is_empty() || !a.extra.is_empty());
}

fn merge_modify(
    previous: Option<Modify>,
    selection: AuthoredSelection,
    resolved: &HashMap<String, ResolvedProfile>,
) -> Option<Modify> {
    let selected = selection.control_ids();
    // Parameters the markdown speaks for; others set by the profile are kept as they are
    let owned: HashSet<&str> = resolved
        .values()
        .flat_map(|r| r.controls.iter())
        .filter(|c| selected.contains(c.id.as_str()))
        .flat_map(|c| c.params.iter().map(|p| p.id.as_str()))
        .collect();

    let mut modify = previous.unwrap_or_default();
    let mut authored = selection.set_parameters.clone();
    modify.set_parameters.retain_mut(|sp| match authored.remove(&sp.param_id) {
        Some(values) => {
            sp.values = values;
            true
        }
        None => !owned.contains(sp.param_id.as_str()),
    });
    modify
        .set_parameters
        .extend(authored.into_iter().map(|(param_id, values)| SetParameter {
            param_id,
            values,
            ..SetParameter::default()
        }));

    modify.alters.retain(|a| selected.contains(a.control_id.as_str()));
    for (control_id, prose) in &selection.guidance {
        set_guidance(&mut modify, control_id, prose);
    }
    prune_alters(&mut modify);

    (modify != Modify::default()).then_some(modify)
}

impl AuthoredObject for AuthoredProfile {
    fn assemble(&self, markdown_path: &Path) -> ComplySyncResult<bool> {
        let name = object_name(markdown_path)?;
        let dir = workspace_path(self.store.root(), markdown_path);

        let selection = AuthoredSelection::read(&dir)?;
        if selection.sources.is_empty() {
            return Err(ComplySyncError::InvalidMarkdown {
                file: dir,
                message: "no control markdown found".to_string(),
            });
        }
        let resolved = self.resolve_sources(&selection);

        let mut profile = load_existing::<Profile>(&self.store, &name)?.unwrap_or_else(|| Profile {
            uuid: DerivedUuid::from_seed(&format!("profile/{}", name)).into_string(),
            metadata: Metadata::new(&name),
            ..Profile::default()
        });
        profile.imports = merge_imports(&profile.imports, &selection, &resolved);
        profile.modify = merge_modify(profile.modify.take(), selection, &resolved);

        let changed = self.store.save(&name, &profile)?;
        info!(profile = %name, imports = profile.imports.len(), changed, "assembled profile");
        Ok(changed)
    }

    fn regenerate(&self, model_path: &Path, markdown_path: &Path) -> ComplySyncResult<usize> {
        let name = object_name(model_path)?;
        let profile: Profile = self.store.load(&name)?;
        let resolved = resolve_profile(&self.store, &name)?;
        let dir = workspace_path(self.store.root(), markdown_path);

        let mut written = 0;
        for control in &resolved.controls {
            let Some(source) = control.import_href.clone() else {
                warn!(control = %control.id, "resolved control has no selecting import");
                continue;
            };

            let set_parameters = profile
                .set_parameters()
                .iter()
                .filter(|sp| control.params.iter().any(|p| p.id == sp.param_id))
                .map(|sp| (sp.param_id.clone(), sp.values.clone()))
                .collect();
            let frontmatter = ProfileFrontmatter {
                control_id: control.id.clone(),
                title: control.title.clone(),
                source,
                set_parameters,
            };
            let body = ControlBody::new(vec![
                Section::new(CONTROL_STATEMENT, control.statement.as_str()),
                Section::new(PROFILE_GUIDANCE, profile.added_prose(&control.id, GUIDANCE_PART)),
            ]);
            let path = control_file(&dir, group_dir(control), &control.id);
            write_control(self.store.fs(), &path, &frontmatter, &body, &control.id, &control.title)?;
            written += 1;
        }

        info!(profile = %name, controls = written, "regenerated profile markdown");
        Ok(written)
    }
}
