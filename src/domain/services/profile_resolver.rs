//! Profile resolution
//!
//! Turns a profile into the flat list of controls it selects: imports are
//! followed (catalogs directly, nested profiles recursively), parameters are
//! set and `{{ insert: param, <id> }}` markers in statements are replaced by
//! their values.

use std::collections::HashSet;

use crate::domain::entities::oscal::catalog::Parameter;
use crate::domain::entities::oscal::{Catalog, Profile};
use crate::domain::ports::ModelRepository;
use crate::domain::value_objects::ModelKind;
use crate::error::{ComplySyncError, ComplySyncResult};

/// Nested profile imports deeper than this are rejected as cyclic
pub const MAX_IMPORT_DEPTH: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedControl {
    pub id: String,
    pub title: String,
    pub group_id: Option<String>,
    pub group_title: Option<String>,
    pub statement: String,
    pub guidance: String,
    pub params: Vec<Parameter>,
    /// Href of the top-level import that selected the control; `None` for catalogs
    pub import_href: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedProfile {
    pub controls: Vec<ResolvedControl>,
}

impl ResolvedProfile {
    pub fn find(&self, control_id: &str) -> Option<&ResolvedControl> {
        self.controls.iter().find(|c| c.id == control_id)
    }

    pub fn control_ids(&self) -> impl Iterator<Item = &str> {
        self.controls.iter().map(|c| c.id.as_str())
    }
}

/// Resolve the profile named `name` in the workspace
pub fn resolve_profile<R: ModelRepository>(repo: &R, name: &str) -> ComplySyncResult<ResolvedProfile> {
    resolve_href(repo, &repo.href_for(ModelKind::Profile, name))
}

/// Resolve the profile (or catalog) at a workspace-relative href
pub fn resolve_href<R: ModelRepository>(repo: &R, href: &str) -> ComplySyncResult<ResolvedProfile> {
    let mut resolved = resolve_at_depth(repo, href, 0)?;
    for control in &mut resolved.controls {
        control.statement = insert_params(&control.statement, &control.params);
    }
    Ok(resolved)
}

fn resolve_at_depth<R: ModelRepository>(
    repo: &R,
    href: &str,
    depth: usize,
) -> ComplySyncResult<ResolvedProfile> {
    if depth > MAX_IMPORT_DEPTH {
        return Err(ComplySyncError::InvalidModel {
            path: href.into(),
            message: format!("imports nested deeper than {} levels", MAX_IMPORT_DEPTH),
        });
    }

    match ModelKind::from_href(href) {
        Some(ModelKind::Catalog) => Ok(from_catalog(&repo.load_href::<Catalog>(href)?)),
        Some(ModelKind::Profile) => {
            let profile: Profile = repo.load_href(href)?;
            from_profile(repo, &profile, depth)
        }
        _ => Err(ComplySyncError::InvalidModel {
            path: href.into(),
            message: "profile imports must reference a catalog or a profile".to_string(),
        }),
    }
}

fn from_catalog(catalog: &Catalog) -> ResolvedProfile {
    let controls = catalog
        .all_controls()
        .into_iter()
        .map(|found| ResolvedControl {
            id: found.control.id.clone(),
            title: found.control.title.clone(),
            group_id: found.group.map(|g| g.id.clone()),
            group_title: found.group.map(|g| g.title.clone()),
            statement: found.control.statement().to_string(),
            guidance: found.control.guidance().to_string(),
            params: found.control.params.clone(),
            import_href: None,
        })
        .collect();
    ResolvedProfile { controls }
}

fn from_profile<R: ModelRepository>(
    repo: &R,
    profile: &Profile,
    depth: usize,
) -> ComplySyncResult<ResolvedProfile> {
    let mut seen = HashSet::new();
    let mut controls = Vec::new();

    for import in &profile.imports {
        let imported = resolve_at_depth(repo, &import.href, depth + 1)?;
        for mut control in imported.controls {
            if import.selects(&control.id) && seen.insert(control.id.clone()) {
                control.import_href = Some(import.href.clone());
                controls.push(control);
            }
        }
    }

    for set in profile.set_parameters() {
        for control in &mut controls {
            if let Some(param) = control.params.iter_mut().find(|p| p.id == set.param_id) {
                param.values = set.values.clone();
            }
        }
    }

    Ok(ResolvedProfile { controls })
}

/// Replace `{{ insert: param, <id> }}` markers with parameter text
///
/// Unknown parameter ids and malformed markers are left as written.
pub fn insert_params(prose: &str, params: &[Parameter]) -> String {
    let mut out = String::with_capacity(prose.len());
    let mut rest = prose;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            rest = &rest[start..];
            break;
        };
        let marker = &rest[start..start + 2 + end + 2];
        match param_id(&after[..end]).and_then(|id| params.iter().find(|p| p.id == id)) {
            Some(param) => out.push_str(&param_text(param)),
            None => out.push_str(marker),
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

fn param_id(inner: &str) -> Option<&str> {
    let inner = inner.trim().strip_prefix("insert:")?.trim_start();
    let id = inner.strip_prefix("param")?.trim_start().strip_prefix(',')?;
    Some(id.trim())
}

fn param_text(param: &Parameter) -> String {
    if !param.values.is_empty() {
        param.values.join(", ")
    } else {
        format!("<{}>", param.label.as_deref().unwrap_or(&param.id))
    }
}
