//! ModelKind value object - the four authored OSCAL object types
//!
//! Each kind knows its conventional workspace layout:
//! `<root>/<model_dir>/<name>/<file_name>`.

/// Kind of OSCAL object managed in a workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModelKind {
    Catalog,
    Profile,
    ComponentDefinition,
    SystemSecurityPlan,
}

impl ModelKind {
    pub const ALL: [ModelKind; 4] = [
        ModelKind::Catalog,
        ModelKind::Profile,
        ModelKind::ComponentDefinition,
        ModelKind::SystemSecurityPlan,
    ];

    /// Directory under the workspace root holding models of this kind
    pub fn model_dir(&self) -> &'static str {
        match self {
            ModelKind::Catalog => "catalogs",
            ModelKind::Profile => "profiles",
            ModelKind::ComponentDefinition => "component-definitions",
            ModelKind::SystemSecurityPlan => "system-security-plans",
        }
    }

    /// File name of the JSON model inside its named directory
    pub fn file_name(&self) -> &'static str {
        match self {
            ModelKind::Catalog => "catalog.json",
            ModelKind::Profile => "profile.json",
            ModelKind::ComponentDefinition => "component-definition.json",
            ModelKind::SystemSecurityPlan => "system-security-plan.json",
        }
    }

    /// Top-level key wrapping the model in its JSON document
    pub fn root_key(&self) -> &'static str {
        match self {
            ModelKind::Catalog => "catalog",
            ModelKind::Profile => "profile",
            ModelKind::ComponentDefinition => "component-definition",
            ModelKind::SystemSecurityPlan => "system-security-plan",
        }
    }

    /// Short name accepted on the command line
    pub fn cli_name(&self) -> &'static str {
        match self {
            ModelKind::Catalog => "catalog",
            ModelKind::Profile => "profile",
            ModelKind::ComponentDefinition => "compdef",
            ModelKind::SystemSecurityPlan => "ssp",
        }
    }

    /// Human-facing type name used in diagnostics
    pub fn display_name(&self) -> &'static str {
        match self {
            ModelKind::Catalog => "Catalog",
            ModelKind::Profile => "Profile",
            ModelKind::ComponentDefinition => "Component Definition",
            ModelKind::SystemSecurityPlan => "SSP",
        }
    }

    pub fn from_cli_name(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.cli_name() == value)
    }

    /// Kind of the model an href points at, judged by its file name
    pub fn from_href(href: &str) -> Option<Self> {
        let file = href.rsplit(['/', '\\']).next()?;
        Self::ALL.into_iter().find(|kind| kind.file_name() == file)
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.cli_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_names_round_trip() {
        for kind in ModelKind::ALL {
            assert_eq!(ModelKind::from_cli_name(kind.cli_name()), Some(kind));
        }
    }

    #[test]
    fn unknown_cli_name_is_rejected() {
        assert_eq!(ModelKind::from_cli_name("fake"), None);
        assert_eq!(ModelKind::from_cli_name("SSP"), None);
        assert_eq!(ModelKind::from_cli_name(""), None);
    }

    #[test]
    fn href_kind_follows_file_name() {
        assert_eq!(
            ModelKind::from_href("catalogs/nist/catalog.json"),
            Some(ModelKind::Catalog)
        );
        assert_eq!(
            ModelKind::from_href("profiles/p/profile.json"),
            Some(ModelKind::Profile)
        );
        assert_eq!(ModelKind::from_href("catalogs/nist/other.json"), None);
    }

    #[test]
    fn layout_is_conventional() {
        let kind = ModelKind::SystemSecurityPlan;
        assert_eq!(kind.model_dir(), "system-security-plans");
        assert_eq!(kind.file_name(), "system-security-plan.json");
        assert_eq!(kind.root_key(), "system-security-plan");
        assert_eq!(kind.display_name(), "SSP");
    }
}
