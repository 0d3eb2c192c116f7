//! SSP workflows against the simplified NIST fixtures

mod common;

use std::path::Path;

use common::TestEnv;
use complysync::application::authored::{generate_ssp_markdown, AuthoredSsp};
use complysync::application::AuthoredObject;
use complysync::domain::entities::oscal::SystemSecurityPlan;
use complysync::domain::ports::{IndexRepository, ModelRepository};
use complysync::infrastructure::{JsonIndexRepository, WorkspaceModelStore};
use complysync::{ComplySyncError, Index, IndexEntry, IndexLookupError};

const SSP: &str = "test-ssp";
const PROFILE: &str = "simplified_nist_profile";
const MARKDOWN: &str = "md_ssp/test-ssp";
const MODEL: &str = "system-security-plans/test-ssp";

fn index_for(name: &str) -> Index {
    let mut index = Index::new();
    index.insert(name, IndexEntry::new(PROFILE, ["test_comp"]));
    index
}

fn generate(env: &TestEnv) -> usize {
    let store = WorkspaceModelStore::new(env.root.path());
    generate_ssp_markdown(&store, PROFILE, ["test_comp"], &env.path(MARKDOWN)).unwrap()
}

fn load_ssp(env: &TestEnv) -> SystemSecurityPlan {
    WorkspaceModelStore::new(env.root.path()).load(SSP).unwrap()
}

#[test]
fn assembling_generated_markdown_yields_twelve_requirements() {
    let env = TestEnv::with_fixtures();
    assert_eq!(generate(&env), 12);

    let index = index_for(SSP);
    let ssp = AuthoredSsp::new(WorkspaceModelStore::new(env.root.path()), &index);
    assert!(ssp.assemble(Path::new(MARKDOWN)).unwrap());

    let model = load_ssp(&env);
    let reqs = &model.control_implementation.implemented_requirements;
    assert_eq!(reqs.len(), 12);
    assert_eq!(
        model.import_profile.href,
        "profiles/simplified_nist_profile/profile.json"
    );

    let titles: Vec<&str> = model
        .system_implementation
        .components
        .iter()
        .map(|c| c.title.as_str())
        .collect();
    assert_eq!(titles, vec!["This System", "test_comp"]);

    let ac1 = reqs.iter().find(|r| r.control_id == "ac-1").unwrap();
    assert_eq!(ac1.by_components.len(), 2);
    assert_eq!(
        ac1.by_components[1].description,
        "The test component documents its access control policy."
    );
    let cm3 = reqs.iter().find(|r| r.control_id == "cm-3").unwrap();
    assert_eq!(cm3.by_components.len(), 1);
}

#[test]
fn generated_markdown_substitutes_profile_parameters() {
    let env = TestEnv::with_fixtures();
    generate(&env);

    let ac1 = env.read("md_ssp/test-ssp/ac/ac-1.md");
    assert!(ac1.contains("disseminate to all staff an access control policy"), "{ac1}");
    assert!(ac1.contains("### This System"));
    assert!(ac1.contains("### test_comp"));
    assert!(env.path("md_ssp/test-ssp/cm/cm-3.md").is_file());
    assert!(!env.path("md_ssp/test-ssp/ac/ac-6.md").exists());
}

#[test]
fn missing_index_entry_blocks_assemble_and_regenerate() {
    let env = TestEnv::with_fixtures();
    generate(&env);
    let before = env.files_under("md_ssp");

    let index = index_for("fake");
    let ssp = AuthoredSsp::new(WorkspaceModelStore::new(env.root.path()), &index);

    let err = ssp.assemble(Path::new(MARKDOWN)).unwrap_err();
    assert_eq!(err.to_string(), "SSP test-ssp does not exists in the index");
    assert!(env.files_under("system-security-plans").is_empty());

    let err = ssp
        .regenerate(Path::new(MODEL), Path::new("md_regen/test-ssp"))
        .unwrap_err();
    assert!(matches!(err, ComplySyncError::NotInIndex { .. }));
    assert!(!env.path("md_regen").exists());
    assert_eq!(env.files_under("md_ssp"), before);
}

#[test]
fn assemble_then_regenerate_preserves_requirements() {
    let env = TestEnv::with_fixtures();
    generate(&env);
    env.write(
        "md_ssp/test-ssp/au/au-1.md",
        &env.read("md_ssp/test-ssp/au/au-1.md").replace(
            "<!-- Add prose for This System -->",
            "Audit policy is reviewed yearly.",
        ),
    );

    let index = index_for(SSP);
    let ssp = AuthoredSsp::new(WorkspaceModelStore::new(env.root.path()), &index);
    ssp.assemble(Path::new(MARKDOWN)).unwrap();
    let first = load_ssp(&env);

    let written = ssp
        .regenerate(Path::new(MODEL), Path::new(MARKDOWN))
        .unwrap();
    assert_eq!(written, 12);

    assert!(!ssp.assemble(Path::new(MARKDOWN)).unwrap(), "model should be unchanged");
    let second = load_ssp(&env);
    assert_eq!(first, second);

    let au1 = second
        .control_implementation
        .implemented_requirements
        .iter()
        .find(|r| r.control_id == "au-1")
        .unwrap();
    assert_eq!(au1.by_components[0].description, "Audit policy is reviewed yearly.");
}

#[test]
fn regenerate_without_model_generates_from_index() {
    let env = TestEnv::with_fixtures();
    let index = index_for(SSP);
    let ssp = AuthoredSsp::new(WorkspaceModelStore::new(env.root.path()), &index);

    let written = ssp
        .regenerate(Path::new(MODEL), Path::new(MARKDOWN))
        .unwrap();

    assert_eq!(written, 12);
    assert_eq!(env.files_under(MARKDOWN).len(), 12);
}

#[test]
fn unknown_component_heading_is_rejected() {
    let env = TestEnv::with_fixtures();
    generate(&env);
    env.write(
        "md_ssp/test-ssp/ac/ac-2.md",
        &env.read("md_ssp/test-ssp/ac/ac-2.md").replace("### test_comp", "### other_comp"),
    );

    let index = index_for(SSP);
    let ssp = AuthoredSsp::new(WorkspaceModelStore::new(env.root.path()), &index);
    let err = ssp.assemble(Path::new(MARKDOWN)).unwrap_err();

    assert!(matches!(err, ComplySyncError::InvalidMarkdown { .. }));
    assert!(err.to_string().contains("other_comp"));
}

#[test]
fn index_file_lookups_agree_with_written_entries() {
    let env = TestEnv::empty();
    env.write_index("ssp-index.json", SSP, PROFILE, &["test_comp", "other_comp"]);

    let index = JsonIndexRepository::new()
        .load(&env.path("ssp-index.json"))
        .unwrap();

    assert_eq!(index.get_profile(SSP).unwrap(), PROFILE);
    let components: Vec<&str> = index
        .get_components(SSP)
        .unwrap()
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(components, vec!["other_comp", "test_comp"]);
    assert_eq!(index.get_entry(SSP).unwrap().profile(), PROFILE);

    let missing = IndexLookupError::NotFound {
        name: "fake".to_string(),
    };
    assert_eq!(index.get_entry("fake").unwrap_err(), missing);
    assert_eq!(index.get_profile("fake").unwrap_err(), missing);
    assert_eq!(index.get_components("fake").unwrap_err(), missing);
}
