//! Property tests for index lookups.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;

use complysync::domain::ports::IndexRepository;
use complysync::infrastructure::JsonIndexRepository;
use complysync::{Index, IndexEntry, IndexLookupError};

fn name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9_-]{0,12}").unwrap()
}

fn entries() -> impl Strategy<Value = BTreeMap<String, (String, BTreeSet<String>)>> {
    proptest::collection::btree_map(
        name(),
        (name(), proptest::collection::btree_set(name(), 0..4)),
        0..6,
    )
}

fn build(entries: &BTreeMap<String, (String, BTreeSet<String>)>) -> Index {
    let mut index = Index::new();
    for (key, (profile, components)) in entries {
        index.insert(key.clone(), IndexEntry::new(profile.clone(), components.iter().cloned()));
    }
    index
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Lookups of present names return exactly what was written to the file.
    #[test]
    fn property_present_names_round_trip_through_file(entries in entries()) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ssp-index.json");
        let repo = JsonIndexRepository::new();
        repo.save(&build(&entries), &path).unwrap();
        let index = repo.load(&path).unwrap();

        prop_assert_eq!(index.len(), entries.len());
        for (key, (profile, components)) in &entries {
            prop_assert_eq!(index.get_profile(key).unwrap(), profile.as_str());
            prop_assert_eq!(index.get_components(key).unwrap(), components);
            prop_assert_eq!(index.get_entry(key).unwrap().profile(), profile.as_str());
        }
    }

    /// PROPERTY: Every lookup of an absent name fails with NotFound.
    #[test]
    fn property_absent_names_are_not_found(entries in entries(), probe in name()) {
        prop_assume!(!entries.contains_key(&probe));
        let index = build(&entries);
        let expected = IndexLookupError::NotFound { name: probe.clone() };

        prop_assert_eq!(index.get_entry(&probe).unwrap_err(), expected.clone());
        prop_assert_eq!(index.get_profile(&probe).unwrap_err(), expected.clone());
        prop_assert_eq!(index.get_components(&probe).unwrap_err(), expected);
    }
}
