//! Property tests for frontmatter extraction.

use std::path::Path;

use proptest::prelude::*;

use complysync::parser::{extract_frontmatter, parse_frontmatter};
use complysync::ComplySyncError;

fn small_line() -> impl Strategy<Value = String> {
    // Printable and never exactly a delimiter.
    proptest::string::string_regex("[A-Za-z0-9 _:#\\-]{0,40}")
        .unwrap()
        .prop_filter("not a delimiter", |s| s.trim() != "---")
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Well-formed frontmatter can always be extracted and reconstituted.
    #[test]
    fn property_extract_frontmatter_round_trip(
        yaml_lines in proptest::collection::vec(small_line(), 0..=8),
        body_lines in proptest::collection::vec(small_line(), 0..=12),
    ) {
        let yaml = yaml_lines.join("\n");
        let body = body_lines.join("\n");

        let mut content_lines = vec!["---".to_string()];
        content_lines.extend(yaml_lines.clone());
        content_lines.push("---".to_string());
        content_lines.extend(body_lines.clone());
        let content = content_lines.join("\n");

        let extracted = extract_frontmatter(&content, Path::new("ac-1.md"))
            .expect("expected extract_frontmatter to succeed for constructed content");

        prop_assert_eq!(extracted.yaml, yaml);
        // `str::lines()` drops a trailing empty line, so compare trimmed ends.
        prop_assert_eq!(extracted.body.trim_end(), body.trim_end());
    }

    /// PROPERTY: Content not starting with a delimiter is always rejected.
    #[test]
    fn property_missing_opening_delimiter_is_rejected(
        first in small_line().prop_filter("non-empty", |s| !s.trim().is_empty()),
        rest in proptest::collection::vec(small_line(), 0..=6),
    ) {
        let content = std::iter::once(first).chain(rest).collect::<Vec<_>>().join("\n");
        let result = extract_frontmatter(&content, Path::new("ac-1.md"));
        prop_assert!(
            matches!(result, Err(ComplySyncError::NoFrontmatter { .. })),
            "expected NoFrontmatter for {:?}",
            content
        );
    }

    /// PROPERTY: `parse_frontmatter` never panics on arbitrary small YAML input.
    #[test]
    fn property_parse_frontmatter_never_panics(
        yaml in "(?s).{0,256}"
    ) {
        let _ = parse_frontmatter::<serde_yaml_ng::Value>(&yaml, Path::new("ac-1.md"));
    }

    /// PROPERTY: `extract_frontmatter` never panics on arbitrary small input.
    #[test]
    fn property_extract_frontmatter_never_panics(
        content in "(?s).{0,512}"
    ) {
        let _ = extract_frontmatter(&content, Path::new("ac-1.md"));
    }
}
