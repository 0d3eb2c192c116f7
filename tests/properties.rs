//! Property tests for complysync.
//!
//! Properties use randomized input generation to explore edge cases and
//! protect invariants like "never panics" and "lookups agree".
//!
//! Run with: `cargo test --test properties`

#[path = "properties/frontmatter.rs"]
mod frontmatter;

#[path = "properties/index_lookup.rs"]
mod index_lookup;
