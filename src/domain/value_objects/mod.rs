//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod derived_uuid;
mod model_kind;
mod skip_patterns;

pub use derived_uuid::DerivedUuid;
pub use model_kind::ModelKind;
pub use skip_patterns::{SkipPatternError, SkipPatterns};
