//! Domain Entities
//!
//! - `Index` - authored object name -> governing profile and components
//! - `oscal` - the OSCAL object model subset handled by the workflows

mod index;
pub mod oscal;

pub use index::{Index, IndexEntry, IndexLookupError};
