//! Domain Services
//!
//! Pure logic over domain entities: the control markdown body codec and
//! profile resolution. Resolution reads models only through the
//! `ModelRepository` port.

mod control_body;
pub mod profile_resolver;

pub use control_body::{ControlBody, Section, Subsection};
pub use profile_resolver::{resolve_href, resolve_profile, ResolvedControl, ResolvedProfile};
