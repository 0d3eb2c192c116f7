//! Domain Layer
//!
//! The core of complysync: the index, the OSCAL model subset and the logic
//! that maps between models and control markdown.
//!
//! ## Structure
//!
//! - `entities/` - Index and OSCAL models
//! - `value_objects/` - Model kinds and derived UUIDs
//! - `services/` - Control body codec, profile resolver
//! - `ports/` - Interface definitions for infrastructure

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
