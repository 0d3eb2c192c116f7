//! Common test utilities for complysync integration tests.
//!
//! This module provides:
//! - `TestEnv`: a temporary workspace seeded from `tests/data/workspace`
//! - Helpers to run the `complysync` binary and a scratch git repository

#![allow(dead_code)]

pub mod env;

pub use env::*;
