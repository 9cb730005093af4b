//! Shared fixtures for the integration tests.

#![allow(dead_code)]

pub mod model;

pub use model::{MODEL, parse, parse_path};
