//! Shared types, adapter traits, and core utilities for Warrant.
//!
//! This crate holds the types shared between the catalog, the core services
//! and all adapter implementations, so adapter crates do not depend on the
//! service layer.

pub mod error;
pub mod perm_adapter;
pub mod prelude;
pub mod types;
pub mod utils;

// vim: ts=4
