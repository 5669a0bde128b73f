//! Permission catalog for Warrant.
//!
//! The catalog is a tree of permission modules, each owning child modules and
//! leaf permissions. Every node is identified by its fully-qualified code, the
//! `:`-joined path of local codes from the root (e.g. `setting:org:create`).
//!
//! # Lifecycle
//!
//! - A [`CatalogBuilder`] starts from a base tree and merges optional overlays
//!   (JSON, YAML or TOML documents) into it.
//! - [`CatalogBuilder::build`] freezes the result into an immutable [`Catalog`].
//! - A [`CatalogHandle`] shares the catalog between services and swaps it
//!   atomically on reload.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod builder;
pub mod builtin;
pub mod filter;
pub mod flatten;
pub mod handle;
pub mod merge;
pub mod node;
pub mod source;

pub use builder::{Catalog, CatalogBuilder};
pub use filter::filter;
pub use flatten::{FlatPerm, PermType, flatten, flatten_codes};
pub use handle::CatalogHandle;
pub use merge::merge;
pub use node::{CODE_SEPARATOR, PermLeaf, PermModule, PermNode, PermTree, full_code};
pub use source::{OverlayError, OverlayFormat, OverlaySource};

// vim: ts=4
