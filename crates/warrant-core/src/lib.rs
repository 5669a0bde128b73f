//! Tenant permission services for Warrant.
//!
//! - [`enablement::EnablementService`] keeps the per-tenant subset of the
//!   catalog that is turned on.
//! - [`role::RoleService`] manages tenant roles and resolves a user's
//!   effective permissions from the roles assigned to them.
//! - [`app::AppBuilder`] wires the catalog, the services and a
//!   [`warrant_types::perm_adapter::PermAdapter`] into an [`app::App`].

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod app;
pub mod enablement;
pub mod role;
pub mod view;

mod prelude;

pub use app::{App, AppBuilder, AppOpts, AppState};
pub use enablement::EnablementService;
pub use role::{CreateRole, RoleList, RoleService};
pub use view::PermView;

// vim: ts=4
