//! Built-in base catalog
//!
//! Covers the settings area managed by this system itself. Applications
//! extend it with overlays.

use crate::node::{PermModule, PermTree};

fn crud(module: PermModule) -> PermModule {
	module
		.with_permission("Create", "create")
		.with_permission("View", "view")
		.with_permission("Edit", "edit")
		.with_permission("Remove", "remove")
}

pub fn base_catalog() -> PermTree {
	PermTree::new(vec![
		PermModule::new("Settings", "setting")
			.with_module(
				PermModule::new("Company information", "company-setting")
					.with_permission("View", "view")
					.with_permission("Edit", "edit"),
			)
			.with_module(crud(PermModule::new("Organization", "org")))
			.with_module(
				PermModule::new("Permissions", "permission")
					.with_module(crud(PermModule::new("Roles", "role")))
					.with_module(crud(PermModule::new("Shared groups", "shared-group"))),
			)
			.with_module(crud(PermModule::new("User management", "user-manager"))),
	])
}


// vim: ts=4
