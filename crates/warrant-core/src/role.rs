//! Tenant roles and effective permission resolution
//!
//! Roles hold a subset of their tenant's enabled codes. A user's effective
//! permissions are the union of the codes of their open roles plus the
//! tenant's default role. Holding the administrator role bypasses the union
//! and yields everything the tenant has enabled.
//!
//! The system roles (`admin`, `default`) are reserved: they cannot be
//! created again, edited, closed or deleted through this service.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

use warrant_types::perm_adapter::{
	ADMIN_ROLE_CODE, CreateRoleData, DEFAULT_ROLE_CODE, ListRoleOptions, PermAdapter, Role,
	RoleStatus, RoleType, UpdateRoleData,
};
use warrant_types::utils::dedup_codes;

use crate::enablement::EnablementService;
use crate::prelude::*;

const SYSTEM_ROLES: [(&str, &str); 2] =
	[(ADMIN_ROLE_CODE, "Administrator"), (DEFAULT_ROLE_CODE, "Default")];

fn is_reserved_code(code: &str) -> bool {
	SYSTEM_ROLES.iter().any(|(reserved, _)| *reserved == code)
}

/// Role creation request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateRole {
	pub code: Box<str>,
	pub name: Box<str>,
	pub description: Option<Box<str>>,
	#[serde(default)]
	pub permissions: Vec<Box<str>>,
}

/// A page of roles
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleList {
	pub page_data: Vec<Role>,
	pub total_count: u32,
}

#[derive(Debug, Clone)]
pub struct RoleService {
	enablement: EnablementService,
	adapter: Arc<dyn PermAdapter>,
}

impl RoleService {
	pub fn new(enablement: EnablementService, adapter: Arc<dyn PermAdapter>) -> Self {
		Self { enablement, adapter }
	}

	/// Create the system roles of a tenant if they are missing
	pub async fn provision_system_roles(&self, tn_id: TnId) -> WrResult<()> {
		for (code, name) in SYSTEM_ROLES {
			if self.adapter.read_role_by_code(tn_id, code).await?.is_some() {
				continue;
			}
			self.adapter
				.create_role(
					tn_id,
					CreateRoleData {
						code,
						name,
						description: None,
						typ: RoleType::System,
						status: RoleStatus::Open,
						permissions: &[],
					},
				)
				.await?;
			info!("Created system role '{}' for tn_id={}", code, tn_id);
		}
		Ok(())
	}

	/// Create a custom role
	///
	/// Reserved codes are refused. Permissions outside the tenant's enabled
	/// set are dropped.
	pub async fn create(&self, tn_id: TnId, data: &CreateRole) -> WrResult<Role> {
		if is_reserved_code(&data.code) {
			warn!(tn_id = %tn_id, code = %data.code, "Refused to create a reserved role");
			return Err(Error::PermissionDenied);
		}
		if data.code.is_empty() || data.name.is_empty() {
			return Err(Error::ValidationError("Role code and name are required".into()));
		}
		if self.adapter.read_role_by_code(tn_id, &data.code).await?.is_some() {
			return Err(Error::Conflict(format!("Role code '{}' already exists", data.code)));
		}

		let permissions = self.keep_enabled(tn_id, &data.permissions).await?;
		let role = self
			.adapter
			.create_role(
				tn_id,
				CreateRoleData {
					code: &data.code,
					name: &data.name,
					description: data.description.as_deref(),
					typ: RoleType::Custom,
					status: RoleStatus::Open,
					permissions: &permissions,
				},
			)
			.await?;
		info!("Created role '{}' ({}) for tn_id={}", role.code, role.id, tn_id);
		Ok(role)
	}

	pub async fn list(&self, tn_id: TnId, opts: &ListRoleOptions<'_>) -> WrResult<RoleList> {
		let page_data = self.adapter.list_roles(tn_id, opts).await?;
		let total_count = self.adapter.count_roles(tn_id, opts).await?;
		Ok(RoleList { page_data, total_count })
	}

	pub async fn read(&self, tn_id: TnId, role_id: &RoleId) -> WrResult<Role> {
		self.adapter.read_role(tn_id, role_id).await
	}

	/// Read a role and refuse if it is a system role
	async fn read_mutable(&self, tn_id: TnId, role_id: &RoleId, op: &str) -> WrResult<Role> {
		let role = self.adapter.read_role(tn_id, role_id).await?;
		if role.is_system() {
			warn!(tn_id = %tn_id, role = %role.code, "Refused to {} a system role", op);
			return Err(Error::PermissionDenied);
		}
		Ok(role)
	}

	/// Edit name, code or description of a custom role
	///
	/// Status and permissions have their own operations and are ignored here.
	pub async fn update(
		&self,
		tn_id: TnId,
		role_id: &RoleId,
		data: &UpdateRoleData,
	) -> WrResult<Role> {
		let role = self.read_mutable(tn_id, role_id, "edit").await?;

		if let Patch::Value(code) = &data.code {
			if is_reserved_code(code) {
				warn!(tn_id = %tn_id, code = %code, "Refused to rename a role to a reserved code");
				return Err(Error::PermissionDenied);
			}
			if *code != role.code && self.adapter.read_role_by_code(tn_id, code).await?.is_some() {
				return Err(Error::Conflict(format!("Role code '{}' already exists", code)));
			}
		}
		if data.code.is_null() || data.name.is_null() {
			return Err(Error::ValidationError("Role code and name cannot be cleared".into()));
		}

		let data = UpdateRoleData {
			code: data.code.clone(),
			name: data.name.clone(),
			description: data.description.clone(),
			..Default::default()
		};
		self.adapter.update_role(tn_id, role_id, &data).await
	}

	/// Open or close a custom role. Closed roles do not contribute permissions.
	pub async fn set_status(
		&self,
		tn_id: TnId,
		role_id: &RoleId,
		status: RoleStatus,
	) -> WrResult<Role> {
		self.read_mutable(tn_id, role_id, "change status of").await?;
		let data = UpdateRoleData { status: Patch::Value(status), ..Default::default() };
		self.adapter.update_role(tn_id, role_id, &data).await
	}

	/// Delete a custom role that no user holds
	pub async fn delete(&self, tn_id: TnId, role_id: &RoleId) -> WrResult<()> {
		let role = self.read_mutable(tn_id, role_id, "delete").await?;
		let holders = self.adapter.count_role_holders(tn_id, role_id).await?;
		if holders > 0 {
			return Err(Error::Conflict(format!(
				"Role '{}' is assigned to {} users",
				role.code, holders
			)));
		}
		self.adapter.delete_role(tn_id, role_id).await?;
		info!("Deleted role '{}' ({}) for tn_id={}", role.code, role_id, tn_id);
		Ok(())
	}

	/// A role's codes with the tenant's pruned catalog
	pub async fn permission_list(&self, tn_id: TnId, role_id: &RoleId) -> WrResult<PermView> {
		let role = self.adapter.read_role(tn_id, role_id).await?;
		let tenant = self.enablement.get_enabled(tn_id).await?;
		Ok(PermView { codes: role.permissions, catalog: tenant.catalog })
	}

	/// Replace a role's permissions, keeping only codes the tenant has enabled
	///
	/// Allowed on system roles too: the default role's permissions are what
	/// every user of the tenant gets.
	pub async fn save_permissions<S: AsRef<str>>(
		&self,
		tn_id: TnId,
		role_id: &RoleId,
		submitted: &[S],
	) -> WrResult<Role> {
		self.adapter.read_role(tn_id, role_id).await?;
		let permissions = self.keep_enabled(tn_id, submitted).await?;
		let data = UpdateRoleData { permissions: Patch::Value(permissions), ..Default::default() };
		self.adapter.update_role(tn_id, role_id, &data).await
	}

	/// Effective permissions of a user holding `assigned` roles
	///
	/// Matches open roles of the tenant that are either assigned or the
	/// system default role. If the assignment contains the administrator
	/// (by reserved code or by the admin role's id) the tenant's whole enabled
	/// set is returned instead of the union.
	pub async fn effective_permissions(
		&self,
		tn_id: TnId,
		assigned: &[RoleId],
	) -> WrResult<PermView> {
		let tenant = self.enablement.get_enabled(tn_id).await?;

		if assigned.iter().any(|id| id.as_str() == ADMIN_ROLE_CODE) {
			debug!("Admin bypass by reserved code for tn_id={}", tn_id);
			return Ok(tenant);
		}

		let opts = ListRoleOptions {
			ids: Some(assigned),
			include_default: true,
			status: Some(RoleStatus::Open),
			..Default::default()
		};
		let roles = self.adapter.list_roles(tn_id, &opts).await?;

		if roles.iter().any(|role| role.is_admin() && assigned.contains(&role.id)) {
			debug!("Admin bypass by role for tn_id={}", tn_id);
			return Ok(tenant);
		}

		let codes = dedup_codes(roles.iter().flat_map(|role| role.permissions.iter()));
		Ok(PermView { codes, catalog: tenant.catalog })
	}

	/// Filter role ids to the ones that exist in the tenant, excluding the
	/// default role (which is never assigned explicitly)
	pub async fn check_roles(&self, tn_id: TnId, ids: &[RoleId]) -> WrResult<Vec<RoleId>> {
		let opts = ListRoleOptions { ids: Some(ids), exclude_default: true, ..Default::default() };
		let roles = self.adapter.list_roles(tn_id, &opts).await?;
		let found: HashSet<&RoleId> = roles.iter().map(|role| &role.id).collect();
		Ok(dedup_ids(ids.iter().filter(|id| found.contains(id))))
	}

	/// Assign roles to a user, dropping unknown ids. Returns the stored ids.
	pub async fn assign_roles(
		&self,
		tn_id: TnId,
		user_id: &str,
		ids: &[RoleId],
	) -> WrResult<Vec<RoleId>> {
		let roles = self.check_roles(tn_id, ids).await?;
		self.adapter.update_user_roles(tn_id, user_id, &roles).await?;
		Ok(roles)
	}

	/// Effective permissions of a user by their stored assignment
	pub async fn resolve_user_permissions(&self, tn_id: TnId, user_id: &str) -> WrResult<PermView> {
		let assigned = self.adapter.read_user_roles(tn_id, user_id).await?;
		self.effective_permissions(tn_id, &assigned).await
	}

	async fn keep_enabled<S: AsRef<str>>(
		&self,
		tn_id: TnId,
		submitted: &[S],
	) -> WrResult<Vec<Box<str>>> {
		let enabled = self.enablement.enabled_codes(tn_id).await?;
		let enabled: HashSet<&str> = enabled.iter().map(AsRef::as_ref).collect();
		Ok(dedup_codes(
			submitted.iter().map(AsRef::<str>::as_ref).filter(|code| enabled.contains(code)),
		))
	}
}

fn dedup_ids<'a>(ids: impl Iterator<Item = &'a RoleId>) -> Vec<RoleId> {
	let mut seen = HashSet::new();
	ids.filter(|id| seen.insert(*id)).cloned().collect()
}


// vim: ts=4
