//! Adapter that stores per-tenant permission state: enabled codes, roles and
//! role assignments.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::fmt::Debug;

use crate::prelude::*;

/// Reserved code of the administrator system role
pub const ADMIN_ROLE_CODE: &str = "admin";
/// Reserved code of the tenant-wide default system role
pub const DEFAULT_ROLE_CODE: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleType {
	/// Reserved role, not editable through role mutation operations
	System,
	Custom,
}

impl RoleType {
	pub fn as_str(self) -> &'static str {
		match self {
			RoleType::System => "system",
			RoleType::Custom => "custom",
		}
	}

	pub fn parse(s: &str) -> Option<Self> {
		match s {
			"system" => Some(RoleType::System),
			"custom" => Some(RoleType::Custom),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleStatus {
	Open,
	Closed,
}

impl RoleStatus {
	pub fn as_str(self) -> &'static str {
		match self {
			RoleStatus::Open => "open",
			RoleStatus::Closed => "closed",
		}
	}

	pub fn parse(s: &str) -> Option<Self> {
		match s {
			"open" => Some(RoleStatus::Open),
			"closed" => Some(RoleStatus::Closed),
			_ => None,
		}
	}
}

/// A tenant role
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
	pub id: RoleId,
	pub tn_id: TnId,
	pub code: Box<str>,
	pub name: Box<str>,
	pub description: Option<Box<str>>,
	#[serde(rename = "type")]
	pub typ: RoleType,
	pub status: RoleStatus,
	pub permissions: Vec<Box<str>>,
	pub created_at: Timestamp,
}

impl Role {
	pub fn is_system(&self) -> bool {
		self.typ == RoleType::System
	}

	/// The reserved administrator role
	pub fn is_admin(&self) -> bool {
		self.is_system() && self.code.as_ref() == ADMIN_ROLE_CODE
	}

	/// The reserved default role, implicitly held by every user of the tenant
	pub fn is_default(&self) -> bool {
		self.is_system() && self.code.as_ref() == DEFAULT_ROLE_CODE
	}
}

/// Data for creating a role
#[derive(Debug, Clone)]
pub struct CreateRoleData<'a> {
	pub code: &'a str,
	pub name: &'a str,
	pub description: Option<&'a str>,
	pub typ: RoleType,
	pub status: RoleStatus,
	pub permissions: &'a [Box<str>],
}

/// Partial role update. Undefined fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRoleData {
	#[serde(default)]
	pub code: Patch<Box<str>>,
	#[serde(default)]
	pub name: Patch<Box<str>>,
	#[serde(default)]
	pub description: Patch<Box<str>>,
	#[serde(default)]
	pub status: Patch<RoleStatus>,
	#[serde(default)]
	pub permissions: Patch<Vec<Box<str>>>,
}

impl UpdateRoleData {
	/// Apply the defined fields to a role
	///
	/// Clearing `code`, `name` or `status` is ignored since a role always has
	/// them. Clearing `permissions` empties the list.
	pub fn apply(&self, role: &mut Role) {
		if let Patch::Value(code) = &self.code {
			role.code.clone_from(code);
		}
		if let Patch::Value(name) = &self.name {
			role.name.clone_from(name);
		}
		match &self.description {
			Patch::Undefined => {}
			Patch::Null => role.description = None,
			Patch::Value(description) => role.description = Some(description.clone()),
		}
		if let Patch::Value(status) = self.status {
			role.status = status;
		}
		match &self.permissions {
			Patch::Undefined => {}
			Patch::Null => role.permissions.clear(),
			Patch::Value(permissions) => role.permissions.clone_from(permissions),
		}
	}
}

/// Role listing filter
///
/// `ids` and `include_default` are combined with OR: a role matches when its
/// id is listed, or when it is the system default role and `include_default`
/// is set. All other fields are ANDed on top.
#[derive(Debug, Clone, Default)]
pub struct ListRoleOptions<'a> {
	pub ids: Option<&'a [RoleId]>,
	pub include_default: bool,
	pub exclude_default: bool,
	pub status: Option<RoleStatus>,
	pub keyword: Option<&'a str>,
	pub limit: Option<u32>,
	pub offset: Option<u32>,
}

impl ListRoleOptions<'_> {
	/// Evaluate the filter against a role (ignores paging)
	pub fn matches(&self, role: &Role) -> bool {
		let selected = match self.ids {
			Some(ids) => ids.contains(&role.id) || (self.include_default && role.is_default()),
			None => true,
		};
		if !selected {
			return false;
		}
		if self.exclude_default && role.is_default() {
			return false;
		}
		if self.status.is_some_and(|status| status != role.status) {
			return false;
		}
		if let Some(keyword) = self.keyword {
			let keyword = keyword.to_lowercase();
			let hit = role.name.to_lowercase().contains(&keyword)
				|| role.code.to_lowercase().contains(&keyword)
				|| role.description.as_ref().is_some_and(|d| d.to_lowercase().contains(&keyword));
			if !hit {
				return false;
			}
		}
		true
	}
}

#[async_trait]
pub trait PermAdapter: Debug + Send + Sync {
	// Tenant enablement
	//*******************
	/// Read the enabled codes of a tenant. `NotFound` if never initialized.
	async fn read_enabled_perms(&self, tn_id: TnId) -> WrResult<Vec<Box<str>>>;

	/// Create the enabled code set of a tenant. `Conflict` if it already exists.
	async fn create_enabled_perms(&self, tn_id: TnId, codes: &[Box<str>]) -> WrResult<()>;

	/// Replace the enabled code set of a tenant. `NotFound` if never initialized.
	async fn update_enabled_perms(&self, tn_id: TnId, codes: &[Box<str>]) -> WrResult<()>;

	async fn delete_enabled_perms(&self, tn_id: TnId) -> WrResult<()>;

	// Roles
	//*******
	async fn read_role(&self, tn_id: TnId, role_id: &RoleId) -> WrResult<Role>;
	async fn read_role_by_code(&self, tn_id: TnId, code: &str) -> WrResult<Option<Role>>;

	/// List roles, newest first
	async fn list_roles(&self, tn_id: TnId, opts: &ListRoleOptions<'_>) -> WrResult<Vec<Role>>;

	/// Count roles matching the filter (paging is ignored)
	async fn count_roles(&self, tn_id: TnId, opts: &ListRoleOptions<'_>) -> WrResult<u32>;

	/// Create a role. `Conflict` if the code is already used in the tenant.
	async fn create_role(&self, tn_id: TnId, data: CreateRoleData<'_>) -> WrResult<Role>;
	async fn update_role(
		&self,
		tn_id: TnId,
		role_id: &RoleId,
		data: &UpdateRoleData,
	) -> WrResult<Role>;
	async fn delete_role(&self, tn_id: TnId, role_id: &RoleId) -> WrResult<()>;

	// Role assignments
	//******************
	/// Role ids assigned to a user. Empty if the user has no assignment.
	async fn read_user_roles(&self, tn_id: TnId, user_id: &str) -> WrResult<Vec<RoleId>>;
	async fn update_user_roles(&self, tn_id: TnId, user_id: &str, roles: &[RoleId])
	-> WrResult<()>;

	/// Number of users holding a role
	async fn count_role_holders(&self, tn_id: TnId, role_id: &RoleId) -> WrResult<u32>;
}

#[cfg(test)]
mod tests {
	use super::*;

	fn role(id: &str, code: &str, typ: RoleType, status: RoleStatus) -> Role {
		Role {
			id: id.into(),
			tn_id: TnId(1),
			code: code.into(),
			name: code.to_uppercase().into(),
			description: None,
			typ,
			status,
			permissions: Vec::new(),
			created_at: Timestamp(0),
		}
	}

	#[test]
	fn test_list_options_ids_or_default() {
		let ids = [RoleId::from("r1")];
		let opts = ListRoleOptions {
			ids: Some(&ids),
			include_default: true,
			status: Some(RoleStatus::Open),
			..Default::default()
		};

		assert!(opts.matches(&role("r1", "editor", RoleType::Custom, RoleStatus::Open)));
		assert!(opts.matches(&role("r9", DEFAULT_ROLE_CODE, RoleType::System, RoleStatus::Open)));
		assert!(!opts.matches(&role("r1", "editor", RoleType::Custom, RoleStatus::Closed)));
		assert!(!opts.matches(&role("r2", "viewer", RoleType::Custom, RoleStatus::Open)));
		// a custom role that happens to use the code is not the default role
		assert!(!opts.matches(&role("r3", DEFAULT_ROLE_CODE, RoleType::Custom, RoleStatus::Open)));
	}

	#[test]
	fn test_list_options_keyword() {
		let opts = ListRoleOptions { keyword: Some("EDIT"), ..Default::default() };
		assert!(opts.matches(&role("r1", "editor", RoleType::Custom, RoleStatus::Open)));
		assert!(!opts.matches(&role("r2", "viewer", RoleType::Custom, RoleStatus::Open)));
	}

	#[test]
	fn test_update_apply() {
		let mut r = role("r1", "editor", RoleType::Custom, RoleStatus::Open);
		r.description = Some("Edits".into());
		r.permissions = vec!["A:x".into()];

		let update: UpdateRoleData =
			serde_json::from_str(r#"{"name":"Editor","description":null,"status":"closed"}"#)
				.unwrap_or_default();
		update.apply(&mut r);

		assert_eq!(r.name.as_ref(), "Editor");
		assert_eq!(r.code.as_ref(), "editor");
		assert_eq!(r.description, None);
		assert_eq!(r.status, RoleStatus::Closed);
		assert_eq!(r.permissions.len(), 1);
	}

	#[test]
	fn test_role_serialization() {
		let json = serde_json::to_value(role("r1", "admin", RoleType::System, RoleStatus::Open))
			.unwrap_or_default();
		assert_eq!(json["type"], "system");
		assert_eq!(json["status"], "open");
		assert_eq!(json["tnId"], 1);
		assert!(json.get("description").is_none());
	}
}

// vim: ts=4
