//! In-memory permission adapter.
//!
//! Implements [`PermAdapter`] with `HashMap`s behind `parking_lot::RwLock`s.
//! State is lost when the process exits. Locks are never held across an
//! await point, so every operation is a single critical section.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use warrant_types::perm_adapter::{
	CreateRoleData, ListRoleOptions, PermAdapter, Role, UpdateRoleData,
};
use warrant_types::prelude::*;
use warrant_types::utils::random_id;

#[derive(Debug)]
struct RoleEntry {
	/// Insertion order, breaks ties between roles created in the same second
	seq: u64,
	role: Role,
}

#[derive(Debug, Default)]
struct RoleTable {
	next_seq: u64,
	roles: HashMap<(TnId, RoleId), RoleEntry>,
}

#[derive(Debug, Default)]
pub struct MemoryPermAdapter {
	enabled: RwLock<HashMap<TnId, Vec<Box<str>>>>,
	roles: RwLock<RoleTable>,
	user_roles: RwLock<HashMap<(TnId, Box<str>), Vec<RoleId>>>,
}

impl MemoryPermAdapter {
	pub fn new() -> Self {
		Self::default()
	}

	/// Matching roles, newest first, without paging
	fn matching(&self, tn_id: TnId, opts: &ListRoleOptions<'_>) -> Vec<Role> {
		let table = self.roles.read();
		let mut entries: Vec<&RoleEntry> = table
			.roles
			.values()
			.filter(|entry| entry.role.tn_id == tn_id && opts.matches(&entry.role))
			.collect();
		entries.sort_by(|a, b| {
			b.role.created_at.cmp(&a.role.created_at).then_with(|| b.seq.cmp(&a.seq))
		});
		entries.into_iter().map(|entry| entry.role.clone()).collect()
	}
}

#[async_trait]
impl PermAdapter for MemoryPermAdapter {
	async fn read_enabled_perms(&self, tn_id: TnId) -> WrResult<Vec<Box<str>>> {
		self.enabled.read().get(&tn_id).cloned().ok_or(Error::NotFound)
	}

	async fn create_enabled_perms(&self, tn_id: TnId, codes: &[Box<str>]) -> WrResult<()> {
		let mut enabled = self.enabled.write();
		if enabled.contains_key(&tn_id) {
			return Err(Error::Conflict(format!("Enabled permissions exist for tenant {}", tn_id)));
		}
		enabled.insert(tn_id, codes.to_vec());
		Ok(())
	}

	async fn update_enabled_perms(&self, tn_id: TnId, codes: &[Box<str>]) -> WrResult<()> {
		let mut enabled = self.enabled.write();
		let entry = enabled.get_mut(&tn_id).ok_or(Error::NotFound)?;
		*entry = codes.to_vec();
		Ok(())
	}

	async fn delete_enabled_perms(&self, tn_id: TnId) -> WrResult<()> {
		self.enabled.write().remove(&tn_id);
		Ok(())
	}

	async fn read_role(&self, tn_id: TnId, role_id: &RoleId) -> WrResult<Role> {
		self.roles
			.read()
			.roles
			.get(&(tn_id, role_id.clone()))
			.map(|entry| entry.role.clone())
			.ok_or(Error::NotFound)
	}

	async fn read_role_by_code(&self, tn_id: TnId, code: &str) -> WrResult<Option<Role>> {
		Ok(self
			.roles
			.read()
			.roles
			.values()
			.find(|entry| entry.role.tn_id == tn_id && entry.role.code.as_ref() == code)
			.map(|entry| entry.role.clone()))
	}

	async fn list_roles(&self, tn_id: TnId, opts: &ListRoleOptions<'_>) -> WrResult<Vec<Role>> {
		let offset = opts.offset.unwrap_or(0) as usize;
		let limit = opts.limit.map_or(usize::MAX, |limit| limit as usize);
		Ok(self.matching(tn_id, opts).into_iter().skip(offset).take(limit).collect())
	}

	async fn count_roles(&self, tn_id: TnId, opts: &ListRoleOptions<'_>) -> WrResult<u32> {
		let count = self.matching(tn_id, opts).len();
		u32::try_from(count).map_err(|_| Error::Internal("Role count overflow".into()))
	}

	async fn create_role(&self, tn_id: TnId, data: CreateRoleData<'_>) -> WrResult<Role> {
		let mut table = self.roles.write();
		let taken = table
			.roles
			.values()
			.any(|entry| entry.role.tn_id == tn_id && entry.role.code.as_ref() == data.code);
		if taken {
			return Err(Error::Conflict(format!("Role code '{}' already exists", data.code)));
		}

		let role = Role {
			id: RoleId::from(random_id()),
			tn_id,
			code: data.code.into(),
			name: data.name.into(),
			description: data.description.map(Into::into),
			typ: data.typ,
			status: data.status,
			permissions: data.permissions.to_vec(),
			created_at: Timestamp::now(),
		};
		let seq = table.next_seq;
		table.next_seq += 1;
		table.roles.insert((tn_id, role.id.clone()), RoleEntry { seq, role: role.clone() });
		debug!("Created role {} ({}) in memory", role.id, role.code);
		Ok(role)
	}

	async fn update_role(
		&self,
		tn_id: TnId,
		role_id: &RoleId,
		data: &UpdateRoleData,
	) -> WrResult<Role> {
		let mut table = self.roles.write();
		if let Patch::Value(code) = &data.code {
			let taken = table.roles.values().any(|entry| {
				entry.role.tn_id == tn_id && entry.role.id != *role_id && entry.role.code == *code
			});
			if taken {
				return Err(Error::Conflict(format!("Role code '{}' already exists", code)));
			}
		}

		let entry = table.roles.get_mut(&(tn_id, role_id.clone())).ok_or(Error::NotFound)?;
		data.apply(&mut entry.role);
		Ok(entry.role.clone())
	}

	async fn delete_role(&self, tn_id: TnId, role_id: &RoleId) -> WrResult<()> {
		self.roles.write().roles.remove(&(tn_id, role_id.clone())).ok_or(Error::NotFound)?;
		let mut user_roles = self.user_roles.write();
		for ((tn, _), roles) in user_roles.iter_mut() {
			if *tn == tn_id {
				roles.retain(|id| id != role_id);
			}
		}
		user_roles.retain(|_, roles| !roles.is_empty());
		Ok(())
	}

	async fn read_user_roles(&self, tn_id: TnId, user_id: &str) -> WrResult<Vec<RoleId>> {
		let key: (TnId, Box<str>) = (tn_id, user_id.into());
		Ok(self.user_roles.read().get(&key).cloned().unwrap_or_default())
	}

	async fn update_user_roles(
		&self,
		tn_id: TnId,
		user_id: &str,
		roles: &[RoleId],
	) -> WrResult<()> {
		let key: (TnId, Box<str>) = (tn_id, user_id.into());
		let mut user_roles = self.user_roles.write();
		if roles.is_empty() {
			user_roles.remove(&key);
		} else {
			user_roles.insert(key, roles.to_vec());
		}
		Ok(())
	}

	async fn count_role_holders(&self, tn_id: TnId, role_id: &RoleId) -> WrResult<u32> {
		let count = self
			.user_roles
			.read()
			.iter()
			.filter(|((tn, _), roles)| *tn == tn_id && roles.contains(role_id))
			.count();
		u32::try_from(count).map_err(|_| Error::Internal("Holder count overflow".into()))
	}
}


// vim: ts=4
