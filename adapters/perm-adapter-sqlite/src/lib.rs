//! SQLite implementation of the Warrant permission adapter.
//!
//! Codes and role permissions are stored as JSON arrays. Role ids are
//! random strings generated on creation.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

mod enablement;
mod role;
mod schema;
mod user_role;

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};
use std::path::Path;

use warrant_types::perm_adapter::{
	CreateRoleData, ListRoleOptions, PermAdapter, Role, UpdateRoleData,
};
use warrant_types::prelude::*;

use crate::schema::init_db;

// Helper functions
//******************
pub(crate) fn inspect(err: &sqlx::Error) {
	warn!("DB: {:#?}", err);
}

/// Map a driver error: missing rows become `NotFound`, unique violations
/// `Conflict`, everything else is logged and becomes `DbError`
pub(crate) fn map_err(err: sqlx::Error) -> Error {
	match err {
		sqlx::Error::RowNotFound => Error::NotFound,
		sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
			debug!("DB: unique violation: {}", db_err);
			Error::Conflict(db_err.message().to_string())
		}
		err => {
			inspect(&err);
			Error::DbError
		}
	}
}

pub(crate) fn parse_codes(json: &str) -> WrResult<Vec<Box<str>>> {
	serde_json::from_str(json)
		.inspect_err(|err| warn!("DB: invalid code list: {}", err))
		.map_err(|_| Error::DbError)
}

pub(crate) fn codes_json(codes: &[Box<str>]) -> WrResult<String> {
	serde_json::to_string(codes).map_err(|_| Error::DbError)
}

#[derive(Debug)]
pub struct PermAdapterSqlite {
	db: SqlitePool,
}

impl PermAdapterSqlite {
	pub async fn new(path: impl AsRef<Path>) -> WrResult<Self> {
		if let Some(parent) = path.as_ref().parent() {
			if !parent.as_os_str().is_empty() {
				tokio::fs::create_dir_all(parent).await?;
			}
		}

		let opts = sqlite::SqliteConnectOptions::new()
			.filename(path.as_ref())
			.create_if_missing(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(inspect)
			.or(Err(Error::DbError))?;

		init_db(&db).await.inspect_err(inspect).or(Err(Error::DbError))?;

		Ok(Self { db })
	}
}

#[async_trait]
impl PermAdapter for PermAdapterSqlite {
	// Tenant enablement
	//*******************
	async fn read_enabled_perms(&self, tn_id: TnId) -> WrResult<Vec<Box<str>>> {
		enablement::read(&self.db, tn_id).await
	}

	async fn create_enabled_perms(&self, tn_id: TnId, codes: &[Box<str>]) -> WrResult<()> {
		enablement::create(&self.db, tn_id, codes).await
	}

	async fn update_enabled_perms(&self, tn_id: TnId, codes: &[Box<str>]) -> WrResult<()> {
		enablement::update(&self.db, tn_id, codes).await
	}

	async fn delete_enabled_perms(&self, tn_id: TnId) -> WrResult<()> {
		enablement::delete(&self.db, tn_id).await
	}

	// Roles
	//*******
	async fn read_role(&self, tn_id: TnId, role_id: &RoleId) -> WrResult<Role> {
		role::read(&self.db, tn_id, role_id).await
	}

	async fn read_role_by_code(&self, tn_id: TnId, code: &str) -> WrResult<Option<Role>> {
		role::read_by_code(&self.db, tn_id, code).await
	}

	async fn list_roles(&self, tn_id: TnId, opts: &ListRoleOptions<'_>) -> WrResult<Vec<Role>> {
		role::list(&self.db, tn_id, opts).await
	}

	async fn count_roles(&self, tn_id: TnId, opts: &ListRoleOptions<'_>) -> WrResult<u32> {
		role::count(&self.db, tn_id, opts).await
	}

	async fn create_role(&self, tn_id: TnId, data: CreateRoleData<'_>) -> WrResult<Role> {
		role::create(&self.db, tn_id, &data).await
	}

	async fn update_role(
		&self,
		tn_id: TnId,
		role_id: &RoleId,
		data: &UpdateRoleData,
	) -> WrResult<Role> {
		role::update(&self.db, tn_id, role_id, data).await
	}

	async fn delete_role(&self, tn_id: TnId, role_id: &RoleId) -> WrResult<()> {
		role::delete(&self.db, tn_id, role_id).await
	}

	// Role assignments
	//******************
	async fn read_user_roles(&self, tn_id: TnId, user_id: &str) -> WrResult<Vec<RoleId>> {
		user_role::read(&self.db, tn_id, user_id).await
	}

	async fn update_user_roles(
		&self,
		tn_id: TnId,
		user_id: &str,
		roles: &[RoleId],
	) -> WrResult<()> {
		user_role::update(&self.db, tn_id, user_id, roles).await
	}

	async fn count_role_holders(&self, tn_id: TnId, role_id: &RoleId) -> WrResult<u32> {
		user_role::count_holders(&self.db, tn_id, role_id).await
	}
}

// vim: ts=4
