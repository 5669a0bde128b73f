//! Tenant roles

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use warrant_types::perm_adapter::{
	CreateRoleData, DEFAULT_ROLE_CODE, ListRoleOptions, Role, RoleStatus, RoleType,
	UpdateRoleData,
};
use warrant_types::prelude::*;
use warrant_types::utils::random_id;

use crate::{codes_json, map_err, parse_codes};

const ROLE_COLUMNS: &str =
	"role_id, code, name, description, type, status, permissions, created_at";

fn role_from_row(tn_id: TnId, row: &SqliteRow) -> WrResult<Role> {
	let typ: &str = row.try_get("type").map_err(map_err)?;
	let status: &str = row.try_get("status").map_err(map_err)?;
	let permissions: &str = row.try_get("permissions").map_err(map_err)?;
	let id: String = row.try_get("role_id").map_err(map_err)?;

	Ok(Role {
		id: RoleId::from(id),
		tn_id,
		code: row.try_get("code").map_err(map_err)?,
		name: row.try_get("name").map_err(map_err)?,
		description: row.try_get("description").map_err(map_err)?,
		typ: RoleType::parse(typ).ok_or_else(|| {
			warn!("DB: invalid role type: {}", typ);
			Error::DbError
		})?,
		status: RoleStatus::parse(status).ok_or_else(|| {
			warn!("DB: invalid role status: {}", status);
			Error::DbError
		})?,
		permissions: parse_codes(permissions)?,
		created_at: Timestamp(row.try_get("created_at").map_err(map_err)?),
	})
}

/// Append the filter conditions of `opts` (paging excluded)
fn push_filter(query: &mut QueryBuilder<'_, Sqlite>, opts: &ListRoleOptions<'_>) {
	if let Some(ids) = opts.ids {
		query.push(" AND (role_id IN (");
		if ids.is_empty() {
			query.push("NULL");
		} else {
			let mut list = query.separated(", ");
			for id in ids {
				list.push_bind(id.as_str().to_string());
			}
		}
		query.push(")");
		if opts.include_default {
			query.push(" OR (type = 'system' AND code = ");
			query.push_bind(DEFAULT_ROLE_CODE);
			query.push(")");
		}
		query.push(")");
	}

	if opts.exclude_default {
		query.push(" AND NOT (type = 'system' AND code = ");
		query.push_bind(DEFAULT_ROLE_CODE);
		query.push(")");
	}

	if let Some(status) = opts.status {
		query.push(" AND status = ");
		query.push_bind(status.as_str());
	}

	if let Some(keyword) = opts.keyword {
		let pattern = format!("%{}%", keyword);
		query.push(" AND (name LIKE ");
		query.push_bind(pattern.clone());
		query.push(" OR code LIKE ");
		query.push_bind(pattern.clone());
		query.push(" OR description LIKE ");
		query.push_bind(pattern);
		query.push(")");
	}
}

pub(crate) async fn read(db: &SqlitePool, tn_id: TnId, role_id: &RoleId) -> WrResult<Role> {
	let row = sqlx::query(&format!(
		"SELECT {} FROM roles WHERE tn_id = ? AND role_id = ?",
		ROLE_COLUMNS
	))
	.bind(tn_id.0)
	.bind(role_id.as_str())
	.fetch_one(db)
	.await
	.map_err(map_err)?;

	role_from_row(tn_id, &row)
}

pub(crate) async fn read_by_code(
	db: &SqlitePool,
	tn_id: TnId,
	code: &str,
) -> WrResult<Option<Role>> {
	let row =
		sqlx::query(&format!("SELECT {} FROM roles WHERE tn_id = ? AND code = ?", ROLE_COLUMNS))
			.bind(tn_id.0)
			.bind(code)
			.fetch_optional(db)
			.await
			.map_err(map_err)?;

	row.map(|row| role_from_row(tn_id, &row)).transpose()
}

/// List roles, newest first
pub(crate) async fn list(
	db: &SqlitePool,
	tn_id: TnId,
	opts: &ListRoleOptions<'_>,
) -> WrResult<Vec<Role>> {
	let mut query = QueryBuilder::new(format!("SELECT {} FROM roles WHERE tn_id = ", ROLE_COLUMNS));
	query.push_bind(tn_id.0);
	push_filter(&mut query, opts);
	query.push(" ORDER BY created_at DESC, rowid DESC");

	if opts.limit.is_some() || opts.offset.is_some() {
		query.push(" LIMIT ");
		query.push_bind(opts.limit.map_or(-1, i64::from));
		query.push(" OFFSET ");
		query.push_bind(i64::from(opts.offset.unwrap_or(0)));
	}

	let rows = query.build().fetch_all(db).await.map_err(map_err)?;
	rows.iter().map(|row| role_from_row(tn_id, row)).collect()
}

pub(crate) async fn count(
	db: &SqlitePool,
	tn_id: TnId,
	opts: &ListRoleOptions<'_>,
) -> WrResult<u32> {
	let mut query = QueryBuilder::new("SELECT count(*) AS cnt FROM roles WHERE tn_id = ");
	query.push_bind(tn_id.0);
	push_filter(&mut query, opts);

	let row = query.build().fetch_one(db).await.map_err(map_err)?;
	let count: i64 = row.try_get("cnt").map_err(map_err)?;
	u32::try_from(count).map_err(|_| Error::Internal("Role count overflow".into()))
}

/// Create a role. A duplicate code is reported as `Conflict`.
pub(crate) async fn create(
	db: &SqlitePool,
	tn_id: TnId,
	data: &CreateRoleData<'_>,
) -> WrResult<Role> {
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

	sqlx::query(
		"INSERT INTO roles (tn_id, role_id, code, name, description, type, status, permissions, created_at)
		VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
	)
	.bind(tn_id.0)
	.bind(role.id.as_str())
	.bind(data.code)
	.bind(data.name)
	.bind(data.description)
	.bind(data.typ.as_str())
	.bind(data.status.as_str())
	.bind(codes_json(data.permissions)?)
	.bind(role.created_at.0)
	.execute(db)
	.await
	.map_err(map_err)?;

	Ok(role)
}

/// Apply a partial update inside a transaction
pub(crate) async fn update(
	db: &SqlitePool,
	tn_id: TnId,
	role_id: &RoleId,
	data: &UpdateRoleData,
) -> WrResult<Role> {
	let mut tx = db.begin().await.map_err(map_err)?;

	let row = sqlx::query(&format!(
		"SELECT {} FROM roles WHERE tn_id = ? AND role_id = ?",
		ROLE_COLUMNS
	))
	.bind(tn_id.0)
	.bind(role_id.as_str())
	.fetch_one(&mut *tx)
	.await
	.map_err(map_err)?;

	let mut role = role_from_row(tn_id, &row)?;
	data.apply(&mut role);

	sqlx::query(
		"UPDATE roles SET code = ?, name = ?, description = ?, status = ?, permissions = ?
		WHERE tn_id = ? AND role_id = ?",
	)
	.bind(role.code.as_ref())
	.bind(role.name.as_ref())
	.bind(role.description.as_deref())
	.bind(role.status.as_str())
	.bind(codes_json(&role.permissions)?)
	.bind(tn_id.0)
	.bind(role_id.as_str())
	.execute(&mut *tx)
	.await
	.map_err(map_err)?;

	tx.commit().await.map_err(map_err)?;

	Ok(role)
}

/// Delete a role together with its assignments
pub(crate) async fn delete(db: &SqlitePool, tn_id: TnId, role_id: &RoleId) -> WrResult<()> {
	let mut tx = db.begin().await.map_err(map_err)?;

	let res = sqlx::query("DELETE FROM roles WHERE tn_id = ? AND role_id = ?")
		.bind(tn_id.0)
		.bind(role_id.as_str())
		.execute(&mut *tx)
		.await
		.map_err(map_err)?;
	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}

	sqlx::query("DELETE FROM user_roles WHERE tn_id = ? AND role_id = ?")
		.bind(tn_id.0)
		.bind(role_id.as_str())
		.execute(&mut *tx)
		.await
		.map_err(map_err)?;

	tx.commit().await.map_err(map_err)?;

	Ok(())
}

// vim: ts=4
