//! Role assignments of users

use sqlx::{Row, SqlitePool};

use warrant_types::prelude::*;

use crate::map_err;

/// Assigned role ids in assignment order
pub(crate) async fn read(db: &SqlitePool, tn_id: TnId, user_id: &str) -> WrResult<Vec<RoleId>> {
	let rows = sqlx::query(
		"SELECT role_id FROM user_roles WHERE tn_id = ? AND user_id = ? ORDER BY ord",
	)
	.bind(tn_id.0)
	.bind(user_id)
	.fetch_all(db)
	.await
	.map_err(map_err)?;

	rows.iter()
		.map(|row| row.try_get::<String, _>("role_id").map(RoleId::from).map_err(map_err))
		.collect()
}

/// Replace the assignment of a user
pub(crate) async fn update(
	db: &SqlitePool,
	tn_id: TnId,
	user_id: &str,
	roles: &[RoleId],
) -> WrResult<()> {
	let mut tx = db.begin().await.map_err(map_err)?;

	sqlx::query("DELETE FROM user_roles WHERE tn_id = ? AND user_id = ?")
		.bind(tn_id.0)
		.bind(user_id)
		.execute(&mut *tx)
		.await
		.map_err(map_err)?;

	for (ord, role_id) in roles.iter().enumerate() {
		let ord = i64::try_from(ord).map_err(|_| Error::Internal("Too many roles".into()))?;
		sqlx::query(
			"INSERT OR IGNORE INTO user_roles (tn_id, user_id, role_id, ord) VALUES (?, ?, ?, ?)",
		)
		.bind(tn_id.0)
		.bind(user_id)
		.bind(role_id.as_str())
		.bind(ord)
		.execute(&mut *tx)
		.await
		.map_err(map_err)?;
	}

	tx.commit().await.map_err(map_err)?;

	Ok(())
}

pub(crate) async fn count_holders(db: &SqlitePool, tn_id: TnId, role_id: &RoleId) -> WrResult<u32> {
	let row = sqlx::query(
		"SELECT count(DISTINCT user_id) AS cnt FROM user_roles WHERE tn_id = ? AND role_id = ?",
	)
	.bind(tn_id.0)
	.bind(role_id.as_str())
	.fetch_one(db)
	.await
	.map_err(map_err)?;

	let count: i64 = row.try_get("cnt").map_err(map_err)?;
	u32::try_from(count).map_err(|_| Error::Internal("Holder count overflow".into()))
}

// vim: ts=4
