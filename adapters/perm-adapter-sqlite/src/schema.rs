//! Database schema initialization

use sqlx::SqlitePool;

/// Create tables and indexes if they do not exist yet
pub(crate) async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	// Tenant enablement
	//*******************
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS enabled_perms (
		tn_id integer NOT NULL,
		codes json NOT NULL,
		updated_at datetime DEFAULT (unixepoch()),
		PRIMARY KEY(tn_id)
	)",
	)
	.execute(&mut *tx)
	.await?;

	// Roles
	//*******
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS roles (
		tn_id integer NOT NULL,
		role_id text NOT NULL,
		code text NOT NULL,
		name text NOT NULL,
		description text,
		type text NOT NULL,
		status text NOT NULL,
		permissions json NOT NULL,
		created_at datetime DEFAULT (unixepoch()),
		PRIMARY KEY(tn_id, role_id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS idx_roles_code ON roles(tn_id, code)")
		.execute(&mut *tx)
		.await?;

	// Role assignments
	//******************
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS user_roles (
		tn_id integer NOT NULL,
		user_id text NOT NULL,
		role_id text NOT NULL,
		ord integer NOT NULL,
		PRIMARY KEY(tn_id, user_id, role_id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"CREATE INDEX IF NOT EXISTS idx_user_roles_role ON user_roles(tn_id, role_id)",
	)
	.execute(&mut *tx)
	.await?;

	tx.commit().await?;

	Ok(())
}

// vim: ts=4
