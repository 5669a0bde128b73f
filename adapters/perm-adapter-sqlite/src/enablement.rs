//! Tenant enabled permission codes

use sqlx::{Row, SqlitePool};

use warrant_types::prelude::*;

use crate::{codes_json, map_err, parse_codes};

pub(crate) async fn read(db: &SqlitePool, tn_id: TnId) -> WrResult<Vec<Box<str>>> {
	let row = sqlx::query("SELECT codes FROM enabled_perms WHERE tn_id = ?")
		.bind(tn_id.0)
		.fetch_one(db)
		.await
		.map_err(map_err)?;

	let codes: &str = row.try_get("codes").map_err(map_err)?;
	parse_codes(codes)
}

pub(crate) async fn create(db: &SqlitePool, tn_id: TnId, codes: &[Box<str>]) -> WrResult<()> {
	sqlx::query("INSERT INTO enabled_perms (tn_id, codes) VALUES (?, ?)")
		.bind(tn_id.0)
		.bind(codes_json(codes)?)
		.execute(db)
		.await
		.map_err(map_err)?;

	Ok(())
}

pub(crate) async fn update(db: &SqlitePool, tn_id: TnId, codes: &[Box<str>]) -> WrResult<()> {
	let res = sqlx::query(
		"UPDATE enabled_perms SET codes = ?, updated_at = unixepoch() WHERE tn_id = ?",
	)
	.bind(codes_json(codes)?)
	.bind(tn_id.0)
	.execute(db)
	.await
	.map_err(map_err)?;

	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}
	Ok(())
}

pub(crate) async fn delete(db: &SqlitePool, tn_id: TnId) -> WrResult<()> {
	sqlx::query("DELETE FROM enabled_perms WHERE tn_id = ?")
		.bind(tn_id.0)
		.execute(db)
		.await
		.map_err(map_err)?;

	Ok(())
}

// vim: ts=4
