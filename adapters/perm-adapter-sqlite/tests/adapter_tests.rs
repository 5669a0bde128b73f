//! SQLite permission adapter tests
//!
//! Enablement, role CRUD with filters and paging, and role assignments

use tempfile::TempDir;
use warrant_perm_adapter_sqlite::PermAdapterSqlite;
use warrant_types::error::Error;
use warrant_types::perm_adapter::{
	CreateRoleData, DEFAULT_ROLE_CODE, ListRoleOptions, PermAdapter, RoleStatus, RoleType,
	UpdateRoleData,
};
use warrant_types::types::{Patch, RoleId, TnId};

async fn create_test_adapter() -> (PermAdapterSqlite, TempDir) {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
	let temp_dir = TempDir::new().expect("Failed to create temp directory");

	let adapter = PermAdapterSqlite::new(temp_dir.path().join("perm.db"))
		.await
		.expect("Failed to create adapter");

	(adapter, temp_dir)
}

fn role_data<'a>(code: &'a str, typ: RoleType, permissions: &'a [Box<str>]) -> CreateRoleData<'a> {
	CreateRoleData {
		code,
		name: code,
		description: None,
		typ,
		status: RoleStatus::Open,
		permissions,
	}
}

fn codes(codes: &[&str]) -> Vec<Box<str>> {
	codes.iter().map(|&code| code.into()).collect()
}

#[tokio::test]
async fn test_enabled_perms() {
	let (adapter, _temp) = create_test_adapter().await;
	let tn_id = TnId(1);

	assert!(matches!(adapter.read_enabled_perms(tn_id).await, Err(Error::NotFound)));
	assert!(matches!(
		adapter.update_enabled_perms(tn_id, &codes(&["A"])).await,
		Err(Error::NotFound)
	));

	adapter
		.create_enabled_perms(tn_id, &codes(&["A", "A:x", "A:y"]))
		.await
		.expect("Should create enablement");
	assert!(matches!(
		adapter.create_enabled_perms(tn_id, &codes(&["A"])).await,
		Err(Error::Conflict(_))
	));

	adapter.update_enabled_perms(tn_id, &codes(&["A:y", "A"])).await.expect("Should update");
	let stored = adapter.read_enabled_perms(tn_id).await.expect("Should read");
	assert_eq!(stored, codes(&["A:y", "A"]));

	// other tenants are unaffected
	assert!(matches!(adapter.read_enabled_perms(TnId(2)).await, Err(Error::NotFound)));

	adapter.delete_enabled_perms(tn_id).await.expect("Should delete");
	assert!(matches!(adapter.read_enabled_perms(tn_id).await, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_create_and_read_role() {
	let (adapter, _temp) = create_test_adapter().await;
	let tn_id = TnId(1);
	let perms = codes(&["A:x", "B:y"]);

	let mut data = role_data("editor", RoleType::Custom, &perms);
	data.description = Some("Can edit");
	let created = adapter.create_role(tn_id, data).await.expect("Should create role");

	let role = adapter.read_role(tn_id, &created.id).await.expect("Should read role");
	assert_eq!(role, created);
	assert_eq!(role.permissions, perms);
	assert_eq!(role.description.as_deref(), Some("Can edit"));

	let by_code = adapter.read_role_by_code(tn_id, "editor").await.expect("Should query");
	assert_eq!(by_code.map(|role| role.id), Some(created.id.clone()));
	assert!(adapter.read_role_by_code(tn_id, "missing").await.expect("Should query").is_none());

	assert!(matches!(adapter.read_role(TnId(2), &created.id).await, Err(Error::NotFound)));
	assert!(matches!(
		adapter.create_role(tn_id, role_data("editor", RoleType::Custom, &[])).await,
		Err(Error::Conflict(_))
	));
}

#[tokio::test]
async fn test_list_roles_filters() {
	let (adapter, _temp) = create_test_adapter().await;
	let tn_id = TnId(1);

	let default = adapter
		.create_role(tn_id, role_data(DEFAULT_ROLE_CODE, RoleType::System, &[]))
		.await
		.expect("Should create default role");
	let editor = adapter
		.create_role(tn_id, role_data("editor", RoleType::Custom, &[]))
		.await
		.expect("Should create role");
	let viewer = adapter
		.create_role(tn_id, role_data("viewer", RoleType::Custom, &[]))
		.await
		.expect("Should create role");
	adapter
		.update_role(
			tn_id,
			&viewer.id,
			&UpdateRoleData { status: Patch::Value(RoleStatus::Closed), ..Default::default() },
		)
		.await
		.expect("Should close role");

	// newest first
	let all = adapter.list_roles(tn_id, &ListRoleOptions::default()).await.expect("Should list");
	let ids: Vec<&RoleId> = all.iter().map(|role| &role.id).collect();
	assert_eq!(ids, [&viewer.id, &editor.id, &default.id]);

	// assigned ids OR the default role, open only
	let assigned = [editor.id.clone(), viewer.id.clone()];
	let opts = ListRoleOptions {
		ids: Some(&assigned),
		include_default: true,
		status: Some(RoleStatus::Open),
		..Default::default()
	};
	let roles = adapter.list_roles(tn_id, &opts).await.expect("Should list");
	let ids: Vec<&RoleId> = roles.iter().map(|role| &role.id).collect();
	assert_eq!(ids, [&editor.id, &default.id]);

	// empty id list still yields the default role
	let opts = ListRoleOptions { ids: Some(&[]), include_default: true, ..Default::default() };
	let roles = adapter.list_roles(tn_id, &opts).await.expect("Should list");
	assert_eq!(roles.len(), 1);
	assert!(roles[0].is_default());

	let opts = ListRoleOptions { exclude_default: true, ..Default::default() };
	assert_eq!(adapter.count_roles(tn_id, &opts).await.expect("Should count"), 2);

	let opts = ListRoleOptions { keyword: Some("EDIT"), ..Default::default() };
	let roles = adapter.list_roles(tn_id, &opts).await.expect("Should list");
	assert_eq!(roles.len(), 1);
	assert_eq!(roles[0].id, editor.id);
}

#[tokio::test]
async fn test_list_roles_paging() {
	let (adapter, _temp) = create_test_adapter().await;
	let tn_id = TnId(1);

	for i in 0..5 {
		adapter
			.create_role(tn_id, role_data(&format!("role{}", i), RoleType::Custom, &[]))
			.await
			.expect("Should create role");
	}

	let opts = ListRoleOptions { limit: Some(2), offset: Some(1), ..Default::default() };
	let page = adapter.list_roles(tn_id, &opts).await.expect("Should list");
	let codes: Vec<&str> = page.iter().map(|role| role.code.as_ref()).collect();
	assert_eq!(codes, ["role3", "role2"]);
	assert_eq!(adapter.count_roles(tn_id, &opts).await.expect("Should count"), 5);
}

#[tokio::test]
async fn test_update_role() {
	let (adapter, _temp) = create_test_adapter().await;
	let tn_id = TnId(1);
	let role = adapter
		.create_role(tn_id, role_data("editor", RoleType::Custom, &codes(&["A:x"])))
		.await
		.expect("Should create role");
	adapter
		.create_role(tn_id, role_data("viewer", RoleType::Custom, &[]))
		.await
		.expect("Should create role");

	let update = UpdateRoleData {
		name: Patch::Value("Editor".into()),
		permissions: Patch::Value(codes(&["A:x", "A:y"])),
		..Default::default()
	};
	let updated = adapter.update_role(tn_id, &role.id, &update).await.expect("Should update");
	assert_eq!(updated.name.as_ref(), "Editor");
	assert_eq!(updated.code.as_ref(), "editor");
	assert_eq!(updated.permissions, codes(&["A:x", "A:y"]));
	assert_eq!(adapter.read_role(tn_id, &role.id).await.expect("Should read"), updated);

	let rename = UpdateRoleData { code: Patch::Value("viewer".into()), ..Default::default() };
	assert!(matches!(
		adapter.update_role(tn_id, &role.id, &rename).await,
		Err(Error::Conflict(_))
	));

	let missing = RoleId::from("missing");
	assert!(matches!(
		adapter.update_role(tn_id, &missing, &update).await,
		Err(Error::NotFound)
	));
}

#[tokio::test]
async fn test_user_roles_and_delete() {
	let (adapter, _temp) = create_test_adapter().await;
	let tn_id = TnId(1);
	let editor = adapter
		.create_role(tn_id, role_data("editor", RoleType::Custom, &[]))
		.await
		.expect("Should create role");
	let viewer = adapter
		.create_role(tn_id, role_data("viewer", RoleType::Custom, &[]))
		.await
		.expect("Should create role");

	assert!(adapter.read_user_roles(tn_id, "alice").await.expect("Should read").is_empty());

	adapter
		.update_user_roles(tn_id, "alice", &[viewer.id.clone(), editor.id.clone()])
		.await
		.expect("Should assign");
	adapter.update_user_roles(tn_id, "bob", &[editor.id.clone()]).await.expect("Should assign");

	let alice = adapter.read_user_roles(tn_id, "alice").await.expect("Should read");
	assert_eq!(alice, [viewer.id.clone(), editor.id.clone()]);
	assert_eq!(adapter.count_role_holders(tn_id, &editor.id).await.expect("Should count"), 2);
	assert_eq!(adapter.count_role_holders(tn_id, &viewer.id).await.expect("Should count"), 1);

	adapter.update_user_roles(tn_id, "bob", &[]).await.expect("Should clear");
	assert_eq!(adapter.count_role_holders(tn_id, &editor.id).await.expect("Should count"), 1);

	adapter.delete_role(tn_id, &editor.id).await.expect("Should delete");
	assert!(matches!(adapter.read_role(tn_id, &editor.id).await, Err(Error::NotFound)));
	assert_eq!(adapter.read_user_roles(tn_id, "alice").await.expect("Should read"), [viewer.id]);
	assert!(matches!(adapter.delete_role(tn_id, &editor.id).await, Err(Error::NotFound)));
}

// vim: ts=4
