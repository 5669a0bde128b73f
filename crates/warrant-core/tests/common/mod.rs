//! Shared test fixtures

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use warrant_catalog::{PermModule, PermTree};
use warrant_core::{App, AppBuilder};
use warrant_perm_adapter_memory::MemoryPermAdapter;
use warrant_types::error::WrResult;
use warrant_types::perm_adapter::{
	CreateRoleData, ListRoleOptions, PermAdapter, Role, UpdateRoleData,
};
use warrant_types::types::{RoleId, TnId};

/// Memory adapter that counts mutating calls
#[derive(Debug, Default)]
pub struct RecordingAdapter {
	inner: MemoryPermAdapter,
	mutations: AtomicUsize,
}

impl RecordingAdapter {
	pub fn mutations(&self) -> usize {
		self.mutations.load(Ordering::SeqCst)
	}

	fn record(&self) {
		self.mutations.fetch_add(1, Ordering::SeqCst);
	}
}

#[async_trait]
impl PermAdapter for RecordingAdapter {
	async fn read_enabled_perms(&self, tn_id: TnId) -> WrResult<Vec<Box<str>>> {
		self.inner.read_enabled_perms(tn_id).await
	}

	async fn create_enabled_perms(&self, tn_id: TnId, codes: &[Box<str>]) -> WrResult<()> {
		self.record();
		self.inner.create_enabled_perms(tn_id, codes).await
	}

	async fn update_enabled_perms(&self, tn_id: TnId, codes: &[Box<str>]) -> WrResult<()> {
		self.record();
		self.inner.update_enabled_perms(tn_id, codes).await
	}

	async fn delete_enabled_perms(&self, tn_id: TnId) -> WrResult<()> {
		self.record();
		self.inner.delete_enabled_perms(tn_id).await
	}

	async fn read_role(&self, tn_id: TnId, role_id: &RoleId) -> WrResult<Role> {
		self.inner.read_role(tn_id, role_id).await
	}

	async fn read_role_by_code(&self, tn_id: TnId, code: &str) -> WrResult<Option<Role>> {
		self.inner.read_role_by_code(tn_id, code).await
	}

	async fn list_roles(&self, tn_id: TnId, opts: &ListRoleOptions<'_>) -> WrResult<Vec<Role>> {
		self.inner.list_roles(tn_id, opts).await
	}

	async fn count_roles(&self, tn_id: TnId, opts: &ListRoleOptions<'_>) -> WrResult<u32> {
		self.inner.count_roles(tn_id, opts).await
	}

	async fn create_role(&self, tn_id: TnId, data: CreateRoleData<'_>) -> WrResult<Role> {
		self.record();
		self.inner.create_role(tn_id, data).await
	}

	async fn update_role(
		&self,
		tn_id: TnId,
		role_id: &RoleId,
		data: &UpdateRoleData,
	) -> WrResult<Role> {
		self.record();
		self.inner.update_role(tn_id, role_id, data).await
	}

	async fn delete_role(&self, tn_id: TnId, role_id: &RoleId) -> WrResult<()> {
		self.record();
		self.inner.delete_role(tn_id, role_id).await
	}

	async fn read_user_roles(&self, tn_id: TnId, user_id: &str) -> WrResult<Vec<RoleId>> {
		self.inner.read_user_roles(tn_id, user_id).await
	}

	async fn update_user_roles(
		&self,
		tn_id: TnId,
		user_id: &str,
		roles: &[RoleId],
	) -> WrResult<()> {
		self.record();
		self.inner.update_user_roles(tn_id, user_id, roles).await
	}

	async fn count_role_holders(&self, tn_id: TnId, role_id: &RoleId) -> WrResult<u32> {
		self.inner.count_role_holders(tn_id, role_id).await
	}
}

/// Small catalog: A{x, y}, B{C{w}, z}
pub fn sample_tree() -> PermTree {
	PermTree::new(vec![
		PermModule::new("Alpha", "A").with_permission("X", "x").with_permission("Y", "y"),
		PermModule::new("Beta", "B")
			.with_module(PermModule::new("Gamma", "C").with_permission("W", "w"))
			.with_permission("Z", "z"),
	])
}

/// Flattened codes of [`sample_tree`] in catalog order
pub const SAMPLE_CODES: [&str; 7] = ["A", "A:x", "A:y", "B", "B:C", "B:C:w", "B:z"];

pub fn create_test_app() -> (App, Arc<RecordingAdapter>) {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
	let adapter = Arc::new(RecordingAdapter::default());

	let mut builder = AppBuilder::new();
	builder.base_catalog(sample_tree()).perm_adapter(adapter.clone());
	let app = builder.build().expect("Failed to build app");

	(app, adapter)
}

/// App with tenant 1 provisioned
pub async fn create_provisioned_app() -> (App, Arc<RecordingAdapter>) {
	let (app, adapter) = create_test_app();
	app.provision_tenant(TnId(1)).await.expect("Failed to provision tenant");
	(app, adapter)
}

pub fn strs(codes: &[Box<str>]) -> Vec<&str> {
	codes.iter().map(AsRef::as_ref).collect()
}

// vim: ts=4
