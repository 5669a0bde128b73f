//! App state and builder

use std::path::PathBuf;
use std::sync::Arc;

use warrant_catalog::builtin::base_catalog;
use warrant_catalog::{Catalog, CatalogBuilder, CatalogHandle, OverlaySource, PermTree};
use warrant_types::perm_adapter::{PermAdapter, Role};

use crate::enablement::EnablementService;
use crate::prelude::*;
use crate::role::RoleService;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding an overlay file path
pub const OVERLAY_ENV: &str = "WARRANT_OVERLAY";

#[derive(Debug, Clone)]
pub struct AppOpts {
	pub base_catalog: PermTree,
	pub overlays: Vec<OverlaySource>,
}

impl AppOpts {
	fn build_catalog(&self) -> Catalog {
		self.overlays
			.iter()
			.cloned()
			.fold(CatalogBuilder::new(self.base_catalog.clone()), CatalogBuilder::overlay)
			.build()
	}
}

#[derive(Debug)]
pub struct AppState {
	pub opts: AppOpts,
	pub catalog: Arc<CatalogHandle>,
	pub perm_adapter: Arc<dyn PermAdapter>,
	pub enablement: EnablementService,
	pub roles: RoleService,
}

pub type App = Arc<AppState>;

impl AppState {
	/// Enabled codes of a tenant with the catalog pruned to them
	pub async fn tenant_enabled_view(&self, tn_id: TnId) -> WrResult<PermView> {
		self.enablement.get_enabled(tn_id).await
	}

	/// Enabled codes of a tenant with the full catalog
	pub async fn tenant_full_view(&self, tn_id: TnId) -> WrResult<PermView> {
		self.enablement.get_full(tn_id).await
	}

	pub async fn set_tenant_enabled_codes<S: AsRef<str>>(
		&self,
		tn_id: TnId,
		codes: &[S],
	) -> WrResult<Vec<Box<str>>> {
		self.enablement.set_enabled(tn_id, codes).await
	}

	pub async fn save_role_permissions<S: AsRef<str>>(
		&self,
		tn_id: TnId,
		role_id: &RoleId,
		codes: &[S],
	) -> WrResult<Role> {
		self.roles.save_permissions(tn_id, role_id, codes).await
	}

	pub async fn resolve_effective_permissions(
		&self,
		tn_id: TnId,
		assigned: &[RoleId],
	) -> WrResult<PermView> {
		self.roles.effective_permissions(tn_id, assigned).await
	}

	/// Prepare a tenant: enable the whole catalog and create the system roles
	///
	/// Safe to call again; an existing enablement is left untouched.
	pub async fn provision_tenant(&self, tn_id: TnId) -> WrResult<()> {
		match self.perm_adapter.read_enabled_perms(tn_id).await {
			Ok(_) => debug!("Tenant {} already has enabled permissions", tn_id),
			Err(Error::NotFound) => {
				self.enablement.initialize(tn_id).await?;
			}
			Err(err) => return Err(err),
		}
		self.roles.provision_system_roles(tn_id).await?;
		info!("Provisioned permissions for tn_id={}", tn_id);
		Ok(())
	}

	/// Rebuild the catalog from the configured base and overlays
	///
	/// Callers holding the previous snapshot keep using it.
	pub fn reload_catalog(&self) -> Arc<Catalog> {
		self.catalog.replace(self.opts.build_catalog());
		let catalog = self.catalog.get();
		info!("Reloaded permission catalog ({} codes)", catalog.len());
		catalog
	}
}

pub struct AppBuilder {
	opts: AppOpts,
	perm_adapter: Option<Arc<dyn PermAdapter>>,
}

impl AppBuilder {
	pub fn new() -> Self {
		AppBuilder {
			opts: AppOpts { base_catalog: base_catalog(), overlays: Vec::new() },
			perm_adapter: None,
		}
	}

	/// Builder with options taken from the environment
	pub fn from_env() -> Self {
		let mut builder = Self::new();
		if let Some(path) = std::env::var_os(OVERLAY_ENV) {
			builder.overlay_path(path);
		}
		builder
	}

	/// Install the fmt subscriber, filtered by `RUST_LOG`
	pub fn init_tracing(&mut self) -> &mut Self {
		let res = tracing_subscriber::fmt()
			.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
			.with_target(false)
			.try_init();
		if res.is_err() {
			debug!("Tracing subscriber already installed");
		}
		self
	}

	// Opts
	pub fn base_catalog(&mut self, base_catalog: PermTree) -> &mut Self {
		self.opts.base_catalog = base_catalog;
		self
	}
	pub fn overlay(&mut self, overlay: OverlaySource) -> &mut Self {
		self.opts.overlays.push(overlay);
		self
	}
	pub fn overlay_path(&mut self, path: impl Into<PathBuf>) -> &mut Self {
		self.opts.overlays.push(OverlaySource::File(path.into()));
		self
	}

	// Adapters
	pub fn perm_adapter(&mut self, perm_adapter: Arc<dyn PermAdapter>) -> &mut Self {
		self.perm_adapter = Some(perm_adapter);
		self
	}

	pub fn build(self) -> WrResult<App> {
		let Some(perm_adapter) = self.perm_adapter else {
			error!("FATAL: No perm adapter configured");
			return Err(Error::ConfigError("No perm adapter configured".into()));
		};

		let catalog = self.opts.build_catalog();
		info!("Warrant V{}: catalog with {} permission codes", VERSION, catalog.len());
		let catalog = Arc::new(CatalogHandle::new(catalog));

		let enablement = EnablementService::new(catalog.clone(), perm_adapter.clone());
		let roles = RoleService::new(enablement.clone(), perm_adapter.clone());

		Ok(Arc::new(AppState { opts: self.opts, catalog, perm_adapter, enablement, roles }))
	}
}

impl Default for AppBuilder {
	fn default() -> Self {
		Self::new()
	}
}

// vim: ts=4
