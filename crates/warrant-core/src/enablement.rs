//! Per-tenant enabled permission codes
//!
//! A tenant starts with the whole catalog enabled. Updates are validated
//! against the live catalog: unknown codes are dropped, never rejected.

use std::collections::HashSet;
use std::sync::Arc;

use warrant_catalog::CatalogHandle;
use warrant_types::perm_adapter::PermAdapter;
use warrant_types::utils::dedup_codes;

use crate::prelude::*;

#[derive(Debug, Clone)]
pub struct EnablementService {
	catalog: Arc<CatalogHandle>,
	adapter: Arc<dyn PermAdapter>,
}

impl EnablementService {
	pub fn new(catalog: Arc<CatalogHandle>, adapter: Arc<dyn PermAdapter>) -> Self {
		Self { catalog, adapter }
	}

	/// Enable the whole catalog for a newly provisioned tenant
	pub async fn initialize(&self, tn_id: TnId) -> WrResult<Vec<Box<str>>> {
		let catalog = self.catalog.get();
		let codes = dedup_codes(catalog.codes());
		self.adapter.create_enabled_perms(tn_id, &codes).await?;
		info!("Enabled {} permission codes for tn_id={}", codes.len(), tn_id);
		Ok(codes)
	}

	/// Enabled codes of a tenant
	pub async fn enabled_codes(&self, tn_id: TnId) -> WrResult<Vec<Box<str>>> {
		self.adapter.read_enabled_perms(tn_id).await
	}

	/// Enabled codes with the catalog pruned to them
	pub async fn get_enabled(&self, tn_id: TnId) -> WrResult<PermView> {
		let codes = self.enabled_codes(tn_id).await?;
		let allowed: HashSet<&str> = codes.iter().map(AsRef::as_ref).collect();
		let catalog = self.catalog.get().filter(&allowed);
		Ok(PermView { codes, catalog })
	}

	/// Enabled codes with the full, unfiltered catalog (for editing enablement)
	pub async fn get_full(&self, tn_id: TnId) -> WrResult<PermView> {
		let codes = self.enabled_codes(tn_id).await?;
		let catalog = self.catalog.get().tree().clone();
		Ok(PermView { codes, catalog })
	}

	/// Replace the enabled codes of a tenant
	///
	/// Only codes present in the live catalog are stored; the rest is dropped
	/// silently. Returns the stored codes.
	pub async fn set_enabled<S: AsRef<str>>(
		&self,
		tn_id: TnId,
		submitted: &[S],
	) -> WrResult<Vec<Box<str>>> {
		let codes = self.catalog.get().intersect(submitted);
		if codes.len() < submitted.len() {
			debug!(
				"Dropped {} unknown or duplicate codes for tn_id={}",
				submitted.len() - codes.len(),
				tn_id
			);
		}
		self.adapter.update_enabled_perms(tn_id, &codes).await?;
		info!("Updated enabled permission codes for tn_id={} ({} codes)", tn_id, codes.len());
		Ok(codes)
	}

	pub async fn is_enabled(&self, tn_id: TnId, code: &str) -> WrResult<bool> {
		Ok(self.enabled_codes(tn_id).await?.iter().any(|c| c.as_ref() == code))
	}
}

// vim: ts=4
