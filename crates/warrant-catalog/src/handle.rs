//! Shared catalog reference with atomic replacement

use parking_lot::RwLock;
use std::sync::Arc;

use crate::builder::Catalog;

/// Shared, swappable catalog
///
/// Readers take a snapshot `Arc<Catalog>` and keep using it even if the
/// catalog is replaced meanwhile. A catalog is never mutated in place.
#[derive(Debug)]
pub struct CatalogHandle {
	current: RwLock<Arc<Catalog>>,
}

impl CatalogHandle {
	pub fn new(catalog: Catalog) -> Self {
		Self { current: RwLock::new(Arc::new(catalog)) }
	}

	/// Current catalog snapshot
	pub fn get(&self) -> Arc<Catalog> {
		self.current.read().clone()
	}

	/// Replace the catalog, returning the previous one
	pub fn replace(&self, catalog: Catalog) -> Arc<Catalog> {
		let catalog = Arc::new(catalog);
		std::mem::replace(&mut *self.current.write(), catalog)
	}
}


// vim: ts=4
