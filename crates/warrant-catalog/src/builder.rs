//! Catalog builder and the frozen catalog

use serde::Serialize;
use std::borrow::Borrow;
use std::collections::HashSet;
use std::hash::Hash;

use tracing::{debug, info, warn};

use crate::filter::filter;
use crate::flatten::{FlatPerm, flatten};
use crate::merge::merge;
use crate::node::{Iter, PermTree};
use crate::source::{OverlayError, OverlaySource};

/// Builds a catalog from a base tree and any number of overlays
pub struct CatalogBuilder {
	base: PermTree,
	overlays: Vec<OverlaySource>,
}

impl CatalogBuilder {
	pub fn new(base: PermTree) -> Self {
		Self { base, overlays: Vec::new() }
	}

	/// Add an overlay, merged after the ones already added
	pub fn overlay(mut self, source: OverlaySource) -> Self {
		if !matches!(source, OverlaySource::None) {
			self.overlays.push(source);
		}
		self
	}

	/// Build, failing on the first overlay that cannot be loaded
	pub fn try_build(self) -> Result<Catalog, OverlayError> {
		let mut tree = self.base;
		for source in &self.overlays {
			if let Some(overlay) = source.load()? {
				tree = merge(&tree, &overlay);
			}
		}
		Ok(Catalog::new(tree))
	}

	/// Build, skipping overlays that cannot be loaded
	pub fn build(self) -> Catalog {
		let mut tree = self.base;
		for source in &self.overlays {
			match source.load() {
				Ok(Some(overlay)) => {
					debug!("Merging catalog overlay: {}", source);
					tree = merge(&tree, &overlay);
				}
				Ok(None) => {}
				Err(err) => {
					warn!(overlay = %source, "Ignoring catalog overlay: {}", err);
				}
			}
		}
		Catalog::new(tree)
	}
}

/// Immutable permission catalog
///
/// Holds the tree together with its flattened form and code set, computed
/// once at construction.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
	#[serde(flatten)]
	tree: PermTree,
	#[serde(skip)]
	flat: Vec<FlatPerm>,
	#[serde(skip)]
	codes: HashSet<Box<str>>,
}

impl Catalog {
	pub fn new(tree: PermTree) -> Self {
		let flat = flatten(tree.iter());
		let mut codes = HashSet::with_capacity(flat.len());
		for item in &flat {
			if !codes.insert(item.code.clone()) {
				warn!(code = %item.code, "Duplicate permission code in catalog");
			}
		}
		info!("Catalog frozen with {} codes", codes.len());
		Self { tree, flat, codes }
	}

	pub fn tree(&self) -> &PermTree {
		&self.tree
	}

	pub fn iter(&self) -> Iter<'_> {
		self.tree.iter()
	}

	/// Flattened catalog in canonical order
	pub fn flat(&self) -> &[FlatPerm] {
		&self.flat
	}

	/// All fully-qualified codes in canonical order
	pub fn codes(&self) -> impl Iterator<Item = &str> {
		self.flat.iter().map(|item| item.code.as_ref())
	}

	pub fn contains(&self, code: &str) -> bool {
		self.codes.contains(code)
	}

	/// Number of distinct codes
	pub fn len(&self) -> usize {
		self.codes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.codes.is_empty()
	}

	/// Keep the submitted codes that exist in the catalog
	///
	/// Submission order is kept, duplicates are removed.
	pub fn intersect<S: AsRef<str>>(&self, submitted: &[S]) -> Vec<Box<str>> {
		let mut seen = HashSet::new();
		submitted
			.iter()
			.map(AsRef::<str>::as_ref)
			.filter(|code| self.contains(code) && seen.insert(*code))
			.map(Box::from)
			.collect()
	}

	/// Tree pruned to the allowed module codes
	pub fn filter<S>(&self, allowed: &HashSet<S>) -> PermTree
	where
		S: Borrow<str> + Eq + Hash,
	{
		filter(&self.tree, allowed)
	}
}


// vim: ts=4
