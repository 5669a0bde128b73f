//! Pruning a catalog tree to an allowed code set

use std::borrow::Borrow;
use std::collections::HashSet;
use std::hash::Hash;

use crate::node::{PermModule, PermTree, full_code};

/// Prune `tree` to the modules whose fully-qualified code is in `allowed`
///
/// A module outside `allowed` is dropped together with its subtree. A kept
/// module's own leaves are copied through as they are: leaf codes are NOT
/// checked against `allowed`, so `allowed` only governs module visibility.
pub fn filter<S>(tree: &PermTree, allowed: &HashSet<S>) -> PermTree
where
	S: Borrow<str> + Eq + Hash,
{
	PermTree { modules: filter_modules(&tree.modules, None, allowed) }
}

fn filter_modules<S>(
	modules: &[PermModule],
	parent: Option<&str>,
	allowed: &HashSet<S>,
) -> Vec<PermModule>
where
	S: Borrow<str> + Eq + Hash,
{
	modules
		.iter()
		.filter_map(|module| {
			let code = full_code(parent, &module.code);
			if !allowed.contains(code.as_str()) {
				return None;
			}
			Some(PermModule {
				name: module.name.clone(),
				code: module.code.clone(),
				index: module.index,
				modules: filter_modules(&module.modules, Some(&code), allowed),
				permissions: module.permissions.clone(),
			})
		})
		.collect()
}


// vim: ts=4
