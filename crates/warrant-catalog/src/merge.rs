//! Merging an overlay tree into a base catalog tree
//!
//! Merge is driven by the overlay:
//! - an overlay module with no same-code sibling in the base is appended with
//!   its whole subtree
//! - a matching module takes the overlay's name, gets the overlay's leaves
//!   appended after its own (duplicates are kept), and has its child modules
//!   merged by the same rule
//! - base modules absent from the overlay are left alone; nothing is removed
//!
//! After a sibling list was merged it is stably sorted by `index`, highest
//! first; modules without an index count as 0, so lists without indices keep
//! their order.

use std::cmp::Reverse;

use crate::node::{PermModule, PermTree};

/// Merge `overlay` into a copy of `base`
pub fn merge(base: &PermTree, overlay: &PermTree) -> PermTree {
	let mut result = base.clone();
	merge_modules(&mut result.modules, &overlay.modules);
	result
}

fn merge_modules(current: &mut Vec<PermModule>, overlay: &[PermModule]) {
	if overlay.is_empty() {
		return;
	}

	for module in overlay {
		match current.iter().position(|m| m.code == module.code) {
			None => current.push(module.clone()),
			Some(idx) => {
				let target = &mut current[idx];
				target.name.clone_from(&module.name);
				target.permissions.extend(module.permissions.iter().cloned());
				merge_modules(&mut target.modules, &module.modules);
			}
		}
	}

	current.sort_by_key(|m| Reverse(m.index.unwrap_or(0)));
}


// vim: ts=4
