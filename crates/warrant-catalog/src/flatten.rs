//! Flattening a catalog tree into its canonical ordered code list

use serde::{Deserialize, Serialize};

use crate::node::{Iter, PermNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermType {
	Module,
	Permission,
}

impl PermType {
	pub fn as_str(self) -> &'static str {
		match self {
			PermType::Module => "module",
			PermType::Permission => "permission",
		}
	}
}

/// One entry of a flattened catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatPerm {
	pub name: Box<str>,
	pub code: Box<str>,
	#[serde(rename = "type")]
	pub typ: PermType,
}

/// Flatten a tree (or a subtree via [`crate::PermModule::iter`]) in canonical order
///
/// For every module: the module itself, then each child module's entire
/// subtree in order, then the module's own leaves.
pub fn flatten(iter: Iter<'_>) -> Vec<FlatPerm> {
	iter.map(|(node, code)| FlatPerm {
		name: node.name().into(),
		code: code.into_boxed_str(),
		typ: match node {
			PermNode::Module(_) => PermType::Module,
			PermNode::Leaf(_) => PermType::Permission,
		},
	})
	.collect()
}

/// Fully-qualified codes only, in canonical order
pub fn flatten_codes(iter: Iter<'_>) -> Vec<Box<str>> {
	iter.map(|(_, code)| code.into_boxed_str()).collect()
}


// vim: ts=4
