//! Catalog tree model and traversal

use serde::{Deserialize, Serialize};

pub const CODE_SEPARATOR: char = ':';

/// Join a parent's fully-qualified code with a local code
///
/// # Examples
/// ```
/// use warrant_catalog::full_code;
/// assert_eq!(full_code(None, "setting"), "setting");
/// assert_eq!(full_code(Some("setting:org"), "view"), "setting:org:view");
/// ```
pub fn full_code(parent: Option<&str>, code: &str) -> String {
	match parent {
		Some(parent) if !parent.is_empty() => format!("{}{}{}", parent, CODE_SEPARATOR, code),
		_ => code.to_string(),
	}
}

/// Leaf permission. Leaves never have children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermLeaf {
	pub name: Box<str>,
	pub code: Box<str>,
}

impl PermLeaf {
	pub fn new(name: impl Into<Box<str>>, code: impl Into<Box<str>>) -> Self {
		Self { name: name.into(), code: code.into() }
	}
}

/// Permission module, owning ordered child modules and leaves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermModule {
	pub name: Box<str>,
	pub code: Box<str>,
	/// Sort weight among siblings after a merge (higher first)
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub index: Option<i32>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub modules: Vec<PermModule>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub permissions: Vec<PermLeaf>,
}

impl PermModule {
	pub fn new(name: impl Into<Box<str>>, code: impl Into<Box<str>>) -> Self {
		Self {
			name: name.into(),
			code: code.into(),
			index: None,
			modules: Vec::new(),
			permissions: Vec::new(),
		}
	}

	pub fn with_module(mut self, module: PermModule) -> Self {
		self.modules.push(module);
		self
	}

	pub fn with_permission(mut self, name: impl Into<Box<str>>, code: impl Into<Box<str>>) -> Self {
		self.permissions.push(PermLeaf::new(name, code));
		self
	}

	pub fn with_index(mut self, index: i32) -> Self {
		self.index = Some(index);
		self
	}

	/// Pre-order traversal of this module as a subtree root
	pub fn iter(&self) -> Iter<'_> {
		Iter::new(std::slice::from_ref(self))
	}
}

/// A tree of permission modules
///
/// This is also the document shape of catalog overlays:
/// `{ "modules": [{ "name": ..., "code": ..., "modules": [...], "permissions": [...] }] }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermTree {
	#[serde(default)]
	pub modules: Vec<PermModule>,
}

impl PermTree {
	pub fn new(modules: Vec<PermModule>) -> Self {
		Self { modules }
	}

	pub fn is_empty(&self) -> bool {
		self.modules.is_empty()
	}

	/// Pre-order traversal in canonical flatten order
	pub fn iter(&self) -> Iter<'_> {
		Iter::new(&self.modules)
	}

	/// Find a module by fully-qualified code
	pub fn find_module(&self, code: &str) -> Option<&PermModule> {
		let mut modules = &self.modules;
		let mut found = None;
		for part in code.split(CODE_SEPARATOR) {
			let module = modules.iter().find(|m| m.code.as_ref() == part)?;
			modules = &module.modules;
			found = Some(module);
		}
		found
	}
}

/// Borrowed view of a tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermNode<'a> {
	Module(&'a PermModule),
	Leaf(&'a PermLeaf),
}

impl<'a> PermNode<'a> {
	pub fn name(&self) -> &'a str {
		match self {
			PermNode::Module(m) => &m.name,
			PermNode::Leaf(l) => &l.name,
		}
	}

	pub fn code(&self) -> &'a str {
		match self {
			PermNode::Module(m) => &m.code,
			PermNode::Leaf(l) => &l.code,
		}
	}

	pub fn is_module(&self) -> bool {
		matches!(self, PermNode::Module(_))
	}
}

enum Pending<'a> {
	Module { module: &'a PermModule, parent: Option<Box<str>> },
	Leaves { module: &'a PermModule, code: Box<str>, next: usize },
}

/// Lazy pre-order iterator over `(node, full_code)` pairs
///
/// Order: a module, then each child module's whole subtree in order, then the
/// module's own leaves.
pub struct Iter<'a> {
	stack: Vec<Pending<'a>>,
}

impl<'a> Iter<'a> {
	fn new(modules: &'a [PermModule]) -> Self {
		let stack = modules.iter().rev().map(|module| Pending::Module { module, parent: None });
		Self { stack: stack.collect() }
	}
}

impl<'a> Iterator for Iter<'a> {
	type Item = (PermNode<'a>, String);

	fn next(&mut self) -> Option<Self::Item> {
		while let Some(pending) = self.stack.pop() {
			match pending {
				Pending::Module { module, parent } => {
					let code = full_code(parent.as_deref(), &module.code);
					self.stack.push(Pending::Leaves {
						module,
						code: code.as_str().into(),
						next: 0,
					});
					for child in module.modules.iter().rev() {
						self.stack.push(Pending::Module {
							module: child,
							parent: Some(code.as_str().into()),
						});
					}
					return Some((PermNode::Module(module), code));
				}
				Pending::Leaves { module, code, next } => {
					let Some(leaf) = module.permissions.get(next) else {
						continue;
					};
					let leaf_code = full_code(Some(&code), &leaf.code);
					self.stack.push(Pending::Leaves { module, code, next: next + 1 });
					return Some((PermNode::Leaf(leaf), leaf_code));
				}
			}
		}
		None
	}
}


// vim: ts=4
