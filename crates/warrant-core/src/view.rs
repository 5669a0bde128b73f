//! Permission views returned to consumers

use serde::Serialize;
use warrant_catalog::PermTree;

/// A code set together with the catalog tree to present it with
///
/// Serializes as `{ "codes": [...], "permissions": { "modules": [...] } }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PermView {
	pub codes: Vec<Box<str>>,
	#[serde(rename = "permissions")]
	pub catalog: PermTree,
}

impl PermView {
	pub fn contains(&self, code: &str) -> bool {
		self.codes.iter().any(|c| c.as_ref() == code)
	}
}


// vim: ts=4
