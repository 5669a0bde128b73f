//! Common types used throughout Warrant.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

// TnId //
//******//
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TnId(pub u32);

impl std::fmt::Display for TnId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl Serialize for TnId {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_u32(self.0)
	}
}

impl<'de> Deserialize<'de> for TnId {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		Ok(TnId(u32::deserialize(deserializer)?))
	}
}

// RoleId //
//********//
/// Opaque role identifier, unique across tenants
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(pub Box<str>);

impl RoleId {
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl std::fmt::Display for RoleId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

impl AsRef<str> for RoleId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl From<&str> for RoleId {
	fn from(s: &str) -> Self {
		RoleId(s.into())
	}
}

impl From<String> for RoleId {
	fn from(s: String) -> Self {
		RoleId(s.into_boxed_str())
	}
}

// Timestamp //
//***********//
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
	pub fn now() -> Timestamp {
		now()
	}
}

impl std::fmt::Display for Timestamp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl Serialize for Timestamp {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_i64(self.0)
	}
}

impl<'de> Deserialize<'de> for Timestamp {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		Ok(Timestamp(i64::deserialize(deserializer)?))
	}
}

pub fn now() -> Timestamp {
	let res = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
	Timestamp(i64::try_from(res.as_secs()).unwrap_or(i64::MAX))
}

// Patch //
//*******//
/// Three-state field for partial updates
///
/// - `Undefined`: field absent, leave unchanged
/// - `Null`: field explicitly cleared
/// - `Value`: field set
///
/// Use with `#[serde(default)]` so missing fields become `Undefined`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Patch<T> {
	#[default]
	Undefined,
	Null,
	Value(T),
}

impl<T> Patch<T> {
	pub fn is_undefined(&self) -> bool {
		matches!(self, Patch::Undefined)
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Patch::Null)
	}

	pub fn is_value(&self) -> bool {
		matches!(self, Patch::Value(_))
	}

	pub fn value(&self) -> Option<&T> {
		match self {
			Patch::Value(v) => Some(v),
			_ => None,
		}
	}

	/// `None` for undefined, `Some(None)` for null, `Some(Some(v))` for a value
	pub fn as_option(&self) -> Option<Option<&T>> {
		match self {
			Patch::Undefined => None,
			Patch::Null => Some(None),
			Patch::Value(v) => Some(Some(v)),
		}
	}

	pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Patch<U> {
		match self {
			Patch::Undefined => Patch::Undefined,
			Patch::Null => Patch::Null,
			Patch::Value(v) => Patch::Value(f(v)),
		}
	}
}

impl<T: Serialize> Serialize for Patch<T> {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		match self {
			Patch::Undefined | Patch::Null => serializer.serialize_none(),
			Patch::Value(v) => serializer.serialize_some(v),
		}
	}
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		Ok(match Option::<T>::deserialize(deserializer)? {
			Some(v) => Patch::Value(v),
			None => Patch::Null,
		})
	}
}


// vim: ts=4
