//! Error type shared by all Warrant crates

use std::fmt;

pub type WrResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	NotFound,
	/// Mutation of a reserved (system) role, or a reserved code
	PermissionDenied,
	Conflict(String),
	ValidationError(String),
	ConfigError(String),
	DbError,
	Parse,
	Internal(String),

	// externals
	Io(std::io::Error),
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		tracing::warn!("JSON: {}", err);
		Self::Parse
	}
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Error::NotFound => write!(f, "not found"),
			Error::PermissionDenied => write!(f, "permission denied"),
			Error::Conflict(msg) => write!(f, "conflict: {}", msg),
			Error::ValidationError(msg) => write!(f, "validation error: {}", msg),
			Error::ConfigError(msg) => write!(f, "configuration error: {}", msg),
			Error::DbError => write!(f, "database error"),
			Error::Parse => write!(f, "parse error"),
			Error::Internal(msg) => write!(f, "internal error: {}", msg),
			Error::Io(err) => write!(f, "I/O error: {}", err),
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Error::Io(err) => Some(err),
			_ => None,
		}
	}
}


// vim: ts=4
