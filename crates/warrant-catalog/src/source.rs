//! Overlay catalog sources
//!
//! An overlay is a [`PermTree`] document supplied from outside the binary.
//! Supported formats are JSON, YAML and TOML; for files the format follows the
//! extension.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::node::PermTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayFormat {
	Json,
	Yaml,
	Toml,
}

impl OverlayFormat {
	pub fn from_path(path: &Path) -> Option<Self> {
		match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
			"json" => Some(OverlayFormat::Json),
			"yaml" | "yml" => Some(OverlayFormat::Yaml),
			"toml" => Some(OverlayFormat::Toml),
			_ => None,
		}
	}

	/// Parse an overlay document
	pub fn parse(self, content: &str) -> Result<PermTree, OverlayError> {
		match self {
			OverlayFormat::Json => serde_json::from_str(content).map_err(OverlayError::Json),
			OverlayFormat::Yaml => serde_yaml::from_str(content).map_err(OverlayError::Yaml),
			OverlayFormat::Toml => toml::from_str(content).map_err(OverlayError::Toml),
		}
	}
}

/// Where an overlay comes from
#[derive(Debug, Clone, Default)]
pub enum OverlaySource {
	#[default]
	None,
	/// Already parsed document
	Document(PermTree),
	/// File; format chosen by extension
	File(PathBuf),
	/// In-memory document text
	Str { format: OverlayFormat, content: String },
}

impl OverlaySource {
	/// Load the overlay. `Ok(None)` when there is no overlay.
	pub fn load(&self) -> Result<Option<PermTree>, OverlayError> {
		match self {
			OverlaySource::None => Ok(None),
			OverlaySource::Document(tree) => Ok(Some(tree.clone())),
			OverlaySource::File(path) => {
				let format = OverlayFormat::from_path(path)
					.ok_or_else(|| OverlayError::UnknownFormat(path.clone()))?;
				let content = std::fs::read_to_string(path)
					.map_err(|err| OverlayError::Io(path.clone(), err))?;
				format.parse(&content).map(Some)
			}
			OverlaySource::Str { format, content } => format.parse(content).map(Some),
		}
	}
}

impl fmt::Display for OverlaySource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OverlaySource::None => write!(f, "none"),
			OverlaySource::Document(_) => write!(f, "document"),
			OverlaySource::File(path) => write!(f, "{}", path.display()),
			OverlaySource::Str { format, .. } => write!(f, "{:?} string", format),
		}
	}
}

/// Overlay load failure. Recovered by building without the overlay.
#[derive(Debug)]
pub enum OverlayError {
	Io(PathBuf, std::io::Error),
	UnknownFormat(PathBuf),
	Json(serde_json::Error),
	Yaml(serde_yaml::Error),
	Toml(toml::de::Error),
}

impl fmt::Display for OverlayError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OverlayError::Io(path, err) => write!(f, "cannot read {}: {}", path.display(), err),
			OverlayError::UnknownFormat(path) => {
				write!(f, "unknown overlay format: {}", path.display())
			}
			OverlayError::Json(err) => write!(f, "invalid JSON overlay: {}", err),
			OverlayError::Yaml(err) => write!(f, "invalid YAML overlay: {}", err),
			OverlayError::Toml(err) => write!(f, "invalid TOML overlay: {}", err),
		}
	}
}

impl std::error::Error for OverlayError {}

impl From<OverlayError> for warrant_types::error::Error {
	fn from(err: OverlayError) -> Self {
		warrant_types::error::Error::ConfigError(err.to_string())
	}
}


// vim: ts=4
