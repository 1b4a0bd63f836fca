//! Configuration loading errors.

use std::path::PathBuf;

use thiserror::Error;
use wayfinder_router::{ConfigurationError, HistoryError};

/// Errors raised while loading or applying router settings.
#[derive(Debug, Error)]
pub enum ConfError {
	/// The settings file could not be read.
	#[error("Failed to read {path}: {source}")]
	Io {
		/// File that failed to load.
		path: PathBuf,
		/// Underlying I/O error.
		source: std::io::Error,
	},

	/// The TOML document is malformed.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// The JSON document is malformed.
	#[error("JSON parse error: {0}")]
	Json(#[from] serde_json::Error),

	/// The file extension is neither `.toml` nor `.json`.
	#[error("Unsupported format: {0} (supported formats: .toml, .json)")]
	UnsupportedFormat(String),

	/// A setting has an unusable value.
	#[error("Invalid setting '{key}': {reason}")]
	InvalidSetting {
		/// Setting key.
		key: &'static str,
		/// Why the value was rejected.
		reason: String,
	},

	/// The route table is invalid.
	#[error(transparent)]
	Configuration(#[from] ConfigurationError),

	/// The history backend could not be wired.
	#[error(transparent)]
	History(#[from] HistoryError),
}
