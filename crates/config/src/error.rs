//! Error types for settings persistence.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading or writing a configuration file.
	#[error("I/O error on {path}: {source}")]
	Io {
		/// Path to the file that failed.
		path: PathBuf,
		/// The underlying I/O error.
		source: std::io::Error,
	},

	/// A configuration file exists but is not valid JSON.
	#[error("malformed configuration in {path}: {source}")]
	Parse {
		/// Path to the file that failed to parse.
		path: PathBuf,
		/// The underlying JSON error.
		source: serde_json::Error,
	},
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
