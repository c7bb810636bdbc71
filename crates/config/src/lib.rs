//! Persisted local settings for the editor shell.
//!
//! Two blobs live on disk, both JSON:
//!
//! * `settings.json` — the [`Settings`] record (API credential, autocomplete
//!   flag, font size, default language, theme)
//! * `layout.json` — an opaque panel-layout value owned by the UI layer
//!
//! A missing file yields defaults rather than an error; a present but
//! malformed file is a [`ConfigError::Parse`]. The core reads and writes
//! these blobs without interpreting anything beyond the [`Settings`] fields.

#![warn(missing_docs)]

pub mod error;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use error::{ConfigError, Result};

const SETTINGS_FILE: &str = "settings.json";
const LAYOUT_FILE: &str = "layout.json";

/// User-facing editor settings.
///
/// Unknown fields in the on-disk blob are ignored and missing fields fall
/// back to defaults, so older and newer settings files both load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Completion-provider credential. `None` disables the suggestion
	/// pipeline entirely.
	pub api_key: Option<String>,
	/// Whether edits trigger automatic completion requests.
	pub autocomplete: bool,
	/// Editor font size in points.
	pub font_size: u16,
	/// Language assigned to new documents.
	pub default_language: String,
	/// UI theme name.
	pub theme: String,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			api_key: None,
			autocomplete: true,
			font_size: 14,
			default_language: "javascript".to_string(),
			theme: "dark".to_string(),
		}
	}
}

/// Reads and writes the persisted blobs under one directory.
#[derive(Debug, Clone)]
pub struct ConfigStore {
	dir: PathBuf,
}

impl ConfigStore {
	/// Creates a store rooted at `dir`. The directory is created on first
	/// save, not here.
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}

	/// The conventional per-user location (`<config dir>/quill`).
	pub fn default_dir() -> Option<PathBuf> {
		dirs::config_dir().map(|dir| dir.join("quill"))
	}

	/// Returns the directory this store reads and writes.
	pub fn dir(&self) -> &Path {
		&self.dir
	}

	/// Loads settings, falling back to defaults when no file exists.
	pub fn load_settings(&self) -> Result<Settings> {
		let path = self.dir.join(SETTINGS_FILE);
		match read_json(&path)? {
			Some(settings) => Ok(settings),
			None => {
				tracing::debug!(path = %path.display(), "config.settings.missing_using_defaults");
				Ok(Settings::default())
			}
		}
	}

	/// Writes settings, creating the directory if needed.
	pub fn save_settings(&self, settings: &Settings) -> Result<()> {
		self.write_json(SETTINGS_FILE, settings)
	}

	/// Loads the opaque panel-layout blob, if one was saved.
	pub fn load_layout(&self) -> Result<Option<Value>> {
		read_json(&self.dir.join(LAYOUT_FILE))
	}

	/// Writes the opaque panel-layout blob.
	pub fn save_layout(&self, layout: &Value) -> Result<()> {
		self.write_json(LAYOUT_FILE, layout)
	}

	fn write_json<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
		let path = self.dir.join(file);
		fs::create_dir_all(&self.dir).map_err(|source| ConfigError::Io {
			path: self.dir.clone(),
			source,
		})?;
		let body = serde_json::to_string_pretty(value).map_err(|source| ConfigError::Parse {
			path: path.clone(),
			source,
		})?;
		fs::write(&path, body).map_err(|source| ConfigError::Io { path, source })
	}
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Option<T>> {
	let body = match fs::read_to_string(path) {
		Ok(body) => body,
		Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
		Err(source) => {
			return Err(ConfigError::Io {
				path: path.to_path_buf(),
				source,
			});
		}
	};
	serde_json::from_str(&body).map(Some).map_err(|source| ConfigError::Parse {
		path: path.to_path_buf(),
		source,
	})
}
