//! Binding settings
//!
//! Loaded from TOML. Every field has a default, so an empty document is a
//! valid configuration:
//!
//! ```toml
//! [pool]
//! max_idle = 1024
//! prewarm = 0
//!
//! [render]
//! indent_json = false
//! json_content_type = "application/json; charset=utf-8"
//! ```

use hyper::header::HeaderValue;
use reinhardt_di::{DEFAULT_MAX_IDLE, ScopePool};
use reinhardt_http::RenderOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
	#[error("File error: {0}")]
	FileError(String),

	#[error("Parse error: {0}")]
	ParseError(String),

	#[error("Validation error: {0}")]
	ValidationError(String),
}

/// Settings for request scope binding and response rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingSettings {
	#[serde(default)]
	pub pool: PoolSettings,

	#[serde(default)]
	pub render: RenderSettings,
}

/// Registry pool sizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSettings {
	/// Idle registries retained; extras are dropped on release
	#[serde(default = "default_max_idle")]
	pub max_idle: usize,

	/// Registries allocated up front
	#[serde(default)]
	pub prewarm: usize,
}

impl Default for PoolSettings {
	fn default() -> Self {
		Self {
			max_idle: default_max_idle(),
			prewarm: 0,
		}
	}
}

/// Response rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSettings {
	#[serde(default)]
	pub indent_json: bool,

	#[serde(default = "default_json_content_type")]
	pub json_content_type: String,
}

impl Default for RenderSettings {
	fn default() -> Self {
		Self {
			indent_json: false,
			json_content_type: default_json_content_type(),
		}
	}
}

fn default_max_idle() -> usize {
	DEFAULT_MAX_IDLE
}

fn default_json_content_type() -> String {
	"application/json; charset=utf-8".to_string()
}

impl BindingSettings {
	/// Parse and validate settings from a TOML document.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_dispatch::BindingSettings;
	///
	/// let settings = BindingSettings::from_toml_str("[pool]\nprewarm = 4\n").unwrap();
	/// assert_eq!(settings.pool.prewarm, 4);
	/// assert_eq!(settings.pool.max_idle, 1024);
	/// assert!(!settings.render.indent_json);
	/// ```
	pub fn from_toml_str(contents: &str) -> Result<Self, SettingsError> {
		let settings: BindingSettings = toml::from_str(contents)
			.map_err(|e| SettingsError::ParseError(format!("TOML parse error: {}", e)))?;
		settings.validate()?;
		Ok(settings)
	}

	/// Load settings from a TOML file.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let path = path.as_ref();
		let contents = std::fs::read_to_string(path).map_err(|e| {
			SettingsError::FileError(format!("Failed to read {}: {}", path.display(), e))
		})?;
		Self::from_toml_str(&contents)
	}

	pub fn validate(&self) -> Result<(), SettingsError> {
		if HeaderValue::from_str(&self.render.json_content_type).is_err() {
			return Err(SettingsError::ValidationError(format!(
				"render.json_content_type is not a valid header value: {:?}",
				self.render.json_content_type
			)));
		}
		if self.pool.prewarm > self.pool.max_idle {
			tracing::warn!(
				"pool.prewarm ({}) exceeds pool.max_idle ({}); only {} registries will be kept",
				self.pool.prewarm,
				self.pool.max_idle,
				self.pool.max_idle
			);
		}
		Ok(())
	}

	/// Build a dedicated, prewarmed pool.
	pub fn build_pool(&self) -> Arc<ScopePool> {
		let pool = Arc::new(ScopePool::new(self.pool.max_idle));
		pool.prewarm(self.pool.prewarm);
		pool
	}

	pub fn render_options(&self) -> RenderOptions {
		RenderOptions {
			indent_json: self.render.indent_json,
			json_content_type: self.render.json_content_type.clone(),
			..RenderOptions::default()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::io::Write;

	#[test]
	fn test_empty_document_uses_defaults() {
		let settings = BindingSettings::from_toml_str("").unwrap();
		assert_eq!(settings, BindingSettings::default());
		assert_eq!(
			settings.render.json_content_type,
			"application/json; charset=utf-8"
		);
	}

	#[rstest]
	#[case::not_toml("[pool", "Parse error")]
	#[case::wrong_type("[pool]\nmax_idle = \"many\"", "Parse error")]
	#[case::bad_header("[render]\njson_content_type = \"a\\nb\"", "Validation error")]
	fn test_invalid_settings(#[case] contents: &str, #[case] expected: &str) {
		let err = BindingSettings::from_toml_str(contents).unwrap_err();
		assert!(err.to_string().starts_with(expected), "{err}");
	}

	#[test]
	fn test_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[pool]\nmax_idle = 4\nprewarm = 2\n\n[render]\nindent_json = true").unwrap();

		let settings = BindingSettings::from_file(file.path()).unwrap();
		let pool = settings.build_pool();

		assert_eq!(pool.max_idle(), 4);
		assert_eq!(pool.available(), 2);
		assert!(settings.render_options().indent_json);
	}

	#[test]
	fn test_missing_file() {
		let err = BindingSettings::from_file("/nonexistent/binding.toml").unwrap_err();
		assert!(matches!(err, SettingsError::FileError(_)));
	}
}
