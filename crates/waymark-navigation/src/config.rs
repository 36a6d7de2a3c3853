//! Router configuration.
//!
//! Settings are plain serde structures. A whole router (navigator options plus
//! the route tree) can be loaded from TOML or JSON:
//!
//! ```toml
//! [navigator]
//! name_delimiter = "."
//! max_follow_ups = 8
//!
//! [[routes]]
//! name = "home"
//! path = "/"
//!
//! [[routes]]
//! name = "blog"
//! path = "/blog"
//!
//! [[routes.children]]
//! name = "article"
//! path = "/:slug"
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use waymark_routes::{DEFAULT_NAME_DELIMITER, RouteDefinition};

/// Errors raised while loading settings.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
	/// The TOML document could not be parsed.
	#[error("Failed to parse TOML settings: {0}")]
	Toml(#[from] toml::de::Error),

	/// The JSON document could not be parsed.
	#[error("Failed to parse JSON settings: {0}")]
	Json(#[from] serde_json::Error),

	/// The name delimiter is empty.
	#[error("Route name delimiter must not be empty")]
	EmptyDelimiter,
}

/// Navigator options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
	/// Joins local route names into fully-qualified names.
	pub name_delimiter: String,
	/// Maximum number of error-driven follow-up navigations per call.
	/// `None` leaves follow-up chains unbounded.
	pub max_follow_ups: Option<usize>,
}

impl Default for NavigatorConfig {
	fn default() -> Self {
		Self {
			name_delimiter: DEFAULT_NAME_DELIMITER.to_string(),
			max_follow_ups: None,
		}
	}
}

impl NavigatorConfig {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the name delimiter.
	///
	/// # Examples
	///
	/// ```
	/// use waymark_navigation::NavigatorConfig;
	///
	/// let config = NavigatorConfig::new()
	/// 	.with_name_delimiter("/")
	/// 	.with_max_follow_ups(4);
	/// assert_eq!(config.name_delimiter, "/");
	/// assert_eq!(config.max_follow_ups, Some(4));
	/// ```
	pub fn with_name_delimiter(mut self, delimiter: impl Into<String>) -> Self {
		self.name_delimiter = delimiter.into();
		self
	}

	pub fn with_max_follow_ups(mut self, limit: usize) -> Self {
		self.max_follow_ups = Some(limit);
		self
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.name_delimiter.is_empty() {
			return Err(ConfigError::EmptyDelimiter);
		}
		Ok(())
	}
}

/// Everything needed to build a [`crate::Router`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterSettings {
	pub navigator: NavigatorConfig,
	pub routes: Vec<RouteDefinition>,
}

impl RouterSettings {
	pub fn new(routes: Vec<RouteDefinition>) -> Self {
		Self {
			navigator: NavigatorConfig::default(),
			routes,
		}
	}

	pub fn with_navigator(mut self, navigator: NavigatorConfig) -> Self {
		self.navigator = navigator;
		self
	}

	/// Parses and validates a TOML document.
	pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
		let settings: Self = toml::from_str(source)?;
		settings.navigator.validate()?;
		Ok(settings)
	}

	/// Parses and validates a JSON document.
	pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
		let settings: Self = serde_json::from_str(source)?;
		settings.navigator.validate()?;
		Ok(settings)
	}
}
