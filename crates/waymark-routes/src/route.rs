//! The resolved route value.

use crate::error::{RouteError, RoutingError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

/// Base used to resolve relative hrefs; only the path and query survive.
const HREF_BASE: &str = "http://localhost/";

/// Opaque per-route configuration, copied from the definition.
pub type RouteConfig = serde_json::Map<String, Value>;

/// Parameter values keyed by parameter name.
pub type RouteParams = BTreeMap<String, ParamValue>;

/// Query values keyed by query key.
pub type Query = BTreeMap<String, String>;

/// A path parameter value.
///
/// Text and integers are distinct: `"1"` and `1` are not equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
	Integer(i64),
	Text(String),
}

impl ParamValue {
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Text(text) => Some(text),
			Self::Integer(_) => None,
		}
	}

	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Self::Integer(value) => Some(*value),
			Self::Text(_) => None,
		}
	}
}

impl fmt::Display for ParamValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Text(text) => f.write_str(text),
			Self::Integer(value) => write!(f, "{}", value),
		}
	}
}

impl From<&str> for ParamValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl From<String> for ParamValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl From<i64> for ParamValue {
	fn from(value: i64) -> Self {
		Self::Integer(value)
	}
}

impl From<i32> for ParamValue {
	fn from(value: i32) -> Self {
		Self::Integer(i64::from(value))
	}
}

impl From<u32> for ParamValue {
	fn from(value: u32) -> Self {
		Self::Integer(i64::from(value))
	}
}

/// A resolved navigation target or a committed position in the history.
///
/// Routes are plain values. Once committed they are shared behind an `Arc`
/// and never modified; the builder methods below always produce a new value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
	name: String,
	path: String,
	#[serde(default)]
	params: RouteParams,
	#[serde(default)]
	query: Query,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	state: Option<Value>,
	#[serde(default)]
	config: RouteConfig,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	error: Option<RoutingError>,
}

impl Route {
	/// Creates a route with empty params, query and config.
	pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			path: path.into(),
			..Self::default()
		}
	}

	/// Fully-qualified, delimiter-joined name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Path with parameters substituted.
	pub fn path(&self) -> &str {
		&self.path
	}

	pub fn params(&self) -> &RouteParams {
		&self.params
	}

	/// Returns a single parameter.
	pub fn param(&self, name: &str) -> Option<&ParamValue> {
		self.params.get(name)
	}

	pub fn query(&self) -> &Query {
		&self.query
	}

	pub fn state(&self) -> Option<&Value> {
		self.state.as_ref()
	}

	pub fn config(&self) -> &RouteConfig {
		&self.config
	}

	/// The recoverable error that interrupted the transition into this route.
	pub fn error(&self) -> Option<&RoutingError> {
		self.error.as_ref()
	}

	pub fn with_path(mut self, path: impl Into<String>) -> Self {
		self.path = path.into();
		self
	}

	pub fn with_params(mut self, params: RouteParams) -> Self {
		self.params = params;
		self
	}

	pub fn with_query(mut self, query: Query) -> Self {
		self.query = query;
		self
	}

	pub fn with_state(mut self, state: Option<Value>) -> Self {
		self.state = state;
		self
	}

	pub fn with_config(mut self, config: RouteConfig) -> Self {
		self.config = config;
		self
	}

	pub fn with_error(mut self, error: Option<RoutingError>) -> Self {
		self.error = error;
		self
	}

	/// Renders `path?query`, or just the path when the query is empty.
	///
	/// # Examples
	///
	/// ```
	/// use waymark_routes::{Query, Route};
	///
	/// let mut query = Query::new();
	/// query.insert("a".to_string(), "1 2".to_string());
	/// let route = Route::new("blog", "/blog").with_query(query);
	/// assert_eq!(route.href(), "/blog?a=1+2");
	/// ```
	pub fn href(&self) -> String {
		match serde_urlencoded::to_string(&self.query) {
			Ok(query) if !query.is_empty() => format!("{}?{}", self.path, query),
			_ => self.path.clone(),
		}
	}
}

/// Structural route equality: same name, params and query.
///
/// State, config, path and error are ignored.
pub fn routes_equal(a: &Route, b: &Route) -> bool {
	a.name == b.name && a.params == b.params && a.query == b.query
}

/// Splits an href into its pathname and decoded query.
///
/// Relative hrefs are resolved against the root. A key repeated in the query
/// keeps its last value.
///
/// # Errors
///
/// Returns [`RouteError::UnregisteredPath`] when `href` cannot be parsed.
pub fn parse_href(href: &str) -> Result<(String, Query), RouteError> {
	let base = Url::parse(HREF_BASE).map_err(|_| RouteError::UnregisteredPath(href.to_string()))?;
	let url = base
		.join(href)
		.map_err(|_| RouteError::UnregisteredPath(href.to_string()))?;

	let query = url
		.query_pairs()
		.map(|(key, value)| (key.into_owned(), value.into_owned()))
		.collect();

	Ok((url.path().to_string(), query))
}
