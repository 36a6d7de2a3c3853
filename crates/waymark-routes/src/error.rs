//! Error types for route resolution.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised while compiling or resolving routes.
///
/// None of these ever reach the history stack: they are reported before a
/// navigation touches the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RouteError {
	/// No route is registered under the given fully-qualified name.
	#[error("Route \"{0}\" does not exist")]
	UnknownRoute(String),

	/// The supplied parameters do not satisfy the route's path template.
	#[error("{0}")]
	IllegalParams(String),

	/// No registered route matches the given href.
	#[error("Path \"{0}\" does not match any existent route")]
	UnregisteredPath(String),

	/// A path template could not be compiled.
	#[error("Invalid path template \"{pattern}\": {reason}")]
	InvalidPattern {
		/// The offending template.
		pattern: String,
		/// Why compilation failed.
		reason: String,
	},

	/// The name delimiter is empty.
	#[error("Route name delimiter must not be empty")]
	EmptyDelimiter,
}

/// Kind of a recoverable routing error, each with its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingErrorKind {
	/// 404
	NotFound,
	/// 403
	Forbidden,
	/// 302
	Redirect,
	/// 500
	Internal,
}

impl RoutingErrorKind {
	/// Numeric code of this kind.
	pub fn code(self) -> u16 {
		match self {
			Self::NotFound => 404,
			Self::Forbidden => 403,
			Self::Redirect => 302,
			Self::Internal => 500,
		}
	}
}

impl fmt::Display for RoutingErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.code())
	}
}

/// Where a recoverable error wants the navigation to continue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectMeta {
	/// Fully-qualified name of the follow-up route.
	pub route: Option<String>,
	/// Literal path for a follow-up to the error-code route.
	pub path: Option<String>,
}

impl RedirectMeta {
	/// Returns whether neither a route nor a path is set.
	pub fn is_empty(&self) -> bool {
		self.route.is_none() && self.path.is_none()
	}
}

/// A recoverable routing error.
///
/// Raised by middleware to decorate the committed route instead of failing
/// the navigation. When [`RedirectMeta`] names a route or a path the navigator
/// follows up with a `replace` navigation.
///
/// # Examples
///
/// ```
/// use waymark_routes::{RoutingError, RoutingErrorKind};
///
/// let err = RoutingError::redirect("login first", "auth.login");
/// assert_eq!(err.kind(), RoutingErrorKind::Redirect);
/// assert_eq!(err.code(), 302);
/// assert_eq!(err.meta().route.as_deref(), Some("auth.login"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct RoutingError {
	kind: RoutingErrorKind,
	message: String,
	#[serde(default)]
	meta: RedirectMeta,
}

impl RoutingError {
	/// Creates an error of the given kind without redirect metadata.
	pub fn new(kind: RoutingErrorKind, message: impl Into<String>) -> Self {
		Self {
			kind,
			message: message.into(),
			meta: RedirectMeta::default(),
		}
	}

	/// Creates a 404 error.
	pub fn not_found(message: impl Into<String>) -> Self {
		Self::new(RoutingErrorKind::NotFound, message)
	}

	/// Creates a 403 error.
	pub fn forbidden(message: impl Into<String>) -> Self {
		Self::new(RoutingErrorKind::Forbidden, message)
	}

	/// Creates a 302 error targeting `route`.
	pub fn redirect(message: impl Into<String>, route: impl Into<String>) -> Self {
		Self::new(RoutingErrorKind::Redirect, message).with_route(route)
	}

	/// Creates a 500 error.
	pub fn internal(message: impl Into<String>) -> Self {
		Self::new(RoutingErrorKind::Internal, message)
	}

	/// Sets the follow-up route name.
	pub fn with_route(mut self, route: impl Into<String>) -> Self {
		self.meta.route = Some(route.into());
		self
	}

	/// Sets the follow-up literal path.
	pub fn with_path(mut self, path: impl Into<String>) -> Self {
		self.meta.path = Some(path.into());
		self
	}

	pub fn kind(&self) -> RoutingErrorKind {
		self.kind
	}

	pub fn code(&self) -> u16 {
		self.kind.code()
	}

	pub fn message(&self) -> &str {
		&self.message
	}

	pub fn meta(&self) -> &RedirectMeta {
		&self.meta
	}
}
