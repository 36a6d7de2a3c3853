//! The per-navigation payload and navigation options.

use crate::error::NavigationError;
use crate::history::NavigationType;
use serde_json::Value;
use std::sync::Arc;
use waymark_routes::{Query, Route, RouteParams};

/// Payload threaded through the middleware pipeline and every listener of
/// one navigation attempt.
///
/// Handlers only ever see it by reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
	pub(crate) from: Option<Arc<Route>>,
	pub(crate) to: Route,
	pub(crate) kind: NavigationType,
	pub(crate) context: Option<Value>,
	pub(crate) token: u64,
}

impl Transition {
	/// The current route when the attempt started.
	pub fn from(&self) -> Option<&Arc<Route>> {
		self.from.as_ref()
	}

	/// The target route.
	pub fn to(&self) -> &Route {
		&self.to
	}

	pub fn kind(&self) -> NavigationType {
		self.kind
	}

	/// Caller context, never stored on a route.
	pub fn context(&self) -> Option<&Value> {
		self.context.as_ref()
	}

	/// Navigation token of this attempt.
	pub fn token(&self) -> u64 {
		self.token
	}
}

/// Continuation handed to navigation middleware.
pub type Next<'a> = waymark_pipeline::Next<'a, Transition, (), NavigationError>;

/// What to navigate to.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationTarget {
	/// A fully-qualified route name, resolved strictly.
	Name(String),
	/// An already resolved route, used as-is.
	Route(Arc<Route>),
}

impl From<&str> for NavigationTarget {
	fn from(name: &str) -> Self {
		Self::Name(name.to_string())
	}
}

impl From<String> for NavigationTarget {
	fn from(name: String) -> Self {
		Self::Name(name)
	}
}

impl From<Route> for NavigationTarget {
	fn from(route: Route) -> Self {
		Self::Route(Arc::new(route))
	}
}

impl From<Arc<Route>> for NavigationTarget {
	fn from(route: Arc<Route>) -> Self {
		Self::Route(route)
	}
}

/// Route-level options of [`crate::Router::navigate_to_route`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigateOptions {
	pub params: RouteParams,
	pub query: Query,
	pub state: Option<Value>,
	/// Literal path replacing the generated one.
	pub path: Option<String>,
	pub context: Option<Value>,
}

impl NavigateOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_params(mut self, params: RouteParams) -> Self {
		self.params = params;
		self
	}

	/// Adds a single parameter.
	pub fn with_param(
		mut self,
		name: impl Into<String>,
		value: impl Into<waymark_routes::ParamValue>,
	) -> Self {
		self.params.insert(name.into(), value.into());
		self
	}

	pub fn with_query(mut self, query: Query) -> Self {
		self.query = query;
		self
	}

	pub fn with_state(mut self, state: Value) -> Self {
		self.state = Some(state);
		self
	}

	pub fn with_path(mut self, path: impl Into<String>) -> Self {
		self.path = Some(path.into());
		self
	}

	pub fn with_context(mut self, context: Value) -> Self {
		self.context = Some(context);
		self
	}
}

/// Commit-level options of [`crate::Router::navigate_to_route`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransitionOptions {
	pub kind: NavigationType,
	/// Run the pipeline even when the target equals the current route.
	pub force: bool,
}

impl TransitionOptions {
	pub fn push() -> Self {
		Self::default()
	}

	pub fn replace() -> Self {
		Self {
			kind: NavigationType::Replace,
			force: false,
		}
	}

	pub fn pop() -> Self {
		Self {
			kind: NavigationType::Pop,
			force: false,
		}
	}

	pub fn forced(mut self) -> Self {
		self.force = true;
		self
	}
}

/// Options of [`crate::Router::navigate_to_path`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathOptions {
	pub kind: NavigationType,
	pub state: Option<Value>,
	pub context: Option<Value>,
}

impl PathOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_kind(mut self, kind: NavigationType) -> Self {
		self.kind = kind;
		self
	}

	pub fn with_state(mut self, state: Value) -> Self {
		self.state = Some(state);
		self
	}

	pub fn with_context(mut self, context: Value) -> Self {
		self.context = Some(context);
		self
	}
}
