//! Resolution of route names and hrefs against a compiled tree.

use crate::definition::{self, FlatRoute, ParsedRouteDefinition, RouteDefinition};
use crate::error::RouteError;
use crate::route::{self, ParamValue, Query, Route, RouteParams};
use serde_json::Value;

/// Delimiter joining local names into fully-qualified names.
pub const DEFAULT_NAME_DELIMITER: &str = ".";

/// Options for [`RouteTree::find_route`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
	pub params: RouteParams,
	pub query: Query,
	pub state: Option<Value>,
	/// Literal path used instead of generating one from `params`.
	pub path: Option<String>,
	/// Fail instead of returning `None`.
	pub strict: bool,
}

impl FindOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn strict() -> Self {
		Self {
			strict: true,
			..Self::default()
		}
	}

	pub fn with_params(mut self, params: RouteParams) -> Self {
		self.params = params;
		self
	}

	/// Adds a single parameter.
	pub fn with_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
		self.params.insert(name.into(), value.into());
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

	pub fn with_path(mut self, path: impl Into<String>) -> Self {
		self.path = Some(path.into());
		self
	}
}

/// A compiled route tree with its name delimiter.
///
/// # Examples
///
/// ```
/// use waymark_routes::{RouteDefinition, RouteTree};
///
/// let tree = RouteTree::compile(
/// 	&[RouteDefinition::new("blog", "/blog")
/// 		.with_child(RouteDefinition::new("article", "/:slug"))],
/// 	".",
/// )
/// .unwrap();
///
/// let route = tree.match_path("/blog/wow?a=1").unwrap();
/// assert_eq!(route.name(), "blog.article");
/// assert_eq!(route.query()["a"], "1");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RouteTree {
	routes: Vec<ParsedRouteDefinition>,
	delimiter: String,
}

impl RouteTree {
	/// Compiles `definitions`.
	///
	/// # Errors
	///
	/// - [`RouteError::EmptyDelimiter`] when `delimiter` is empty
	/// - [`RouteError::InvalidPattern`] when a path template does not compile
	pub fn compile(definitions: &[RouteDefinition], delimiter: impl Into<String>) -> Result<Self, RouteError> {
		let delimiter = delimiter.into();
		if delimiter.is_empty() {
			return Err(RouteError::EmptyDelimiter);
		}
		let routes = definition::compile(definitions)?;
		let tree = Self { routes, delimiter };
		tracing::debug!(
			routes = tree.flatten().len(),
			delimiter = %tree.delimiter,
			"compiled route tree"
		);
		Ok(tree)
	}

	/// Top-level compiled routes.
	pub fn routes(&self) -> &[ParsedRouteDefinition] {
		&self.routes
	}

	pub fn delimiter(&self) -> &str {
		&self.delimiter
	}

	/// Builds the pre-order list of every node.
	pub fn flatten(&self) -> Vec<FlatRoute<'_>> {
		definition::flatten(&self.routes, &self.delimiter)
	}

	fn segments<'n>(&self, name: &'n str) -> Vec<&'n str> {
		name.split(self.delimiter.as_str()).collect()
	}

	/// Walks the tree by name segments.
	fn lookup(&self, name: &str) -> Option<&ParsedRouteDefinition> {
		let mut scope = self.routes.as_slice();
		let mut found = None;

		for segment in self.segments(name) {
			let node = scope.iter().find(|route| route.name() == segment)?;
			scope = node.children();
			found = Some(node);
		}

		found
	}

	/// Returns whether a route with the fully-qualified `name` exists.
	pub fn has_route(&self, name: &str) -> bool {
		self.lookup(name).is_some()
	}

	/// Resolves a fully-qualified name into a [`Route`].
	///
	/// Unknown names and parameters that do not fit the template yield
	/// `Ok(None)`, or an error when `options.strict` is set.
	///
	/// # Errors
	///
	/// - [`RouteError::UnknownRoute`] when a name segment is not found
	/// - [`RouteError::IllegalParams`] when path generation fails
	pub fn find_route(&self, name: &str, options: &FindOptions) -> Result<Option<Route>, RouteError> {
		let Some(node) = self.lookup(name) else {
			if options.strict {
				return Err(RouteError::UnknownRoute(name.to_string()));
			}
			return Ok(None);
		};

		let path = match &options.path {
			Some(path) => path.clone(),
			None => match node.pattern().generate(&options.params) {
				Ok(path) => path,
				Err(err) if options.strict => return Err(err),
				Err(err) => {
					tracing::debug!(name = %name, error = %err, "route parameters rejected");
					return Ok(None);
				}
			},
		};

		Ok(Some(
			Route::new(name, path)
				.with_params(options.params.clone())
				.with_query(options.query.clone())
				.with_state(options.state.clone())
				.with_config(node.config().clone()),
		))
	}

	/// Finds the first route, in pre-order, whose template matches the
	/// pathname of `href`.
	///
	/// Parameters are taken from the capture groups in key order; absent
	/// optional parameters are left out.
	pub fn match_path(&self, href: &str) -> Option<Route> {
		let (pathname, query) = route::parse_href(href).ok()?;
		self.flatten().into_iter().find_map(|candidate| {
			let captures = candidate.definition().pattern().captures(&pathname)?;
			let params = candidate
				.definition()
				.keys()
				.iter()
				.zip(captures)
				.filter_map(|(key, value)| Some((key.name.clone(), ParamValue::Text(value?))))
				.collect();

			Some(
				Route::new(candidate.name(), pathname.clone())
					.with_params(params)
					.with_query(query.clone())
					.with_config(candidate.definition().config().clone()),
			)
		})
	}

	/// Returns the parent node of the route named `name`, if any.
	pub fn parent_route(&self, name: &str) -> Option<FlatRoute<'_>> {
		let mut segments = self.segments(name);
		segments.pop();
		if segments.is_empty() {
			return None;
		}
		let parent_name = segments.join(self.delimiter.as_str());

		self.flatten()
			.into_iter()
			.find(|route| route.name() == parent_name)
	}

	/// Narrows `params` to the keys declared by `ancestor`.
	pub fn ancestor_params(ancestor: &ParsedRouteDefinition, params: &RouteParams) -> RouteParams {
		ancestor
			.keys()
			.iter()
			.filter_map(|key| {
				params
					.get(&key.name)
					.map(|value| (key.name.clone(), value.clone()))
			})
			.collect()
	}

	/// Returns `leaf` followed by each of its ancestors, leaf to root.
	///
	/// Ancestors are resolved by name with their own subset of the leaf's
	/// params, an empty query and no state.
	pub fn active_routes(&self, leaf: &Route) -> Vec<Route> {
		let mut routes = vec![leaf.clone()];
		let mut name = leaf.name().to_string();

		while let Some(parent) = self.parent_route(&name) {
			let options = FindOptions::new()
				.with_params(Self::ancestor_params(parent.definition(), leaf.params()));
			let Ok(Some(route)) = self.find_route(parent.name(), &options) else {
				break;
			};
			name = parent.name().to_string();
			routes.push(route);
		}

		routes
	}
}
