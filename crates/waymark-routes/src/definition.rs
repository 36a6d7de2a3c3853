//! Route definitions and the tree compiler.

use crate::error::RouteError;
use crate::pattern::{Key, PathPattern};
use crate::route::RouteConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An author-supplied node of the route tree.
///
/// Definitions deserialize from documents such as
/// `{ "name": "blog", "path": "/blog", "children": [...] }`; `children` and
/// `config` default to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteDefinition {
	/// Path template relative to the parent.
	pub path: String,
	/// Local name, unique among siblings.
	pub name: String,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub children: Vec<RouteDefinition>,
	#[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
	pub config: RouteConfig,
}

impl RouteDefinition {
	pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			name: name.into(),
			children: Vec::new(),
			config: RouteConfig::new(),
		}
	}

	/// Appends a child definition using builder pattern.
	pub fn with_child(mut self, child: RouteDefinition) -> Self {
		self.children.push(child);
		self
	}

	pub fn with_children(mut self, children: Vec<RouteDefinition>) -> Self {
		self.children = children;
		self
	}

	pub fn with_config(mut self, config: RouteConfig) -> Self {
		self.config = config;
		self
	}
}

/// A compiled route definition.
///
/// `pattern` is compiled from the cumulative template (every ancestor's path
/// followed by this node's own), so it matches full pathnames.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRouteDefinition {
	path: String,
	name: String,
	config: RouteConfig,
	pattern: PathPattern,
	children: Vec<ParsedRouteDefinition>,
}

impl ParsedRouteDefinition {
	/// Local path template as written in the definition.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Cumulative path template.
	pub fn full_path(&self) -> &str {
		self.pattern.template()
	}

	/// Local name.
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn config(&self) -> &RouteConfig {
		&self.config
	}

	/// Parameters of the cumulative template, in declaration order.
	pub fn keys(&self) -> &[Key] {
		self.pattern.keys()
	}

	pub fn pattern(&self) -> &PathPattern {
		&self.pattern
	}

	pub fn children(&self) -> &[ParsedRouteDefinition] {
		&self.children
	}
}

/// A node of the flattened tree with its fully-qualified name.
#[derive(Debug, Clone)]
pub struct FlatRoute<'a> {
	name: String,
	definition: &'a ParsedRouteDefinition,
}

impl<'a> FlatRoute<'a> {
	/// Fully-qualified name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Cumulative path template.
	pub fn path(&self) -> &'a str {
		self.definition.full_path()
	}

	pub fn definition(&self) -> &'a ParsedRouteDefinition {
		self.definition
	}
}

/// Compiles definitions into a tree of [`ParsedRouteDefinition`].
///
/// Duplicate sibling names are logged and kept; lookups pick the first one
/// in declaration order.
///
/// # Errors
///
/// Returns [`RouteError::InvalidPattern`] for the first template that fails to
/// compile.
pub fn compile(definitions: &[RouteDefinition]) -> Result<Vec<ParsedRouteDefinition>, RouteError> {
	compile_scope(definitions, "")
}

fn compile_scope(
	definitions: &[RouteDefinition],
	prefix: &str,
) -> Result<Vec<ParsedRouteDefinition>, RouteError> {
	let mut seen = HashSet::new();
	for definition in definitions {
		if !seen.insert(definition.name.as_str()) {
			tracing::warn!(
				name = %definition.name,
				prefix = %prefix,
				"duplicate sibling route name; the first declaration wins"
			);
		}
	}

	definitions
		.iter()
		.map(|definition| compile_definition(definition, prefix))
		.collect()
}

fn compile_definition(
	definition: &RouteDefinition,
	prefix: &str,
) -> Result<ParsedRouteDefinition, RouteError> {
	let full_path = format!("{}{}", prefix, definition.path);
	let pattern = PathPattern::new(&full_path)?;
	let children = compile_scope(&definition.children, &full_path)?;

	Ok(ParsedRouteDefinition {
		path: definition.path.clone(),
		name: definition.name.clone(),
		config: definition.config.clone(),
		pattern,
		children,
	})
}

/// Lists every node in pre-order, parents before children, with
/// fully-qualified names joined by `delimiter`.
///
/// The list is rebuilt on every call.
pub fn flatten<'a>(routes: &'a [ParsedRouteDefinition], delimiter: &str) -> Vec<FlatRoute<'a>> {
	let mut flat = Vec::new();
	flatten_into(routes, "", delimiter, &mut flat);
	flat
}

fn flatten_into<'a>(
	routes: &'a [ParsedRouteDefinition],
	parent_name: &str,
	delimiter: &str,
	flat: &mut Vec<FlatRoute<'a>>,
) {
	for route in routes {
		let name = if parent_name.is_empty() {
			route.name.clone()
		} else {
			format!("{}{}{}", parent_name, delimiter, route.name)
		};
		flat.push(FlatRoute {
			name: name.clone(),
			definition: route,
		});
		flatten_into(&route.children, &name, delimiter, flat);
	}
}
