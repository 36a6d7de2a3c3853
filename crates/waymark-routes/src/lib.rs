//! # Waymark Routes
//!
//! Route tree compilation and resolution.
//!
//! A tree of [`RouteDefinition`]s is compiled once into a [`RouteTree`]. Every
//! node's path template is compiled on its cumulative path (the concatenation
//! of its ancestors' templates and its own) into a [`PathPattern`], which both
//! matches full pathnames and generates paths from parameters.
//!
//! The tree resolves routes two ways:
//!
//! - by fully-qualified name ([`RouteTree::find_route`]), walking the tree one
//!   delimiter-separated segment at a time
//! - by href ([`RouteTree::match_path`]), scanning the flattened tree in
//!   pre-order and returning the first structural match
//!
//! ## Example
//!
//! ```
//! use waymark_routes::{FindOptions, RouteDefinition, RouteTree};
//!
//! let tree = RouteTree::compile(
//! 	&[
//! 		RouteDefinition::new("home", "/"),
//! 		RouteDefinition::new("blog", "/blog")
//! 			.with_child(RouteDefinition::new("article", "/:slug")),
//! 	],
//! 	".",
//! )
//! .unwrap();
//!
//! let route = tree
//! 	.find_route("blog.article", &FindOptions::strict().with_param("slug", "wow"))
//! 	.unwrap()
//! 	.unwrap();
//! assert_eq!(route.path(), "/blog/wow");
//! ```

pub mod definition;
pub mod error;
pub mod pattern;
pub mod resolver;
pub mod route;

pub use definition::{FlatRoute, ParsedRouteDefinition, RouteDefinition};
pub use error::{RedirectMeta, RouteError, RoutingError, RoutingErrorKind};
pub use pattern::{Key, Modifier, PathPattern};
pub use resolver::{DEFAULT_NAME_DELIMITER, FindOptions, RouteTree};
pub use route::{ParamValue, Query, Route, RouteConfig, RouteParams, parse_href, routes_equal};
