//! # Waymark
//!
//! A navigation engine for single-page applications.
//!
//! Waymark turns a declarative tree of named, path-templated routes into a
//! navigable application state:
//!
//! - **Routes** ([`waymark_routes`]): route trees compiled from
//!   [`RouteDefinition`]s, resolution by fully-qualified name or by href, and
//!   the immutable [`Route`] value
//! - **Pipeline** ([`waymark_pipeline`]): the onion middleware composer with
//!   call-next-once and abort semantics
//! - **Navigation** ([`waymark_navigation`]): the [`Router`] state machine, its
//!   history stack and lifecycle events
//!
//! ## Quick Start
//!
//! ```
//! use waymark::prelude::*;
//!
//! # tokio_test::block_on(async {
//! let router = Router::new(
//! 	&[
//! 		RouteDefinition::new("home", "/"),
//! 		RouteDefinition::new("blog", "/blog")
//! 			.with_child(RouteDefinition::new("article", "/:slug")),
//! 	],
//! 	NavigatorConfig::default(),
//! )
//! .unwrap();
//! router.use_middleware(|_| LoggingMiddleware::new());
//!
//! let current = router
//! 	.navigate_to_path("/blog/wow?a=1", PathOptions::new())
//! 	.await
//! 	.unwrap();
//!
//! assert_eq!(current.name(), "blog.article");
//! assert_eq!(current.param("slug"), Some(&ParamValue::from("wow")));
//!
//! let names: Vec<String> = router
//! 	.get_active_routes()
//! 	.iter()
//! 	.map(|route| route.name().to_string())
//! 	.collect();
//! assert_eq!(names, ["blog.article", "blog"]);
//! # });
//! ```
//!
//! ## Loading Settings
//!
//! Routers can be built from TOML or JSON documents through
//! [`RouterSettings`]:
//!
//! ```
//! use waymark::prelude::*;
//!
//! let settings = RouterSettings::from_toml_str(
//! 	r#"
//! [[routes]]
//! name = "home"
//! path = "/"
//! "#,
//! )
//! .unwrap();
//! let router = Router::from_settings(&settings).unwrap();
//! assert!(router.routes().has_route("home"));
//! ```

pub use waymark_navigation as navigation;
pub use waymark_pipeline as pipeline;
pub use waymark_routes as routes;

pub use waymark_navigation::{
	ConfigError, EventRegistry, HistoryStack, LoggingMiddleware, NavigateOptions, NavigationError,
	NavigationMiddleware, NavigationTarget, NavigationType, NavigatorConfig, Next, PathOptions,
	RouteEvent, Router, RouterHandle, RouterSettings, Transition, TransitionOptions, Unsubscribe,
};
pub use waymark_pipeline::{InvalidNextInvocation, Middleware, Pipeline};
pub use waymark_routes::{
	FindOptions, ParamValue, PathPattern, Query, RedirectMeta, Route, RouteConfig, RouteDefinition,
	RouteError, RouteParams, RouteTree, RoutingError, RoutingErrorKind, parse_href, routes_equal,
};

/// Re-exports for building routers and writing middleware.
pub mod prelude {
	pub use crate::{
		FindOptions, LoggingMiddleware, Middleware, NavigateOptions, NavigationError,
		NavigationTarget, NavigationType, NavigatorConfig, Next, ParamValue, PathOptions, Query,
		Route, RouteDefinition, RouteError, RouteEvent, RouteParams, Router, RouterHandle,
		RouterSettings, RoutingError, Transition, TransitionOptions,
	};

	pub use async_trait::async_trait;
}
