//! # Waymark Navigation
//!
//! The navigation state machine of waymark.
//!
//! A [`Router`] drives every navigation through the same steps:
//!
//! 1. resolve the target strictly (a resolution failure rejects immediately)
//! 2. skip everything when the target equals the current route, unless forced
//! 3. emit [`RouteEvent::Start`], run the middleware pipeline, emit
//!    [`RouteEvent::Progress`] once the whole chain has completed
//! 4. commit to the [`HistoryStack`] by push, replace or pop and emit
//!    [`RouteEvent::Finish`]
//! 5. when a middleware raised a recoverable [`waymark_routes::RoutingError`] naming a route or
//!    a path, follow up with a `replace` navigation
//!
//! Middleware implement [`waymark_pipeline::Middleware`] over a [`Transition`]
//! and are registered through a factory receiving a [`RouterHandle`]:
//!
//! ```
//! use async_trait::async_trait;
//! use waymark_navigation::{NavigationError, Next, PathOptions, Router, Transition};
//! use waymark_pipeline::Middleware;
//! use waymark_routes::{RouteDefinition, RoutingError};
//!
//! struct RequireLogin;
//!
//! #[async_trait]
//! impl Middleware<Transition, (), NavigationError> for RequireLogin {
//! 	async fn handle(&self, transition: &Transition, next: Next<'_>) -> Result<(), NavigationError> {
//! 		if transition.to().name() == "account" {
//! 			return next.abort(RoutingError::redirect("login first", "login").into());
//! 		}
//! 		next.run().await
//! 	}
//! }
//!
//! # tokio_test::block_on(async {
//! let router = Router::new(
//! 	&[
//! 		RouteDefinition::new("login", "/login"),
//! 		RouteDefinition::new("account", "/account"),
//! 	],
//! 	Default::default(),
//! )
//! .unwrap();
//! router.use_middleware(|_| RequireLogin);
//!
//! let route = router.navigate_to_path("/account", PathOptions::new()).await.unwrap();
//! assert_eq!(route.name(), "login");
//! assert_eq!(route.error().map(RoutingError::code), Some(302));
//! # });
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod handle;
pub mod history;
pub mod logging;
pub mod router;
pub mod transition;

pub use config::{ConfigError, NavigatorConfig, RouterSettings};
pub use error::NavigationError;
pub use events::{EventRegistry, ListenerFn, RouteEvent, Unsubscribe};
pub use handle::RouterHandle;
pub use history::{HistoryStack, NavigationType};
pub use logging::LoggingMiddleware;
pub use router::{NavigationMiddleware, NavigationPipeline, Router};
pub use transition::{NavigateOptions, NavigationTarget, Next, PathOptions, Transition, TransitionOptions};
