//! Navigation logging middleware.

use crate::error::NavigationError;
use crate::transition::{Next, Transition};
use async_trait::async_trait;
use std::time::Instant;
use waymark_pipeline::Middleware;

/// Logging middleware
/// Logs each navigation with its source, target, type and duration
#[derive(Debug, Clone, Copy)]
pub struct LoggingMiddleware;

impl LoggingMiddleware {
	/// Create a new logging middleware
	///
	/// Register it first to time the whole chain.
	///
	/// # Examples
	///
	/// ```
	/// use waymark_navigation::{LoggingMiddleware, Router};
	/// use waymark_routes::RouteDefinition;
	///
	/// let router = Router::new(&[RouteDefinition::new("home", "/")], Default::default()).unwrap();
	/// router.use_middleware(|_| LoggingMiddleware::new());
	/// assert_eq!(router.middleware_count(), 1);
	/// // Logs: navigation from="-" to="home" kind=push elapsed_ms=0
	/// ```
	pub fn new() -> Self {
		Self
	}
}

impl Default for LoggingMiddleware {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl Middleware<Transition, (), NavigationError> for LoggingMiddleware {
	async fn handle(&self, transition: &Transition, next: Next<'_>) -> Result<(), NavigationError> {
		let start = Instant::now();
		let from = transition
			.from()
			.map(|route| route.name().to_string())
			.unwrap_or_else(|| "-".to_string());

		let result = next.run().await;

		let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
		match &result {
			Ok(()) => {
				tracing::info!(
					from = %from,
					to = %transition.to().name(),
					kind = %transition.kind(),
					elapsed_ms,
					"navigation"
				);
			}
			Err(err) => {
				tracing::warn!(
					from = %from,
					to = %transition.to().name(),
					kind = %transition.kind(),
					elapsed_ms,
					error = %err,
					"navigation rejected"
				);
			}
		}

		result
	}
}
