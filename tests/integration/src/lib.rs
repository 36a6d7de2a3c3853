//! Shared fixtures for the waymark integration tests.
//!
//! Route trees used across scenarios and a handful of middleware that record,
//! redirect or fail navigations.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;
use waymark::prelude::*;

/// `home`, `blog` and `blog.article` (`/blog/:slug`).
pub fn blog_routes() -> Vec<RouteDefinition> {
	vec![
		RouteDefinition::new("home", "/"),
		RouteDefinition::new("blog", "/blog").with_child(RouteDefinition::new("article", "/:slug")),
	]
}

/// `home`, a constrained `some` route and a catch-all `404`.
pub fn section_routes() -> Vec<RouteDefinition> {
	vec![
		RouteDefinition::new("home", "/"),
		RouteDefinition::new("some", "/:section(a|b|c)/:tag"),
		RouteDefinition::new("404", "/(.*)"),
	]
}

/// Builds a router with the default configuration.
pub fn router(definitions: &[RouteDefinition]) -> Router {
	match Router::new(definitions, NavigatorConfig::default()) {
		Ok(router) => router,
		Err(err) => panic!("fixture routes failed to compile: {err}"),
	}
}

/// Where a [`Recorder`] takes its sample relative to `next`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordAt {
	BeforeNext,
	AfterNext,
}

/// Records `(label, tick)` pairs against a counter shared by every recorder of
/// a test.
#[derive(Debug, Clone, Default)]
pub struct Tape {
	counter: Arc<AtomicUsize>,
	entries: Arc<Mutex<Vec<(String, usize)>>>,
}

impl Tape {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn record(&self, label: &str) {
		let tick = self.counter.fetch_add(1, Ordering::SeqCst);
		self.entries.lock().push((label.to_string(), tick));
	}

	pub fn entries(&self) -> Vec<(String, usize)> {
		self.entries.lock().clone()
	}

	pub fn labels(&self) -> Vec<String> {
		self.entries.lock().iter().map(|(label, _)| label.clone()).collect()
	}
}

/// Middleware writing to a [`Tape`] before or after advancing.
pub struct Recorder {
	label: String,
	at: RecordAt,
	tape: Tape,
}

impl Recorder {
	pub fn new(label: &str, at: RecordAt, tape: &Tape) -> Self {
		Self {
			label: label.to_string(),
			at,
			tape: tape.clone(),
		}
	}
}

#[async_trait]
impl Middleware<Transition, (), NavigationError> for Recorder {
	async fn handle(&self, _transition: &Transition, next: Next<'_>) -> Result<(), NavigationError> {
		if self.at == RecordAt::BeforeNext {
			self.tape.record(&self.label);
		}
		next.run().await?;
		if self.at == RecordAt::AfterNext {
			self.tape.record(&self.label);
		}
		Ok(())
	}
}

/// Raises a redirect whenever the target is `from`.
pub struct RedirectOn {
	from: String,
	to: String,
}

impl RedirectOn {
	pub fn new(from: &str, to: &str) -> Self {
		Self {
			from: from.to_string(),
			to: to.to_string(),
		}
	}
}

#[async_trait]
impl Middleware<Transition, (), NavigationError> for RedirectOn {
	async fn handle(&self, transition: &Transition, next: Next<'_>) -> Result<(), NavigationError> {
		if transition.to().name() == self.from {
			return next.abort(RoutingError::redirect("moved", self.to.as_str()).into());
		}
		next.run().await
	}
}

/// Failure outside the recoverable routing taxonomy.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct GuardError(pub String);

/// Aborts every navigation with a [`GuardError`].
pub struct Reject {
	message: String,
}

impl Reject {
	pub fn new(message: &str) -> Self {
		Self {
			message: message.to_string(),
		}
	}
}

#[async_trait]
impl Middleware<Transition, (), NavigationError> for Reject {
	async fn handle(&self, _transition: &Transition, next: Next<'_>) -> Result<(), NavigationError> {
		next.abort(NavigationError::handler(GuardError(self.message.clone())))
	}
}

/// Advances twice.
pub struct DoubleNext;

#[async_trait]
impl Middleware<Transition, (), NavigationError> for DoubleNext {
	async fn handle(&self, _transition: &Transition, next: Next<'_>) -> Result<(), NavigationError> {
		next.run().await?;
		next.run().await
	}
}

/// Counts how many times the chain reached it.
#[derive(Debug, Clone, Default)]
pub struct Hits(Arc<AtomicUsize>);

impl Hits {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn count(&self) -> usize {
		self.0.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl Middleware<Transition, (), NavigationError> for Hits {
	async fn handle(&self, _transition: &Transition, next: Next<'_>) -> Result<(), NavigationError> {
		self.0.fetch_add(1, Ordering::SeqCst);
		next.run().await
	}
}

/// Subscribes to every lifecycle event and records `(event, route name)`.
pub fn record_events(router: &Router) -> (Arc<Mutex<Vec<(RouteEvent, String)>>>, Vec<waymark::Unsubscribe>) {
	let log = Arc::new(Mutex::new(Vec::new()));
	let subscriptions = [RouteEvent::Start, RouteEvent::Progress, RouteEvent::Finish]
		.into_iter()
		.map(|event| {
			let log = Arc::clone(&log);
			router.listen(event, move |transition| {
				log.lock().push((event, transition.to().name().to_string()));
			})
		})
		.collect();
	(log, subscriptions)
}
