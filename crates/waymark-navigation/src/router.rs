//! The navigation state machine.

use crate::config::{NavigatorConfig, RouterSettings};
use crate::error::NavigationError;
use crate::events::{EventRegistry, RouteEvent, Unsubscribe};
use crate::handle::RouterHandle;
use crate::history::{HistoryStack, NavigationType};
use crate::transition::{NavigateOptions, NavigationTarget, PathOptions, Transition, TransitionOptions};
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use waymark_pipeline::{Middleware, Pipeline};
use waymark_routes::{
	FindOptions, ParsedRouteDefinition, Route, RouteDefinition, RouteError, RouteTree,
	RoutingError, routes_equal,
};

/// Pipeline type run for every navigation attempt.
pub type NavigationPipeline = Pipeline<Transition, (), NavigationError>;

/// A middleware registered on a [`Router`].
pub type NavigationMiddleware = Arc<dyn Middleware<Transition, (), NavigationError>>;

/// One pass through resolve, pipeline and commit.
#[derive(Debug)]
struct Attempt {
	target: NavigationTarget,
	options: NavigateOptions,
	transition: TransitionOptions,
	/// Recoverable error that caused this follow-up.
	carried: Option<RoutingError>,
}

enum Outcome {
	Settled(Arc<Route>),
	FollowUp(Attempt),
}

pub(crate) struct RouterInner {
	tree: RouteTree,
	config: NavigatorConfig,
	history: RwLock<HistoryStack>,
	pipeline: RwLock<NavigationPipeline>,
	events: EventRegistry,
	started: AtomicBool,
	token: AtomicU64,
}

/// A navigation engine over one compiled route tree.
///
/// The router owns the history stack, the middleware chain and the event
/// listeners. Navigations are not serialized: concurrent calls each run their
/// own pipeline and commit in the order they settle. Use
/// [`Transition::token`] against [`Router::navigation_token`] to detect stale
/// results.
///
/// # Examples
///
/// ```
/// use waymark_navigation::{PathOptions, Router};
/// use waymark_routes::RouteDefinition;
///
/// # tokio_test::block_on(async {
/// let router = Router::new(
/// 	&[
/// 		RouteDefinition::new("home", "/"),
/// 		RouteDefinition::new("blog", "/blog")
/// 			.with_child(RouteDefinition::new("article", "/:slug")),
/// 	],
/// 	Default::default(),
/// )
/// .unwrap();
///
/// let route = router
/// 	.navigate_to_path("/blog/wow?a=1", PathOptions::new())
/// 	.await
/// 	.unwrap();
/// assert_eq!(route.name(), "blog.article");
/// assert_eq!(router.get_active_routes().len(), 2);
/// # });
/// ```
pub struct Router {
	inner: Arc<RouterInner>,
}

impl Router {
	/// Compiles `definitions` into a new router.
	///
	/// # Errors
	///
	/// Returns [`RouteError::EmptyDelimiter`] when `config.name_delimiter` is
	/// empty and [`RouteError::InvalidPattern`] when a template does not compile.
	pub fn new(definitions: &[RouteDefinition], config: NavigatorConfig) -> Result<Self, RouteError> {
		let tree = RouteTree::compile(definitions, config.name_delimiter.clone())?;
		Ok(Self {
			inner: Arc::new(RouterInner {
				tree,
				config,
				history: RwLock::new(HistoryStack::new()),
				pipeline: RwLock::new(NavigationPipeline::new()),
				events: EventRegistry::new(),
				started: AtomicBool::new(false),
				token: AtomicU64::new(0),
			}),
		})
	}

	/// Builds a router from loaded settings.
	pub fn from_settings(settings: &RouterSettings) -> Result<Self, RouteError> {
		Self::new(&settings.routes, settings.navigator.clone())
	}

	pub fn config(&self) -> &NavigatorConfig {
		&self.inner.config
	}

	/// The compiled route tree.
	pub fn routes(&self) -> &RouteTree {
		&self.inner.tree
	}

	/// A weak capability handle for middleware.
	pub fn handle(&self) -> RouterHandle {
		RouterHandle::new(Arc::downgrade(&self.inner))
	}

	pub fn current_route(&self) -> Option<Arc<Route>> {
		self.inner.current_route()
	}

	pub fn previous_route(&self) -> Option<Arc<Route>> {
		self.inner.history.read().previous().cloned()
	}

	/// Whether any navigation has committed.
	pub fn is_started(&self) -> bool {
		self.inner.started.load(Ordering::Acquire)
	}

	/// Snapshot of the history stack, oldest first.
	pub fn history(&self) -> Vec<Arc<Route>> {
		self.inner.history.read().entries().to_vec()
	}

	/// Number of history entries.
	pub fn len(&self) -> usize {
		self.inner.history.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.history.read().is_empty()
	}

	/// Token of the latest navigation attempt that reached the pipeline.
	pub fn navigation_token(&self) -> u64 {
		self.inner.token.load(Ordering::Acquire)
	}

	/// See [`RouteTree::find_route`].
	pub fn find_route(&self, name: &str, options: &FindOptions) -> Result<Option<Route>, RouteError> {
		self.inner.tree.find_route(name, options)
	}

	/// See [`RouteTree::match_path`].
	pub fn match_path(&self, href: &str) -> Option<Route> {
		self.inner.tree.match_path(href)
	}

	/// Parent node of `route`.
	pub fn get_parent_route(&self, route: &Route) -> Option<&ParsedRouteDefinition> {
		self.inner
			.tree
			.parent_route(route.name())
			.map(|parent| parent.definition())
	}

	/// The current route followed by its ancestors, leaf to root.
	///
	/// Empty before the first commit.
	pub fn get_active_routes(&self) -> Vec<Route> {
		match self.current_route() {
			Some(current) => self.inner.tree.active_routes(&current),
			None => Vec::new(),
		}
	}

	/// Registers a middleware built by `factory`.
	///
	/// The factory receives a [`RouterHandle`] so the middleware can resolve and
	/// navigate on its own. Middleware added during a navigation applies from
	/// the next one.
	pub fn use_middleware<F, M>(&self, factory: F) -> &Self
	where
		F: FnOnce(RouterHandle) -> M,
		M: Middleware<Transition, (), NavigationError> + 'static,
	{
		let middleware: NavigationMiddleware = Arc::new(factory(self.handle()));
		self.inner.pipeline.write().add_middleware(middleware);
		self
	}

	/// Number of registered middleware.
	pub fn middleware_count(&self) -> usize {
		self.inner.pipeline.read().len()
	}

	/// Registers a listener for `event`.
	pub fn listen<F>(&self, event: RouteEvent, handler: F) -> Unsubscribe
	where
		F: Fn(&Transition) + Send + Sync + 'static,
	{
		self.inner.events.listen(event, handler)
	}

	/// Navigates to a route name or an already resolved route.
	///
	/// Resolves with the current route once every follow-up has settled.
	///
	/// # Errors
	///
	/// - [`NavigationError::Route`] when the name or params do not resolve
	/// - [`NavigationError::Protocol`] or [`NavigationError::Handler`] when the
	///   pipeline fails; nothing is committed
	/// - [`NavigationError::FollowUpLimit`] when the follow-up bound is exceeded
	pub async fn navigate_to_route(
		&self,
		target: impl Into<NavigationTarget>,
		options: NavigateOptions,
		transition: TransitionOptions,
	) -> Result<Arc<Route>, NavigationError> {
		self.inner
			.navigate(target.into(), options, transition)
			.await
	}

	/// Matches `href` and navigates to the matched route.
	///
	/// # Errors
	///
	/// Returns [`RouteError::UnregisteredPath`] when nothing matches, plus every
	/// error of [`Router::navigate_to_route`].
	pub async fn navigate_to_path(
		&self,
		href: &str,
		options: PathOptions,
	) -> Result<Arc<Route>, NavigationError> {
		self.inner.navigate_to_path(href, options).await
	}

	/// Re-runs the pipeline for the current route, replacing it.
	pub async fn update(&self) -> Result<Arc<Route>, NavigationError> {
		let current = self.current_route().ok_or(NavigationError::NotStarted)?;
		let options = NavigateOptions {
			params: current.params().clone(),
			query: current.query().clone(),
			state: current.state().cloned(),
			..NavigateOptions::default()
		};

		self.inner
			.navigate(
				NavigationTarget::Name(current.name().to_string()),
				options,
				TransitionOptions::replace().forced(),
			)
			.await
	}

	/// Clears the history, the middleware and the listeners.
	pub fn dispose(&self) {
		self.inner.history.write().clear();
		*self.inner.pipeline.write() = NavigationPipeline::new();
		self.inner.events.clear();
		self.inner.started.store(false, Ordering::Release);
		tracing::debug!("router disposed");
	}
}

impl std::fmt::Debug for Router {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Router")
			.field("history_len", &self.len())
			.field("middleware_count", &self.middleware_count())
			.field("events", &self.inner.events)
			.finish()
	}
}

impl RouterInner {
	pub(crate) fn tree(&self) -> &RouteTree {
		&self.tree
	}

	pub(crate) fn current_route(&self) -> Option<Arc<Route>> {
		self.history.read().current().cloned()
	}

	pub(crate) async fn navigate_to_path(
		&self,
		href: &str,
		options: PathOptions,
	) -> Result<Arc<Route>, NavigationError> {
		let route = self
			.tree
			.match_path(href)
			.ok_or_else(|| RouteError::UnregisteredPath(href.to_string()))?;

		let navigate = NavigateOptions {
			params: route.params().clone(),
			query: route.query().clone(),
			state: options.state,
			path: None,
			context: options.context,
		};
		let transition = TransitionOptions {
			kind: options.kind,
			force: false,
		};

		self.navigate(NavigationTarget::Name(route.name().to_string()), navigate, transition)
			.await
	}

	/// Runs one navigation and every follow-up it triggers.
	pub(crate) async fn navigate(
		&self,
		target: NavigationTarget,
		options: NavigateOptions,
		transition: TransitionOptions,
	) -> Result<Arc<Route>, NavigationError> {
		let mut attempt = Attempt {
			target,
			options,
			transition,
			carried: None,
		};
		let mut follow_ups = 0usize;

		loop {
			match self.attempt(attempt).await? {
				Outcome::Settled(route) => return Ok(route),
				Outcome::FollowUp(next) => {
					follow_ups += 1;
					if let Some(limit) = self.config.max_follow_ups
						&& follow_ups > limit
					{
						tracing::warn!(limit, "follow-up navigation limit exceeded");
						return Err(NavigationError::FollowUpLimit { limit });
					}
					tracing::debug!(next_target = ?next.target, follow_ups, "following up routing error");
					attempt = next;
				}
			}
		}
	}

	fn resolve(&self, attempt: &Attempt) -> Result<Route, RouteError> {
		let route = match &attempt.target {
			NavigationTarget::Route(route) => {
				let route = Route::clone(route);
				match &attempt.options.path {
					Some(path) => route.with_path(path.clone()),
					None => route,
				}
			}
			NavigationTarget::Name(name) => {
				let find = FindOptions {
					params: attempt.options.params.clone(),
					query: attempt.options.query.clone(),
					state: attempt.options.state.clone(),
					path: attempt.options.path.clone(),
					strict: true,
				};
				self.tree
					.find_route(name, &find)?
					.ok_or_else(|| RouteError::UnknownRoute(name.clone()))?
			}
		};

		Ok(match &attempt.carried {
			Some(error) => route.with_error(Some(error.clone())),
			None => route,
		})
	}

	async fn attempt(&self, attempt: Attempt) -> Result<Outcome, NavigationError> {
		let to = self.resolve(&attempt)?;
		let from = self.current_route();

		if !attempt.transition.force
			&& let Some(current) = &from
		{
			let same_value = match &attempt.target {
				NavigationTarget::Route(route) => Arc::ptr_eq(route, current),
				NavigationTarget::Name(_) => false,
			};
			if same_value || routes_equal(current, &to) {
				tracing::debug!(route = %current.name(), "target equals current route, skipping");
				return Ok(Outcome::Settled(Arc::clone(current)));
			}
		}

		let token = self.token.fetch_add(1, Ordering::AcqRel) + 1;
		let mut transition = Transition {
			from,
			to,
			kind: attempt.transition.kind,
			context: attempt.options.context.clone(),
			token,
		};
		tracing::debug!(
			from = transition.from.as_ref().map(|r| r.name().to_string()).as_deref().unwrap_or("-"),
			to = %transition.to.name(),
			kind = %transition.kind,
			token,
			"navigation started"
		);

		self.events.emit(RouteEvent::Start, &transition);

		let pipeline = self.pipeline.read().clone();
		let events = &self.events;
		let result = {
			let payload = &transition;
			pipeline
				.run_with(payload, |index| {
					if index == 0 {
						events.emit(RouteEvent::Progress, payload);
					}
				})
				.await
		};

		let captured = match result {
			Ok(()) => None,
			Err(NavigationError::Routing(error)) => {
				tracing::info!(
					to = %transition.to.name(),
					code = error.code(),
					error = %error,
					"routing error captured on route"
				);
				Some(error)
			}
			Err(error) => {
				tracing::warn!(to = %transition.to.name(), error = %error, "navigation failed");
				return Err(error);
			}
		};

		if let Some(error) = &captured {
			transition.to = std::mem::take(&mut transition.to).with_error(Some(error.clone()));
		}

		let committed = Arc::new(transition.to.clone());
		let current = {
			let mut history = self.history.write();
			history.commit(transition.kind, Arc::clone(&committed));
			history.current().cloned()
		};
		self.started.store(true, Ordering::Release);
		tracing::info!(
			route = %committed.name(),
			path = %committed.path(),
			kind = %transition.kind,
			"navigation committed"
		);

		self.events.emit(RouteEvent::Finish, &transition);

		// A pop discards the errored target, so the exposed entry stays put.
		let pending = captured.filter(|_| transition.kind != NavigationType::Pop);
		if let Some(next) = pending.and_then(follow_up) {
			return Ok(Outcome::FollowUp(next));
		}

		Ok(Outcome::Settled(current.unwrap_or(committed)))
	}
}

/// Builds the follow-up for a captured routing error, if it names a target.
fn follow_up(error: RoutingError) -> Option<Attempt> {
	let meta = error.meta().clone();

	let (target, options) = if let Some(route) = meta.route {
		(NavigationTarget::Name(route), NavigateOptions::default())
	} else if let Some(path) = meta.path {
		let options = NavigateOptions {
			path: Some(path),
			state: Some(Value::String(error.message().to_string())),
			..NavigateOptions::default()
		};
		(NavigationTarget::Name(error.code().to_string()), options)
	} else {
		return None;
	};

	Some(Attempt {
		target,
		options,
		transition: TransitionOptions::replace(),
		carried: Some(error),
	})
}
