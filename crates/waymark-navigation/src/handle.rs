//! Capability handle given to middleware factories.

use crate::error::NavigationError;
use crate::router::RouterInner;
use crate::transition::{NavigateOptions, NavigationTarget, TransitionOptions};
use std::fmt;
use std::sync::{Arc, Weak};
use waymark_routes::{FindOptions, Route};

/// Narrow view of a [`crate::Router`]: route lookup, navigation and the
/// current route.
///
/// The handle holds a weak reference, so a middleware keeping one does not
/// keep its router alive. Once the router is dropped every call reports
/// [`NavigationError::Disposed`].
#[derive(Clone)]
pub struct RouterHandle {
	inner: Weak<RouterInner>,
}

impl RouterHandle {
	pub(crate) fn new(inner: Weak<RouterInner>) -> Self {
		Self { inner }
	}

	fn upgrade(&self) -> Result<Arc<RouterInner>, NavigationError> {
		self.inner.upgrade().ok_or(NavigationError::Disposed)
	}

	/// Whether the router is gone.
	pub fn is_disposed(&self) -> bool {
		self.inner.strong_count() == 0
	}

	/// See [`crate::Router::find_route`].
	pub fn find_route(&self, name: &str, options: &FindOptions) -> Result<Option<Route>, NavigationError> {
		Ok(self.upgrade()?.tree().find_route(name, options)?)
	}

	/// See [`crate::Router::navigate_to_route`].
	pub async fn navigate_to_route(
		&self,
		target: impl Into<NavigationTarget>,
		options: NavigateOptions,
		transition: TransitionOptions,
	) -> Result<Arc<Route>, NavigationError> {
		let inner = self.upgrade()?;
		inner.navigate(target.into(), options, transition).await
	}

	/// The current route; `None` before the first commit or once disposed.
	pub fn current_route(&self) -> Option<Arc<Route>> {
		self.inner.upgrade()?.current_route()
	}
}

impl fmt::Debug for RouterHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouterHandle")
			.field("disposed", &self.is_disposed())
			.finish()
	}
}
