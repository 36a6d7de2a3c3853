//! Navigation errors.

use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;
use waymark_pipeline::InvalidNextInvocation;
use waymark_routes::{RouteError, RoutingError};

/// Errors produced by a navigation attempt.
///
/// Only [`NavigationError::Routing`] is recoverable: it is written onto the
/// committed route instead of failing the navigation. Every other variant
/// rejects the navigation and leaves the history untouched.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum NavigationError {
	/// The target could not be resolved.
	#[error(transparent)]
	Route(#[from] RouteError),

	/// A recoverable not-found, forbidden, redirect or internal error.
	#[error(transparent)]
	Routing(#[from] RoutingError),

	/// A middleware advanced the pipeline more than once.
	#[error(transparent)]
	Protocol(#[from] InvalidNextInvocation),

	/// Any other middleware failure.
	#[error(transparent)]
	Handler(Arc<dyn StdError + Send + Sync>),

	/// `update()` was called before anything was committed.
	#[error("Router has no current route")]
	NotStarted,

	/// The follow-up chain exceeded the configured bound.
	#[error("Follow-up navigation limit of {limit} exceeded")]
	FollowUpLimit {
		/// The configured bound.
		limit: usize,
	},

	/// The router behind a handle has been dropped.
	#[error("Router has been disposed")]
	Disposed,
}

impl NavigationError {
	/// Wraps an arbitrary middleware error.
	pub fn handler<E>(error: E) -> Self
	where
		E: StdError + Send + Sync + 'static,
	{
		Self::Handler(Arc::new(error))
	}

	/// Returns the recoverable routing error, if this is one.
	pub fn as_routing(&self) -> Option<&RoutingError> {
		match self {
			Self::Routing(error) => Some(error),
			_ => None,
		}
	}

	/// Returns whether this error rejects the navigation.
	pub fn is_fatal(&self) -> bool {
		self.as_routing().is_none()
	}
}
