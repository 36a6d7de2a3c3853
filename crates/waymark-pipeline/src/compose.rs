//! Middleware composition.
//!
//! A [`Pipeline`] owns an ordered list of handlers. Each call to
//! [`Pipeline::run`] creates an independent run state holding the
//! highest handler index reached so far; the call-next-once rule is an integer
//! comparison against that index.

use crate::error::InvalidNextInvocation;
use async_trait::async_trait;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// A single step of a [`Pipeline`].
///
/// `P` is the shared payload, `O` the value a handler produces and `E` the
/// error that rejects a run.
#[async_trait]
pub trait Middleware<P, O, E>: Send + Sync {
	/// Processes the payload, optionally advancing through `next`.
	async fn handle(&self, payload: &P, next: Next<'_, P, O, E>) -> Result<O, E>;
}

/// Blanket implementation so `Arc<dyn Middleware<..>>` can be registered
/// wherever a middleware is expected.
#[async_trait]
impl<T, P, O, E> Middleware<P, O, E> for Arc<T>
where
	T: Middleware<P, O, E> + ?Sized,
	P: Send + Sync + 'static,
	O: Send + 'static,
	E: Send + 'static,
{
	async fn handle(&self, payload: &P, next: Next<'_, P, O, E>) -> Result<O, E> {
		(**self).handle(payload, next).await
	}
}

/// An ordered list of handlers run in the onion model.
pub struct Pipeline<P, O, E> {
	handlers: Vec<Arc<dyn Middleware<P, O, E>>>,
}

impl<P, O, E> fmt::Debug for Pipeline<P, O, E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Pipeline")
			.field("handlers_count", &self.handlers.len())
			.finish()
	}
}

impl<P, O, E> Clone for Pipeline<P, O, E> {
	fn clone(&self) -> Self {
		Self {
			handlers: self.handlers.clone(),
		}
	}
}

impl<P, O, E> Default for Pipeline<P, O, E> {
	fn default() -> Self {
		Self {
			handlers: Vec::new(),
		}
	}
}

impl<P, O, E> From<Vec<Arc<dyn Middleware<P, O, E>>>> for Pipeline<P, O, E> {
	fn from(handlers: Vec<Arc<dyn Middleware<P, O, E>>>) -> Self {
		Self { handlers }
	}
}

impl<P, O, E> Pipeline<P, O, E>
where
	P: Send + Sync + 'static,
	O: Default + Send + 'static,
	E: Clone + From<InvalidNextInvocation> + Send + 'static,
{
	/// Creates an empty pipeline.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a handler using builder pattern.
	pub fn with_middleware(mut self, middleware: Arc<dyn Middleware<P, O, E>>) -> Self {
		self.handlers.push(middleware);
		self
	}

	/// Adds a handler to the end of the chain.
	pub fn add_middleware(&mut self, middleware: Arc<dyn Middleware<P, O, E>>) {
		self.handlers.push(middleware);
	}

	/// Returns the number of registered handlers.
	pub fn len(&self) -> usize {
		self.handlers.len()
	}

	/// Returns whether the pipeline has no handlers.
	pub fn is_empty(&self) -> bool {
		self.handlers.is_empty()
	}

	/// Runs every handler over `payload`.
	pub async fn run(&self, payload: &P) -> Result<O, E> {
		self.run_with(payload, |_| {}).await
	}

	/// Runs every handler over `payload`, invoking `on_advance` with the index of
	/// each handler that completes successfully.
	///
	/// Completion order is innermost first, so index `0` is always reported
	/// last, once the whole chain has had its chance to run.
	pub async fn run_with<F>(&self, payload: &P, on_advance: F) -> Result<O, E>
	where
		F: Fn(usize) + Send + Sync,
	{
		let state = RunState {
			handlers: &self.handlers,
			payload,
			on_advance: &on_advance,
			highest: Mutex::new(None),
			failure: Mutex::new(None),
		};

		let result = state.run_from(0).await;

		// An abort or a protocol violation fails the run even when the handler
		// that received it swallowed the returned error.
		match state.failure.lock().take() {
			Some(error) => Err(error),
			None => result,
		}
	}
}

/// Mutable state shared by all continuations of a single run.
struct RunState<'a, P, O, E> {
	handlers: &'a [Arc<dyn Middleware<P, O, E>>],
	payload: &'a P,
	on_advance: &'a (dyn Fn(usize) + Send + Sync),
	highest: Mutex<Option<usize>>,
	failure: Mutex<Option<E>>,
}

impl<'a, P, O, E> RunState<'a, P, O, E>
where
	P: Send + Sync + 'static,
	O: Default + Send + 'static,
	E: Clone + From<InvalidNextInvocation> + Send + 'static,
{
	fn run_from(&'a self, index: usize) -> BoxFuture<'a, Result<O, E>> {
		Box::pin(async move {
			let latched = self.failure.lock().clone();
			if let Some(error) = latched {
				return Err(error);
			}

			let violated = {
				let mut highest = self.highest.lock();
				match *highest {
					Some(reached) if index <= reached => true,
					_ => {
						*highest = Some(index);
						false
					}
				}
			};
			if violated {
				tracing::warn!(index, "middleware advanced the pipeline more than once");
				let error = E::from(InvalidNextInvocation { index });
				self.latch(error.clone());
				return Err(error);
			}

			let Some(handler) = self.handlers.get(index) else {
				return Ok(O::default());
			};

			let next = Next {
				state: self,
				index: index + 1,
			};
			let output = handler.handle(self.payload, next).await?;

			let failed = self.failure.lock().is_some();
			if !failed {
				(self.on_advance)(index);
			}
			Ok(output)
		})
	}

	fn latch(&self, error: E) {
		let mut failure = self.failure.lock();
		if failure.is_none() {
			*failure = Some(error);
		}
	}
}

/// Continuation handed to each handler.
pub struct Next<'a, P, O, E> {
	state: &'a RunState<'a, P, O, E>,
	index: usize,
}

impl<P, O, E> fmt::Debug for Next<'_, P, O, E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Next").field("index", &self.index).finish()
	}
}

impl<'a, P, O, E> Next<'a, P, O, E>
where
	P: Send + Sync + 'static,
	O: Default + Send + 'static,
	E: Clone + From<InvalidNextInvocation> + Send + 'static,
{
	/// Index of the handler this continuation starts.
	pub fn index(&self) -> usize {
		self.index
	}

	/// Advances to the next handler and resolves with its output.
	///
	/// Past the last handler this resolves with `O::default()`.
	pub async fn run(&self) -> Result<O, E> {
		self.state.run_from(self.index).await
	}

	/// Rejects the whole run with `error`.
	///
	/// Handlers after this point never run. The error is also returned so the
	/// caller can propagate it with `?`.
	///
	/// The error is latched for the whole run: an outer handler that catches
	/// the failed `next.run().await` and returns `Ok` does not recover it, and
	/// [`Pipeline::run`] still resolves with this error.
	#[must_use = "return the aborted result so outer handlers unwind"]
	pub fn abort(&self, error: E) -> Result<O, E> {
		self.state.latch(error.clone());
		Err(error)
	}
}
