//! # Waymark Pipeline
//!
//! A standalone continuation-passing pipeline runner ("onion" model).
//!
//! Handlers are invoked in registration order. Each handler receives the shared
//! payload and a [`Next`] continuation: code before `next.run().await` executes
//! in declaration order, code after it executes in reverse order.
//!
//! ## Rules
//!
//! - A handler advances the chain by awaiting [`Next::run`]. Returning without
//!   calling it ends the chain silently at that point.
//! - [`Next::abort`] rejects the whole run with the given error. Outer handlers
//!   awaiting `next.run()` observe the rejection.
//! - Advancing twice from the same handler is a protocol violation and fails the
//!   run with [`InvalidNextInvocation`].
//! - The advance callback passed to [`Pipeline::run_with`] fires once per handler
//!   that completes successfully, with that handler's index.
//!
//! ## Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use waymark_pipeline::{InvalidNextInvocation, Middleware, Next, Pipeline};
//! use std::sync::Arc;
//!
//! #[derive(Debug, Clone)]
//! struct Failed(String);
//!
//! impl From<InvalidNextInvocation> for Failed {
//!     fn from(e: InvalidNextInvocation) -> Self {
//!         Failed(e.to_string())
//!     }
//! }
//!
//! struct Greet;
//!
//! #[async_trait]
//! impl Middleware<String, (), Failed> for Greet {
//!     async fn handle(&self, payload: &String, next: Next<'_, String, (), Failed>) -> Result<(), Failed> {
//!         assert_eq!(payload, "hello");
//!         next.run().await
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let pipeline: Pipeline<String, (), Failed> = Pipeline::new().with_middleware(Arc::new(Greet));
//! pipeline.run(&"hello".to_string()).await.unwrap();
//! # });
//! ```

pub mod compose;
pub mod error;

pub use compose::{Middleware, Next, Pipeline};
pub use error::InvalidNextInvocation;
