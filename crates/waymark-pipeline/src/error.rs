//! Pipeline protocol errors.

use thiserror::Error;

/// A handler advanced the chain from a position that was already passed.
///
/// Raised when `next` is called more than once by the same handler, or when a
/// stale continuation is invoked after the chain has moved beyond it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("next() called multiple times")]
pub struct InvalidNextInvocation {
	/// Index of the handler the offending call tried to start.
	pub index: usize,
}
