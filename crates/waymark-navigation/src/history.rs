//! The navigation history stack.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use waymark_routes::Route;

/// How a navigation commits to the history stack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationType {
	/// Append.
	#[default]
	Push,
	/// Overwrite the top entry.
	Replace,
	/// Remove the top entry.
	Pop,
}

impl fmt::Display for NavigationType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Push => "push",
			Self::Replace => "replace",
			Self::Pop => "pop",
		})
	}
}

/// Ordered sequence of committed routes, current route on top.
///
/// Entries are shared and never modified after they are committed.
#[derive(Debug, Clone, Default)]
pub struct HistoryStack {
	entries: Vec<Arc<Route>>,
}

impl HistoryStack {
	pub fn new() -> Self {
		Self::default()
	}

	/// The top entry.
	pub fn current(&self) -> Option<&Arc<Route>> {
		self.entries.last()
	}

	/// The entry directly below the top.
	pub fn previous(&self) -> Option<&Arc<Route>> {
		self.entries.iter().rev().nth(1)
	}

	/// Applies one commit.
	///
	/// `Replace` on an empty stack appends; `Pop` ignores `route`.
	pub fn commit(&mut self, kind: NavigationType, route: Arc<Route>) {
		match kind {
			NavigationType::Push => self.entries.push(route),
			NavigationType::Replace => {
				self.entries.pop();
				self.entries.push(route);
			}
			NavigationType::Pop => {
				self.entries.pop();
			}
		}
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Entries from oldest to newest.
	pub fn entries(&self) -> &[Arc<Route>] {
		&self.entries
	}

	pub fn clear(&mut self) {
		self.entries.clear();
	}
}
