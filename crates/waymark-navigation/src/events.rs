//! Lifecycle event listeners.

use crate::transition::Transition;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// Lifecycle signal of a navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteEvent {
	/// Before the pipeline runs.
	Start,
	/// After the whole pipeline has completed, before commit.
	Progress,
	/// After commit.
	Finish,
}

impl fmt::Display for RouteEvent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Start => "start",
			Self::Progress => "progress",
			Self::Finish => "finish",
		})
	}
}

/// Type alias for listener functions
pub type ListenerFn = Arc<dyn Fn(&Transition) + Send + Sync>;

struct Listener {
	id: u64,
	event: RouteEvent,
	handler: ListenerFn,
}

type Listeners = RwLock<Vec<Listener>>;

/// Fan-out of [`RouteEvent`]s to registered listeners.
///
/// Listeners run synchronously, in registration order, on a snapshot taken
/// when the event is emitted: a listener registered or removed while an event
/// is being delivered takes effect from the next event.
pub struct EventRegistry {
	listeners: Arc<Listeners>,
	next_id: AtomicU64,
}

impl EventRegistry {
	pub fn new() -> Self {
		Self {
			listeners: Arc::new(RwLock::new(Vec::new())),
			next_id: AtomicU64::new(0),
		}
	}

	/// Registers `handler` for `event`.
	pub fn listen<F>(&self, event: RouteEvent, handler: F) -> Unsubscribe
	where
		F: Fn(&Transition) + Send + Sync + 'static,
	{
		let id = self.next_id.fetch_add(1, Ordering::Relaxed);
		self.listeners.write().push(Listener {
			id,
			event,
			handler: Arc::new(handler),
		});

		Unsubscribe {
			id,
			listeners: Arc::downgrade(&self.listeners),
		}
	}

	/// Calls every listener registered for `event`.
	pub fn emit(&self, event: RouteEvent, transition: &Transition) {
		let handlers: Vec<ListenerFn> = self
			.listeners
			.read()
			.iter()
			.filter(|listener| listener.event == event)
			.map(|listener| Arc::clone(&listener.handler))
			.collect();

		tracing::trace!(%event, listeners = handlers.len(), "emitting route event");
		for handler in handlers {
			handler(transition);
		}
	}

	/// Number of listeners registered for `event`.
	pub fn listener_count(&self, event: RouteEvent) -> usize {
		self.listeners
			.read()
			.iter()
			.filter(|listener| listener.event == event)
			.count()
	}

	/// Removes every listener.
	pub fn clear(&self) {
		self.listeners.write().clear();
	}
}

impl Default for EventRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for EventRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EventRegistry")
			.field("listeners_count", &self.listeners.read().len())
			.finish()
	}
}

/// Removes one listener registration.
///
/// Dropping this value keeps the listener registered.
#[derive(Debug)]
#[must_use = "keep the handle to be able to unsubscribe"]
pub struct Unsubscribe {
	id: u64,
	listeners: Weak<Listeners>,
}

impl Unsubscribe {
	/// Removes the listener. Does nothing once the registry is gone.
	pub fn unsubscribe(self) {
		if let Some(listeners) = self.listeners.upgrade() {
			listeners.write().retain(|listener| listener.id != self.id);
		}
	}
}
