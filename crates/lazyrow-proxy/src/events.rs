//! Hydration events and their observers

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::identifier::Identifier;

/// A single lazy-load of an entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HydrationEvent {
	/// Entity class name
	pub class_name: String,
	/// Identifier recovered from the placeholder
	pub identifier: Identifier,
	/// Field whose read triggered the load
	pub field: String,
	/// When the load completed
	pub timestamp: DateTime<Utc>,
}

impl HydrationEvent {
	/// Create an event stamped with the current time
	pub fn new(
		class_name: impl Into<String>,
		identifier: Identifier,
		field: impl Into<String>,
	) -> Self {
		Self {
			class_name: class_name.into(),
			identifier,
			field: field.into(),
			timestamp: Utc::now(),
		}
	}
}

impl fmt::Display for HydrationEvent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}({}) via {}", self.class_name, self.identifier, self.field)
	}
}

/// Receives hydration events
pub trait HydrationObserver: Send + Sync {
	/// Called after each successful hydration
	fn on_hydrated(&self, event: &HydrationEvent);
}

impl<F> HydrationObserver for F
where
	F: Fn(&HydrationEvent) + Send + Sync,
{
	fn on_hydrated(&self, event: &HydrationEvent) {
		self(event)
	}
}

/// Handle returned by [`HydrationObservers::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Callback list notified on every hydration
#[derive(Default)]
pub struct HydrationObservers {
	observers: RwLock<Vec<(ObserverId, Arc<dyn HydrationObserver>)>>,
	next_id: AtomicU64,
}

impl HydrationObservers {
	/// Create an empty observer list
	pub fn new() -> Self {
		Self::default()
	}

	/// Subscribe an observer
	///
	/// # Examples
	///
	/// ```
	/// use lazyrow_proxy::{HydrationEvent, HydrationObservers, Identifier};
	/// use std::sync::Arc;
	/// use std::sync::atomic::{AtomicUsize, Ordering};
	///
	/// let observers = HydrationObservers::new();
	/// let seen = Arc::new(AtomicUsize::new(0));
	/// let counter = Arc::clone(&seen);
	/// observers.subscribe(Arc::new(move |_: &HydrationEvent| {
	///     counter.fetch_add(1, Ordering::SeqCst);
	/// }));
	///
	/// observers.notify(&HydrationEvent::new("User", Identifier::single("id", 1_i64), "name"));
	/// assert_eq!(seen.load(Ordering::SeqCst), 1);
	/// ```
	pub fn subscribe(&self, observer: Arc<dyn HydrationObserver>) -> ObserverId {
		let id = ObserverId(self.next_id.fetch_add(1, Ordering::SeqCst));
		self.observers.write().push((id, observer));
		id
	}

	/// Remove an observer; returns false if it was not subscribed
	pub fn unsubscribe(&self, id: ObserverId) -> bool {
		let mut observers = self.observers.write();
		let before = observers.len();
		observers.retain(|(existing, _)| *existing != id);
		observers.len() != before
	}

	/// Deliver an event to every observer, in subscription order
	pub fn notify(&self, event: &HydrationEvent) {
		// Snapshot so observers may subscribe or unsubscribe re-entrantly
		let observers: Vec<_> = self
			.observers
			.read()
			.iter()
			.map(|(_, observer)| Arc::clone(observer))
			.collect();
		for observer in observers {
			observer.on_hydrated(event);
		}
	}

	/// Number of subscribed observers
	pub fn len(&self) -> usize {
		self.observers.read().len()
	}

	/// Returns true if nobody is subscribed
	pub fn is_empty(&self) -> bool {
		self.observers.read().is_empty()
	}
}

impl fmt::Debug for HydrationObservers {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("HydrationObservers")
			.field("observers", &self.len())
			.finish()
	}
}
