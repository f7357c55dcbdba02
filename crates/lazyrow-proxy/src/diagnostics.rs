//! Lazy-load diagnostics
//!
//! Purely observational: nothing here affects hydration. The log grows for
//! as long as it lives; callers that need bounded memory must drop or
//! [`clear`](HydrationLog::clear) it themselves.

use indexmap::IndexMap;
use parking_lot::Mutex;

use crate::events::{HydrationEvent, HydrationObserver};

/// Append-only record of hydration events
#[derive(Debug, Default)]
pub struct HydrationLog {
	entries: Mutex<Vec<HydrationEvent>>,
}

impl HydrationLog {
	/// Create an empty log
	pub fn new() -> Self {
		Self::default()
	}

	/// Append an event
	pub fn record(&self, event: HydrationEvent) {
		self.entries.lock().push(event);
	}

	/// Number of recorded lazy-loads
	pub fn count(&self) -> usize {
		self.entries.lock().len()
	}

	/// Snapshot of every recorded event, oldest first
	pub fn entries(&self) -> Vec<HydrationEvent> {
		self.entries.lock().clone()
	}

	/// Lazy-load counts per class, in order of first appearance
	pub fn count_by_class(&self) -> IndexMap<String, usize> {
		let mut counts = IndexMap::new();
		for event in self.entries.lock().iter() {
			*counts.entry(event.class_name.clone()).or_insert(0) += 1;
		}
		counts
	}

	/// Short summary, e.g. `"3 lazy-loads"`
	///
	/// # Examples
	///
	/// ```
	/// use lazyrow_proxy::{HydrationEvent, HydrationLog, Identifier};
	///
	/// let log = HydrationLog::new();
	/// assert_eq!(log.summary(), "0 lazy-loads");
	///
	/// log.record(HydrationEvent::new("User", Identifier::single("id", 42_i64), "name"));
	/// assert_eq!(log.summary(), "1 lazy-loads");
	/// ```
	pub fn summary(&self) -> String {
		format!("{} lazy-loads", self.count())
	}

	/// One line per event: `Class(identifier) via field`
	pub fn detail(&self) -> String {
		self.entries
			.lock()
			.iter()
			.map(ToString::to_string)
			.collect::<Vec<_>>()
			.join("\n")
	}

	/// Drop every recorded event
	pub fn clear(&self) {
		self.entries.lock().clear();
	}
}

impl HydrationObserver for HydrationLog {
	fn on_hydrated(&self, event: &HydrationEvent) {
		self.record(event.clone());
	}
}
