//! Collection window for one unit of work

use chrono::{DateTime, Utc};
use lazyrow_proxy::HydrationEvent;

/// Scope the toolbar reports on
///
/// Panels only report events that happened at or after `started_at`, so one
/// long-lived log can back toolbars for many units of work.
#[derive(Debug, Clone)]
pub struct ToolbarContext {
	/// Label shown in the toolbar header, e.g. a request path or job name
	pub label: String,
	/// Start of the collection window
	pub started_at: DateTime<Utc>,
}

impl ToolbarContext {
	/// Open a window starting now
	pub fn new(label: impl Into<String>) -> Self {
		Self::starting_at(label, Utc::now())
	}

	/// Open a window starting at `started_at`
	pub fn starting_at(label: impl Into<String>, started_at: DateTime<Utc>) -> Self {
		Self {
			label: label.into(),
			started_at,
		}
	}

	/// Returns true if the event belongs to this window
	pub fn covers(&self, event: &HydrationEvent) -> bool {
		event.timestamp >= self.started_at
	}
}
