//! Test data builders for lazyrow-debug-toolbar tests

use chrono::{DateTime, Utc};
use lazyrow_proxy::{HydrationEvent, Identifier, ScalarValue};

/// Builder for creating HydrationEvent test data
///
/// # Example
///
/// ```rust,ignore
/// let event = HydrationEventBuilder::new("User")
///     .identifier("id", 42_i64)
///     .field("name")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct HydrationEventBuilder {
	class_name: String,
	identifier: Identifier,
	field: String,
	timestamp: DateTime<Utc>,
}

impl HydrationEventBuilder {
	/// Create a builder for an event of `class_name`, stamped now
	pub fn new(class_name: impl Into<String>) -> Self {
		Self {
			class_name: class_name.into(),
			identifier: Identifier::new(),
			field: "name".to_string(),
			timestamp: Utc::now(),
		}
	}

	/// Add an identifier field
	pub fn identifier(mut self, field: &str, value: impl Into<ScalarValue>) -> Self {
		self.identifier.insert(field, value);
		self
	}

	/// Set the triggering field
	pub fn field(mut self, field: impl Into<String>) -> Self {
		self.field = field.into();
		self
	}

	/// Set timestamp
	pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
		self.timestamp = timestamp;
		self
	}

	/// Build the HydrationEvent
	pub fn build(self) -> HydrationEvent {
		let mut event = HydrationEvent::new(self.class_name, self.identifier, self.field);
		event.timestamp = self.timestamp;
		event
	}
}
