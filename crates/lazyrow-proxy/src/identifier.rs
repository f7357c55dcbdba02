//! Entity identifiers

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value::ScalarValue;

/// Ordered mapping from identifier field name to value
///
/// Order follows insertion, which for recovered identifiers is the
/// descriptor's declared identifier order.
///
/// # Examples
///
/// ```
/// use lazyrow_proxy::Identifier;
///
/// let id = Identifier::new().with("tenant", "acme").with("id", 42_i64);
/// assert_eq!(id.len(), 2);
/// assert_eq!(id.to_string(), "tenant=\"acme\", id=42");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier {
	fields: IndexMap<String, ScalarValue>,
}

impl Identifier {
	/// Create an empty identifier
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a single-field identifier
	pub fn single(field: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
		Self::new().with(field, value)
	}

	/// Add a field, builder style
	pub fn with(mut self, field: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
		self.insert(field, value);
		self
	}

	/// Insert or replace a field value
	pub fn insert(&mut self, field: impl Into<String>, value: impl Into<ScalarValue>) {
		self.fields.insert(field.into(), value.into());
	}

	/// Value of a field, if present
	pub fn get(&self, field: &str) -> Option<&ScalarValue> {
		self.fields.get(field)
	}

	/// Returns true if the field is part of this identifier
	pub fn contains(&self, field: &str) -> bool {
		self.fields.contains_key(field)
	}

	/// Field names in order
	pub fn field_names(&self) -> impl Iterator<Item = &str> {
		self.fields.keys().map(String::as_str)
	}

	/// Iterate over `(field, value)` pairs in order
	pub fn iter(&self) -> impl Iterator<Item = (&str, &ScalarValue)> {
		self.fields.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// Number of fields
	pub fn len(&self) -> usize {
		self.fields.len()
	}

	/// Returns true if no field is set
	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}
}

impl fmt::Display for Identifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (idx, (field, value)) in self.fields.iter().enumerate() {
			if idx > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{}={}", field, value)?;
		}
		Ok(())
	}
}

impl<K, V> FromIterator<(K, V)> for Identifier
where
	K: Into<String>,
	V: Into<ScalarValue>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut identifier = Identifier::new();
		for (field, value) in iter {
			identifier.insert(field, value);
		}
		identifier
	}
}

impl<K, V, const N: usize> From<[(K, V); N]> for Identifier
where
	K: Into<String>,
	V: Into<ScalarValue>,
{
	fn from(pairs: [(K, V); N]) -> Self {
		pairs.into_iter().collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_identifier_keeps_insertion_order() {
		let id = Identifier::from([("b", 2_i64), ("a", 1_i64)]);
		let names: Vec<_> = id.field_names().collect();
		assert_eq!(names, vec!["b", "a"]);
	}

	#[rstest]
	fn test_identifier_equality_and_lookup() {
		let left = Identifier::new().with("a", 1_i64).with("b", 2_i64);
		let right = Identifier::new().with("a", 1_i64).with("b", 2_i64);
		assert_eq!(left, right);
		assert_eq!(left.get("b"), Some(&ScalarValue::Integer(2)));
	}

	#[rstest]
	fn test_identifier_serializes_as_map() {
		let id = Identifier::single("id", 42_i64);
		assert_eq!(serde_json::to_value(&id).unwrap(), serde_json::json!({"id": 42}));
	}
}
