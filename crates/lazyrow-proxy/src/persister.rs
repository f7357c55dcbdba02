//! Entity persisters: the storage side of hydration

use async_trait::async_trait;
use dashmap::DashMap;
use indexmap::IndexMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::entity::Entity;
use crate::identifier::Identifier;
use crate::value::ScalarValue;
use crate::{ProxyError, ProxyResult};

/// Loads entity rows from durable storage
///
/// One persister serves one entity class. Implementations populate the
/// target's non-identifier fields in place and report their own failures;
/// hydration passes those failures through unchanged.
#[async_trait]
pub trait EntityPersister: Send + Sync {
	/// Load the row for `identifier` into `target`
	async fn load(&self, identifier: &Identifier, target: &mut dyn Entity) -> ProxyResult<()>;
}

/// A stored row: field name to value
pub type Row = IndexMap<String, ScalarValue>;

/// Hashable form of one identifier value; keeps the value's type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum KeyPart {
	String(String),
	Integer(i64),
	Float(u64),
	Boolean(bool),
	Null,
}

impl From<&ScalarValue> for KeyPart {
	fn from(value: &ScalarValue) -> Self {
		match value {
			ScalarValue::String(s) => KeyPart::String(s.clone()),
			ScalarValue::Integer(i) => KeyPart::Integer(*i),
			// -0.0 and 0.0 compare equal, so they share a key
			ScalarValue::Float(f) if *f == 0.0 => KeyPart::Float(0.0_f64.to_bits()),
			ScalarValue::Float(f) => KeyPart::Float(f.to_bits()),
			ScalarValue::Boolean(b) => KeyPart::Boolean(*b),
			ScalarValue::Null => KeyPart::Null,
		}
	}
}

/// Row key: identifier fields sorted by name, so field order never matters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RowKey(Vec<(String, KeyPart)>);

impl From<&Identifier> for RowKey {
	fn from(identifier: &Identifier) -> Self {
		let mut parts: Vec<(String, KeyPart)> = identifier
			.iter()
			.map(|(field, value)| (field.to_string(), KeyPart::from(value)))
			.collect();
		parts.sort_by(|a, b| a.0.cmp(&b.0));
		RowKey(parts)
	}
}

/// Persister backed by an in-memory table
///
/// Rows are keyed by identifier value, independent of field order; values
/// of different types never match (`1` and `1.0` are distinct keys). Counts
/// every `load` call, successful or not.
///
/// # Examples
///
/// ```
/// use lazyrow_proxy::{Identifier, InMemoryPersister};
///
/// let users = InMemoryPersister::new("User");
/// users.insert(Identifier::single("id", 42_i64), [("name", "Ada")]);
/// assert_eq!(users.len(), 1);
/// assert_eq!(users.load_count(), 0);
/// ```
#[derive(Debug)]
pub struct InMemoryPersister {
	class_name: String,
	rows: DashMap<RowKey, Row>,
	loads: AtomicUsize,
}

impl InMemoryPersister {
	/// Create an empty table for a class
	pub fn new(class_name: impl Into<String>) -> Self {
		Self {
			class_name: class_name.into(),
			rows: DashMap::new(),
			loads: AtomicUsize::new(0),
		}
	}

	/// Store a row, replacing any existing one with the same identifier
	pub fn insert<I, K, V>(&self, identifier: Identifier, values: I)
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<ScalarValue>,
	{
		let row: Row = values
			.into_iter()
			.map(|(k, v)| (k.into(), v.into()))
			.collect();
		self.rows.insert(RowKey::from(&identifier), row);
	}

	/// Remove a row
	pub fn remove(&self, identifier: &Identifier) -> bool {
		self.rows.remove(&RowKey::from(identifier)).is_some()
	}

	/// Number of `load` calls so far
	pub fn load_count(&self) -> usize {
		self.loads.load(Ordering::SeqCst)
	}

	/// Number of stored rows
	pub fn len(&self) -> usize {
		self.rows.len()
	}

	/// Returns true if no rows are stored
	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}
}

#[async_trait]
impl EntityPersister for InMemoryPersister {
	async fn load(&self, identifier: &Identifier, target: &mut dyn Entity) -> ProxyResult<()> {
		self.loads.fetch_add(1, Ordering::SeqCst);

		let row = self
			.rows
			.get(&RowKey::from(identifier))
			.map(|entry| entry.value().clone())
			.ok_or_else(|| ProxyError::RowNotFound {
				class: self.class_name.clone(),
				identifier: identifier.to_string(),
			})?;

		for (field, value) in row {
			target.set_value(&field, value)?;
		}
		Ok(())
	}
}
