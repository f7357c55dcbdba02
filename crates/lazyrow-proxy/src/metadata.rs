//! Class metadata for mapped entities

use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;

use crate::entity::Entity;
use crate::{ProxyError, ProxyResult};

type Constructor = Arc<dyn Fn() -> Box<dyn Entity> + Send + Sync>;

/// Describes the persistent shape of an entity class
///
/// Holds the persistent field names, which of them form the identifier, and
/// a constructor for bare instances whose fields are all uninitialized.
#[derive(Clone)]
pub struct EntityDescriptor {
	class_name: String,
	fields: Vec<String>,
	identifier: Vec<String>,
	constructor: Constructor,
}

impl EntityDescriptor {
	/// Create a descriptor with a bare-instance constructor
	///
	/// The constructor must return an instance with every persistent field
	/// uninitialized; normal construction logic is bypassed.
	pub fn new<F>(class_name: impl Into<String>, constructor: F) -> Self
	where
		F: Fn() -> Box<dyn Entity> + Send + Sync + 'static,
	{
		Self {
			class_name: class_name.into(),
			fields: Vec::new(),
			identifier: Vec::new(),
			constructor: Arc::new(constructor),
		}
	}

	/// Set the persistent field names
	pub fn with_fields<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.fields = fields.into_iter().map(Into::into).collect();
		self
	}

	/// Set the identifier field names, in key order
	pub fn with_identifier<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.identifier = fields.into_iter().map(Into::into).collect();
		self
	}

	/// Class name this descriptor maps
	pub fn class_name(&self) -> &str {
		&self.class_name
	}

	/// Persistent field names
	pub fn field_names(&self) -> &[String] {
		&self.fields
	}

	/// Identifier field names in key order
	pub fn identifier_field_names(&self) -> &[String] {
		&self.identifier
	}

	/// Returns true if the field is part of the identifier
	pub fn is_identifier(&self, field: &str) -> bool {
		self.identifier.iter().any(|f| f == field)
	}

	/// Returns true if the field is persistent
	pub fn has_field(&self, field: &str) -> bool {
		self.fields.iter().any(|f| f == field)
	}

	/// Non-identifier persistent fields
	pub fn lazy_field_names(&self) -> impl Iterator<Item = &str> {
		self.fields
			.iter()
			.filter(|f| !self.is_identifier(f))
			.map(String::as_str)
	}

	/// Build a bare instance
	pub fn new_instance(&self) -> Box<dyn Entity> {
		(self.constructor)()
	}

	/// Check the descriptor is usable for placeholders
	///
	/// The identifier must be a non-empty subset of the persistent fields,
	/// and the constructor must build an instance of this class on which every
	/// persistent field exists and is uninitialized.
	pub fn validate(&self) -> ProxyResult<()> {
		if self.identifier.is_empty() {
			return Err(self.invalid("no identifier fields declared"));
		}
		if let Some(missing) = self.identifier.iter().find(|f| !self.has_field(f)) {
			return Err(self.invalid(format!(
				"identifier field '{}' is not a persistent field",
				missing
			)));
		}

		let bare = self.new_instance();
		if bare.class_name() != self.class_name {
			return Err(self.invalid(format!(
				"constructor builds a '{}' instance",
				bare.class_name()
			)));
		}
		for field in &self.fields {
			match bare.field(field) {
				None => {
					return Err(self.invalid(format!(
						"field '{}' does not exist on the instance",
						field
					)));
				}
				Some(state) if !state.is_uninitialized() => {
					return Err(self.invalid(format!(
						"constructor leaves field '{}' initialized",
						field
					)));
				}
				Some(_) => {}
			}
		}
		Ok(())
	}

	fn invalid(&self, reason: impl Into<String>) -> ProxyError {
		ProxyError::InvalidDescriptor {
			class: self.class_name.clone(),
			reason: reason.into(),
		}
	}
}

impl fmt::Debug for EntityDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EntityDescriptor")
			.field("class_name", &self.class_name)
			.field("fields", &self.fields)
			.field("identifier", &self.identifier)
			.finish_non_exhaustive()
	}
}

/// Registry of entity descriptors, keyed by class name
#[derive(Debug, Default)]
pub struct MetadataRegistry {
	descriptors: DashMap<String, Arc<EntityDescriptor>>,
}

impl MetadataRegistry {
	/// Create an empty registry
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a descriptor, replacing any previous one for the class
	pub fn register(&self, descriptor: EntityDescriptor) -> ProxyResult<Arc<EntityDescriptor>> {
		descriptor.validate()?;
		let descriptor = Arc::new(descriptor);
		self.descriptors
			.insert(descriptor.class_name().to_string(), Arc::clone(&descriptor));
		Ok(descriptor)
	}

	/// Descriptor for a class, if one is registered
	pub fn get_class_metadata(&self, class_name: &str) -> Option<Arc<EntityDescriptor>> {
		self.descriptors
			.get(class_name)
			.map(|entry| Arc::clone(entry.value()))
	}

	/// Returns true if the class is registered
	pub fn contains(&self, class_name: &str) -> bool {
		self.descriptors.contains_key(class_name)
	}

	/// Registered class names
	pub fn class_names(&self) -> Vec<String> {
		let mut names: Vec<String> = self
			.descriptors
			.iter()
			.map(|entry| entry.key().clone())
			.collect();
		names.sort();
		names
	}

	/// Number of registered classes
	pub fn len(&self) -> usize {
		self.descriptors.len()
	}

	/// Returns true if nothing is registered
	pub fn is_empty(&self) -> bool {
		self.descriptors.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::impl_entity;
	use crate::value::FieldState;
	use rstest::rstest;

	struct Account {
		tenant: FieldState<String>,
		number: FieldState<i64>,
		balance: FieldState<f64>,
	}

	impl_entity!(Account, "Account", identifier = [tenant, number], fields = {
		tenant: String,
		number: i64,
		balance: f64,
	});

	#[rstest]
	fn test_descriptor_from_macro() {
		let descriptor = Account::descriptor();
		assert_eq!(descriptor.class_name(), "Account");
		assert_eq!(descriptor.identifier_field_names(), ["tenant", "number"]);
		assert_eq!(descriptor.lazy_field_names().collect::<Vec<_>>(), vec!["balance"]);
		assert!(descriptor.validate().is_ok());
	}

	#[rstest]
	fn test_new_instance_is_bare() {
		let bare = Account::descriptor().new_instance();
		for field in ["tenant", "number", "balance"] {
			assert!(bare.field(field).unwrap().is_uninitialized());
		}
		assert_eq!(bare.class_name(), "Account");
	}

	struct Ledger {
		number: FieldState<i64>,
	}

	impl_entity!(Ledger, "Ledger", identifier = [number], fields = { number: i64 });

	fn ledger_posing_as_account() -> EntityDescriptor {
		EntityDescriptor::new("Account", || Box::new(Ledger { number: FieldState::Uninitialized }))
			.with_fields(["number"])
			.with_identifier(["number"])
	}

	fn prefilled_account() -> EntityDescriptor {
		EntityDescriptor::new("Account", || {
			Box::new(Account {
				tenant: FieldState::Uninitialized,
				number: FieldState::Uninitialized,
				balance: FieldState::Loaded(0.0),
			})
		})
		.with_fields(["tenant", "number", "balance"])
		.with_identifier(["tenant", "number"])
	}

	#[rstest]
	#[case::no_identifier(Account::descriptor().with_identifier(Vec::<String>::new()))]
	#[case::foreign_identifier(Account::descriptor().with_identifier(["uuid"]))]
	#[case::wrong_class(ledger_posing_as_account())]
	#[case::undeclared_field(Account::descriptor().with_fields(["tenant", "number", "overdraft"]))]
	#[case::initialized_field(prefilled_account())]
	fn test_invalid_descriptor_rejected(#[case] descriptor: EntityDescriptor) {
		let registry = MetadataRegistry::new();
		let err = registry.register(descriptor).unwrap_err();
		assert!(matches!(err, ProxyError::InvalidDescriptor { .. }));
		assert!(registry.is_empty());
	}

	#[rstest]
	fn test_registry_lookup() {
		let registry = MetadataRegistry::new();
		registry.register(Account::descriptor()).unwrap();

		assert!(registry.contains("Account"));
		assert!(registry.get_class_metadata("Account").is_some());
		assert!(registry.get_class_metadata("Ledger").is_none());
		assert_eq!(registry.class_names(), vec!["Account".to_string()]);
	}
}
