//! Persistence context: metadata, persisters and the hydration hook

use dashmap::DashMap;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

use crate::hook::HydrationHook;
use crate::metadata::{EntityDescriptor, MetadataRegistry};
use crate::persister::EntityPersister;
use crate::{ProxyError, ProxyResult};

/// The unit-of-work side a proxy factory is bound to
///
/// Owns the class metadata, one entity persister per class, and the single
/// hydration hook placeholders of this context use.
///
/// # Examples
///
/// ```
/// use lazyrow_proxy::{impl_entity, FieldState, InMemoryPersister, PersistenceContext};
/// use std::sync::Arc;
///
/// struct User {
///     id: FieldState<i64>,
///     name: FieldState<String>,
/// }
///
/// impl_entity!(User, "User", identifier = [id], fields = { id: i64, name: String });
///
/// let context = PersistenceContext::new();
/// context
///     .register_entity(User::descriptor(), Arc::new(InMemoryPersister::new("User")))
///     .unwrap();
///
/// assert!(context.get_class_metadata("User").is_some());
/// assert!(!context.has_hook());
/// ```
#[derive(Default)]
pub struct PersistenceContext {
	metadata: MetadataRegistry,
	persisters: DashMap<String, Arc<dyn EntityPersister>>,
	hook: RwLock<Option<Arc<dyn HydrationHook>>>,
}

impl PersistenceContext {
	/// Create an empty context
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a descriptor and the persister that loads its rows
	pub fn register_entity(
		&self,
		descriptor: EntityDescriptor,
		persister: Arc<dyn EntityPersister>,
	) -> ProxyResult<Arc<EntityDescriptor>> {
		let descriptor = self.metadata.register(descriptor)?;
		self.register_persister(descriptor.class_name(), persister);
		Ok(descriptor)
	}

	/// Register a descriptor without a persister
	pub fn register_descriptor(
		&self,
		descriptor: EntityDescriptor,
	) -> ProxyResult<Arc<EntityDescriptor>> {
		self.metadata.register(descriptor)
	}

	/// Register or replace the persister for a class
	pub fn register_persister(&self, class_name: &str, persister: Arc<dyn EntityPersister>) {
		self.persisters.insert(class_name.to_string(), persister);
	}

	/// Class metadata registry
	pub fn metadata(&self) -> &MetadataRegistry {
		&self.metadata
	}

	/// Descriptor for a class, if one is registered
	pub fn get_class_metadata(&self, class_name: &str) -> Option<Arc<EntityDescriptor>> {
		self.metadata.get_class_metadata(class_name)
	}

	/// Persister for a class
	pub fn entity_persister(&self, class_name: &str) -> ProxyResult<Arc<dyn EntityPersister>> {
		self.persisters
			.get(class_name)
			.map(|entry| Arc::clone(entry.value()))
			.ok_or_else(|| ProxyError::NoPersister(class_name.to_string()))
	}

	/// Install the hydration hook
	///
	/// Fails with [`ProxyError::HookAlreadyRegistered`] if one is installed.
	pub fn install_hook(&self, hook: Arc<dyn HydrationHook>) -> ProxyResult<()> {
		let mut slot = self.hook.write();
		if slot.is_some() {
			return Err(ProxyError::HookAlreadyRegistered);
		}
		*slot = Some(hook);
		Ok(())
	}

	/// Remove the installed hook, returning it
	///
	/// Placeholders built earlier keep the hook they captured.
	pub fn remove_hook(&self) -> Option<Arc<dyn HydrationHook>> {
		self.hook.write().take()
	}

	/// Currently installed hook
	pub fn hook(&self) -> Option<Arc<dyn HydrationHook>> {
		self.hook.read().clone()
	}

	/// Returns true if a hook is installed
	pub fn has_hook(&self) -> bool {
		self.hook.read().is_some()
	}
}

impl fmt::Debug for PersistenceContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PersistenceContext")
			.field("classes", &self.metadata.class_names())
			.field("persisters", &self.persisters.len())
			.field("has_hook", &self.has_hook())
			.finish()
	}
}
