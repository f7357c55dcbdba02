//! Placeholder handles
//!
//! A [`Proxy`] wraps one entity instance built by the factory. Every read
//! goes through the handle, which checks the field state and calls the
//! captured hydration hook the first time an uninitialized field is touched.

use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::entity::Entity;
use crate::hook::HydrationHook;
use crate::identifier::Identifier;
use crate::metadata::EntityDescriptor;
use crate::value::{FieldState, ScalarValue};
use crate::{ProxyError, ProxyResult};

/// Hydration progress of a placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HydrationStatus {
	/// Not hydrated yet
	Pending,
	/// The hook ran successfully and left no field uninitialized; it will
	/// not run again
	Hydrated,
	/// A hydration attempt failed; holds the error message
	Poisoned(String),
}

struct ProxyState {
	entity: Box<dyn Entity>,
	status: HydrationStatus,
}

struct ProxyInner {
	descriptor: Arc<EntityDescriptor>,
	hook: Option<Arc<dyn HydrationHook>>,
	poison_on_failure: bool,
	state: Mutex<ProxyState>,
}

/// Shared handle to a lazily hydrated entity
///
/// Cloning the handle shares the same instance. Concurrent first reads are
/// serialized on the instance, so the hook runs at most once and every reader
/// observes the hydrated state.
#[derive(Clone)]
pub struct Proxy {
	inner: Arc<ProxyInner>,
}

impl Proxy {
	pub(crate) fn new(
		descriptor: Arc<EntityDescriptor>,
		entity: Box<dyn Entity>,
		hook: Option<Arc<dyn HydrationHook>>,
		poison_on_failure: bool,
	) -> Self {
		Self {
			inner: Arc::new(ProxyInner {
				descriptor,
				hook,
				poison_on_failure,
				state: Mutex::new(ProxyState {
					entity,
					status: HydrationStatus::Pending,
				}),
			}),
		}
	}

	/// Class name of the wrapped entity
	pub fn class_name(&self) -> &str {
		self.inner.descriptor.class_name()
	}

	/// Descriptor the placeholder was built from
	pub fn descriptor(&self) -> &Arc<EntityDescriptor> {
		&self.inner.descriptor
	}

	/// Returns true if both handles share one instance
	pub fn ptr_eq(&self, other: &Proxy) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}

	/// Read a field, hydrating the entity first if the field is uninitialized
	///
	/// # Examples
	///
	/// ```
	/// use lazyrow_proxy::{
	///     impl_entity, FieldState, Identifier, InMemoryPersister, PersistenceContext, ProxyFactory,
	///     ScalarValue,
	/// };
	/// use std::sync::Arc;
	///
	/// struct User {
	///     id: FieldState<i64>,
	///     name: FieldState<String>,
	/// }
	///
	/// impl_entity!(User, "User", identifier = [id], fields = { id: i64, name: String });
	///
	/// # tokio_test::block_on(async {
	/// let users = Arc::new(InMemoryPersister::new("User"));
	/// users.insert(Identifier::single("id", 42_i64), [("name", "Ada")]);
	///
	/// let context = Arc::new(PersistenceContext::new());
	/// context.register_entity(User::descriptor(), users.clone()).unwrap();
	/// let factory = ProxyFactory::create(context, true).unwrap();
	///
	/// let user = factory.get_proxy("User", Identifier::single("id", 42_i64)).unwrap();
	/// assert_eq!(users.load_count(), 0);
	///
	/// assert_eq!(user.get("name").await.unwrap(), ScalarValue::from("Ada"));
	/// assert_eq!(users.load_count(), 1);
	/// # });
	/// ```
	pub async fn get(&self, field: &str) -> ProxyResult<ScalarValue> {
		let mut state = self.inner.state.lock().await;
		match self.raw_field(&state, field)? {
			FieldState::Loaded(value) => return Ok(value),
			FieldState::Uninitialized => {}
		}

		self.hydrate_locked(&mut state, field).await?;

		match self.raw_field(&state, field)? {
			FieldState::Loaded(value) => Ok(value),
			FieldState::Uninitialized => Err(self.uninitialized(field)),
		}
	}

	/// Write a field without triggering hydration
	pub async fn set(&self, field: &str, value: impl Into<ScalarValue>) -> ProxyResult<()> {
		let mut state = self.inner.state.lock().await;
		state.entity.set_value(field, value.into())
	}

	/// Raw state of a field; never triggers hydration
	pub async fn peek(&self, field: &str) -> ProxyResult<FieldState<ScalarValue>> {
		let state = self.inner.state.lock().await;
		self.raw_field(&state, field)
	}

	/// Hydrate now if any persistent field is still uninitialized
	pub async fn initialize(&self) -> ProxyResult<()> {
		let mut state = self.inner.state.lock().await;
		if let Some(field) = self.first_uninitialized(&state) {
			self.hydrate_locked(&mut state, &field).await?;
		}
		Ok(())
	}

	/// Returns true when no persistent field holds the marker
	pub async fn is_initialized(&self) -> bool {
		let state = self.inner.state.lock().await;
		self.first_uninitialized(&state).is_none()
	}

	/// Current hydration status
	pub async fn status(&self) -> HydrationStatus {
		self.inner.state.lock().await.status.clone()
	}

	/// Recover the identifier from the placeholder's own identifier fields
	pub async fn identifier(&self) -> ProxyResult<Identifier> {
		let state = self.inner.state.lock().await;
		recover_identifier(&self.inner.descriptor, state.entity.as_ref())
	}

	/// Run `f` against the concrete entity, hydrating first if needed
	///
	/// Fails with [`ProxyError::TypeMismatch`] if the entity is not an `E`.
	pub async fn with_entity<E, R, F>(&self, f: F) -> ProxyResult<R>
	where
		E: Entity,
		F: FnOnce(&E) -> R,
	{
		let mut state = self.inner.state.lock().await;
		if let Some(field) = self.first_uninitialized(&state) {
			self.hydrate_locked(&mut state, &field).await?;
		}
		let entity = state
			.entity
			.downcast_ref::<E>()
			.ok_or_else(|| ProxyError::TypeMismatch {
				expected: std::any::type_name::<E>().to_string(),
				actual: self.class_name().to_string(),
			})?;
		Ok(f(entity))
	}

	async fn hydrate_locked(&self, state: &mut ProxyState, field: &str) -> ProxyResult<()> {
		match &state.status {
			HydrationStatus::Hydrated => return Ok(()),
			HydrationStatus::Poisoned(reason) => {
				return Err(ProxyError::Poisoned {
					class: self.class_name().to_string(),
					reason: reason.clone(),
				});
			}
			HydrationStatus::Pending => {}
		}

		let hook = self
			.inner
			.hook
			.as_ref()
			.ok_or_else(|| ProxyError::NoHydrationHook {
				class: self.class_name().to_string(),
				field: field.to_string(),
			})?;

		let outcome = match hook.hydrate(state.entity.as_mut(), field).await {
			// A successful hook must leave no persistent field uninitialized
			Ok(()) => match self.first_uninitialized(state) {
				Some(missing) => Err(self.uninitialized(&missing)),
				None => Ok(()),
			},
			Err(err) => Err(err),
		};

		match outcome {
			Ok(()) => {
				state.status = HydrationStatus::Hydrated;
				Ok(())
			}
			// Nothing was loaded; the caller may still fix the identifier
			Err(err @ ProxyError::IdentityNotEstablished { .. }) => Err(err),
			Err(err) => {
				if self.inner.poison_on_failure {
					tracing::warn!(
						class = self.class_name(),
						field,
						error = %err,
						"Hydration failed, poisoning placeholder"
					);
					state.status = HydrationStatus::Poisoned(err.to_string());
				}
				Err(err)
			}
		}
	}

	fn raw_field(&self, state: &ProxyState, field: &str) -> ProxyResult<FieldState<ScalarValue>> {
		state
			.entity
			.field(field)
			.ok_or_else(|| ProxyError::AttributeNotFound(format!("{}.{}", self.class_name(), field)))
	}

	fn first_uninitialized(&self, state: &ProxyState) -> Option<String> {
		self.inner
			.descriptor
			.field_names()
			.iter()
			.find(|name| {
				state
					.entity
					.field(name)
					.is_some_and(|value| value.is_uninitialized())
			})
			.cloned()
	}

	fn uninitialized(&self, field: &str) -> ProxyError {
		ProxyError::Uninitialized {
			class: self.class_name().to_string(),
			field: field.to_string(),
		}
	}
}

impl fmt::Debug for Proxy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Proxy")
			.field("class_name", &self.class_name())
			.field("has_hook", &self.inner.hook.is_some())
			.finish_non_exhaustive()
	}
}

/// Read the identifier fields off an entity in descriptor order
///
/// Fails with [`ProxyError::IdentityNotEstablished`] on the first identifier
/// field that is missing or still uninitialized.
pub(crate) fn recover_identifier(
	descriptor: &EntityDescriptor,
	entity: &dyn Entity,
) -> ProxyResult<Identifier> {
	let mut identifier = Identifier::new();
	for name in descriptor.identifier_field_names() {
		match entity.field(name) {
			Some(FieldState::Loaded(value)) => identifier.insert(name.as_str(), value),
			Some(FieldState::Uninitialized) | None => {
				return Err(ProxyError::IdentityNotEstablished {
					class: descriptor.class_name().to_string(),
					field: name.clone(),
				});
			}
		}
	}
	Ok(identifier)
}
