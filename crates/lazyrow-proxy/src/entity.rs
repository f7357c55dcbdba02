//! Reflection over entity fields
//!
//! Placeholders are ordinary entity instances whose fields are
//! [`FieldState`]s. The [`Entity`] trait gives the factory and the hydration
//! hook raw access to those states, sentinels included, without knowing the
//! concrete type.

use std::any::Any;

use crate::value::{FieldState, ScalarValue};
use crate::ProxyResult;

/// Trait for entity types that can be lazily hydrated
///
/// Usually implemented through [`impl_entity!`](crate::impl_entity).
///
/// ## Example
///
/// ```rust
/// use lazyrow_proxy::{Entity, FieldState, ProxyError, ProxyResult, ScalarValue};
/// use std::any::Any;
///
/// struct User {
///     id: FieldState<i64>,
///     name: FieldState<String>,
/// }
///
/// impl Entity for User {
///     fn class_name(&self) -> &'static str {
///         "User"
///     }
///
///     fn field(&self, name: &str) -> Option<FieldState<ScalarValue>> {
///         match name {
///             "id" => Some(self.id.to_scalar()),
///             "name" => Some(self.name.to_scalar()),
///             _ => None,
///         }
///     }
///
///     fn set_field(&mut self, name: &str, state: FieldState<ScalarValue>) -> ProxyResult<()> {
///         match name {
///             "id" => self.id = FieldState::from_scalar(state)?,
///             "name" => self.name = FieldState::from_scalar(state)?,
///             _ => return Err(ProxyError::AttributeNotFound(name.to_string())),
///         }
///         Ok(())
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
///
///     fn as_any_mut(&mut self) -> &mut dyn Any {
///         self
///     }
/// }
/// ```
pub trait Entity: Any + Send + Sync {
	/// Runtime class name, used to find the entity's descriptor
	fn class_name(&self) -> &'static str;

	/// Raw state of a persistent field, or `None` if the field does not exist
	///
	/// Never triggers hydration.
	fn field(&self, name: &str) -> Option<FieldState<ScalarValue>>;

	/// Overwrite the raw state of a persistent field
	///
	/// Returns an error if the field doesn't exist or the type is incompatible.
	fn set_field(&mut self, name: &str, state: FieldState<ScalarValue>) -> ProxyResult<()>;

	/// Get a reference to self as Any for downcasting
	fn as_any(&self) -> &dyn Any;

	/// Get a mutable reference to self as Any for downcasting
	fn as_any_mut(&mut self) -> &mut dyn Any;

	/// Set a loaded value
	fn set_value(&mut self, name: &str, value: ScalarValue) -> ProxyResult<()> {
		self.set_field(name, FieldState::Loaded(value))
	}

	/// Check if a persistent field exists
	fn has_field(&self, name: &str) -> bool {
		self.field(name).is_some()
	}
}

impl dyn Entity {
	/// Downcast to the concrete entity type
	pub fn downcast_ref<E: Entity>(&self) -> Option<&E> {
		self.as_any().downcast_ref::<E>()
	}

	/// Downcast to the concrete entity type, mutably
	pub fn downcast_mut<E: Entity>(&mut self) -> Option<&mut E> {
		self.as_any_mut().downcast_mut::<E>()
	}
}

/// Implement [`Entity`] for a struct whose fields are all [`FieldState`]s
///
/// Also generates an associated `descriptor()` function returning the
/// [`EntityDescriptor`](crate::EntityDescriptor) for the type. Every field of
/// the struct must be listed, since bare instances are built with all of them
/// uninitialized.
///
/// # Examples
///
/// ```
/// use lazyrow_proxy::{impl_entity, Entity, FieldState};
///
/// struct User {
///     id: FieldState<i64>,
///     name: FieldState<String>,
///     email: FieldState<Option<String>>,
/// }
///
/// impl_entity!(User, "User", identifier = [id], fields = {
///     id: i64,
///     name: String,
///     email: Option<String>,
/// });
///
/// let descriptor = User::descriptor();
/// assert_eq!(descriptor.identifier_field_names(), ["id"]);
///
/// let bare = descriptor.new_instance();
/// assert!(bare.field("name").unwrap().is_uninitialized());
/// ```
#[macro_export]
macro_rules! impl_entity {
	(
		$ty:ident,
		$class:literal,
		identifier = [$($id:ident),+ $(,)?],
		fields = { $($field:ident : $fty:ty),+ $(,)? } $(,)?
	) => {
		impl $crate::Entity for $ty {
			fn class_name(&self) -> &'static str {
				$class
			}

			fn field(
				&self,
				name: &str,
			) -> ::core::option::Option<$crate::FieldState<$crate::ScalarValue>> {
				$(
					if name == stringify!($field) {
						return ::core::option::Option::Some(self.$field.to_scalar());
					}
				)+
				::core::option::Option::None
			}

			fn set_field(
				&mut self,
				name: &str,
				state: $crate::FieldState<$crate::ScalarValue>,
			) -> $crate::ProxyResult<()> {
				$(
					if name == stringify!($field) {
						self.$field = $crate::FieldState::<$fty>::from_scalar(state)?;
						return ::core::result::Result::Ok(());
					}
				)+
				::core::result::Result::Err($crate::ProxyError::AttributeNotFound(
					::std::format!("{}.{}", $class, name),
				))
			}

			fn as_any(&self) -> &dyn ::std::any::Any {
				self
			}

			fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
				self
			}
		}

		impl $ty {
			/// Descriptor for this entity type
			pub fn descriptor() -> $crate::EntityDescriptor {
				$crate::EntityDescriptor::new($class, || {
					::std::boxed::Box::new($ty {
						$($field: $crate::FieldState::Uninitialized),+
					})
				})
				.with_fields([$(stringify!($field)),+])
				.with_identifier([$(stringify!($id)),+])
			}
		}
	};
}
