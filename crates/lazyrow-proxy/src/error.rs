//! Error types for lazy-loading placeholders

use thiserror::Error;

/// Errors raised while building or hydrating placeholders
#[derive(Debug, Error)]
pub enum ProxyError {
	/// No descriptor is registered for the requested class
	#[error("Unknown entity class: {0}")]
	UnknownClass(String),

	/// Hydration was triggered while an identifier field was still uninitialized
	#[error("Identity of {class} is not established: identifier field '{field}' is uninitialized")]
	IdentityNotEstablished {
		/// Entity class name
		class: String,
		/// First identifier field found uninitialized
		field: String,
	},

	/// The persistence context has no entity persister for the class
	#[error("No entity persister registered for class: {0}")]
	NoPersister(String),

	/// The persister found no row for the identifier
	#[error("No {class} row found for identifier ({identifier})")]
	RowNotFound {
		/// Entity class name
		class: String,
		/// Rendered identifier
		identifier: String,
	},

	/// Backend failure reported by a persister, passed through unchanged
	#[error(transparent)]
	Storage(#[from] Box<dyn std::error::Error + Send + Sync>),

	/// A hydration hook is already installed on the persistence context
	#[error("A hydration hook is already registered for this persistence context")]
	HookAlreadyRegistered,

	/// The persistence context backing a hook has been dropped
	#[error("Persistence context has been closed")]
	ContextClosed,

	/// An uninitialized field was read but no hook was available to hydrate it
	#[error("Cannot hydrate {class}.{field}: no hydration hook was registered")]
	NoHydrationHook {
		/// Entity class name
		class: String,
		/// Field whose read triggered the attempt
		field: String,
	},

	/// The field is still uninitialized after hydration ran
	#[error("Field {class}.{field} is uninitialized")]
	Uninitialized {
		/// Entity class name
		class: String,
		/// Field name
		field: String,
	},

	/// A previous hydration attempt failed and left the placeholder unusable
	#[error("Placeholder for {class} is poisoned: {reason}")]
	Poisoned {
		/// Entity class name
		class: String,
		/// Message of the error that poisoned the placeholder
		reason: String,
	},

	/// The entity has no persistent field with this name
	#[error("Attribute not found: {0}")]
	AttributeNotFound(String),

	/// A value could not be converted to the expected type
	#[error("Type mismatch: expected {expected}, got {actual}")]
	TypeMismatch {
		/// Expected type name
		expected: String,
		/// Debug rendering of the actual value
		actual: String,
	},

	/// The descriptor is internally inconsistent
	#[error("Invalid descriptor for {class}: {reason}")]
	InvalidDescriptor {
		/// Entity class name
		class: String,
		/// What is wrong with it
		reason: String,
	},
}

impl ProxyError {
	/// Wrap a backend error so it propagates unchanged through hydration
	///
	/// # Examples
	///
	/// ```
	/// use lazyrow_proxy::ProxyError;
	///
	/// let io = std::io::Error::new(std::io::ErrorKind::Other, "disk unplugged");
	/// let err = ProxyError::storage(io);
	/// assert_eq!(err.to_string(), "disk unplugged");
	/// ```
	pub fn storage<E>(error: E) -> Self
	where
		E: std::error::Error + Send + Sync + 'static,
	{
		ProxyError::Storage(Box::new(error))
	}
}

/// Result type for proxy operations
pub type ProxyResult<T> = Result<T, ProxyError>;
