//! # Lazyrow
//!
//! Uninitialized-value lazy loading for ORM entities.
//!
//! A proxy factory hands out placeholders: instances of the real entity type
//! with only the identifier set. The first read of any other field hydrates
//! the whole row in place through the persistence context's hydration hook.
//!
//! ## Feature Flags
//!
//! - `debug-toolbar` (default) - Lazy-load diagnostics panel
//! - `full` - All features enabled
//!
//! ## Quick Example
//!
//! ```rust
//! use lazyrow::prelude::*;
//! use std::sync::Arc;
//!
//! struct User {
//!     id: FieldState<i64>,
//!     name: FieldState<String>,
//! }
//!
//! impl_entity!(User, "User", identifier = [id], fields = { id: i64, name: String });
//!
//! # tokio_test::block_on(async {
//! let users = Arc::new(InMemoryPersister::new("User"));
//! users.insert(Identifier::single("id", 42_i64), [("name", "Ada")]);
//!
//! let context = Arc::new(PersistenceContext::new());
//! context.register_entity(User::descriptor(), users).unwrap();
//! let factory = ProxyFactory::create(context, true)?;
//!
//! let user = factory.get_proxy("User", Identifier::single("id", 42_i64))?;
//! assert!(user.peek("name").await?.is_uninitialized());
//! assert_eq!(user.get("name").await?, ScalarValue::from("Ada"));
//! assert_eq!(factory.diagnostics().summary(), "1 lazy-loads");
//! # Ok::<(), ProxyError>(())
//! # }).unwrap();
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub use lazyrow_proxy as proxy;

#[cfg(feature = "debug-toolbar")]
#[cfg_attr(docsrs, doc(cfg(feature = "debug-toolbar")))]
pub use lazyrow_debug_toolbar as debug_toolbar;

pub use lazyrow_proxy::impl_entity;

/// Commonly used types
pub mod prelude {
	pub use lazyrow_proxy::{
		Entity, EntityDescriptor, EntityPersister, FieldState, HydrationEvent, HydrationLog,
		HydrationStatus, Identifier, InMemoryPersister, PersistenceContext, Proxy, ProxyConfig,
		ProxyError, ProxyFactory, ProxyResult, ScalarValue, impl_entity,
	};

	#[cfg(feature = "debug-toolbar")]
	pub use lazyrow_debug_toolbar::{
		LazyLoadPanel, Panel, PanelRegistry, ToolbarConfig, ToolbarContext, render_toolbar,
	};
}
