//! # Lazyrow Proxy
//!
//! Lazy-loading placeholders for ORM entities.
//!
//! A placeholder is an ordinary instance of the entity type whose
//! identifier fields are set and whose other persistent fields hold
//! [`FieldState::Uninitialized`]. The first read of such a field through a
//! [`Proxy`] handle runs the persistence context's [`HydrationHook`], which
//! recovers the identifier from the instance and asks the class's
//! [`EntityPersister`] to fill the fields in place.
//!
//! ## Quick Start
//!
//! ```rust
//! use lazyrow_proxy::{
//!     impl_entity, FieldState, Identifier, InMemoryPersister, PersistenceContext, ProxyFactory,
//!     ScalarValue,
//! };
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
//!
//! let factory = ProxyFactory::create(context, true).unwrap();
//! let user = factory.get_proxy("User", Identifier::single("id", 42_i64)).unwrap();
//!
//! assert_eq!(user.get("name").await.unwrap(), ScalarValue::from("Ada"));
//! assert_eq!(factory.diagnostics().summary(), "1 lazy-loads");
//! # });
//! ```
//!
//! ## Architecture
//!
//! 1. **Metadata**: [`EntityDescriptor`]s registered in a [`MetadataRegistry`]
//! 2. **Context**: [`PersistenceContext`] owns metadata, persisters and the hook slot
//! 3. **Factory**: [`ProxyFactory`] builds placeholders and installs the hook
//! 4. **Diagnostics**: [`HydrationLog`] observes every completed lazy-load

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

pub mod config;
pub mod context;
pub mod diagnostics;
pub mod entity;
pub mod error;
pub mod events;
pub mod factory;
pub mod hook;
pub mod identifier;
pub mod metadata;
pub mod persister;
pub mod proxy;
pub mod value;

pub use config::ProxyConfig;
pub use context::PersistenceContext;
pub use diagnostics::HydrationLog;
pub use entity::Entity;
pub use error::{ProxyError, ProxyResult};
pub use events::{HydrationEvent, HydrationObserver, HydrationObservers, ObserverId};
pub use factory::{Hydrator, ProxyFactory, ProxyProvider};
pub use hook::HydrationHook;
pub use identifier::Identifier;
pub use metadata::{EntityDescriptor, MetadataRegistry};
pub use persister::{EntityPersister, InMemoryPersister, Row};
pub use proxy::{HydrationStatus, Proxy};
pub use value::{FieldState, ScalarType, ScalarValue};
