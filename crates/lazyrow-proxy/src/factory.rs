//! Proxy factory and the hydration routine

use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Weak};

use crate::config::ProxyConfig;
use crate::context::PersistenceContext;
use crate::diagnostics::HydrationLog;
use crate::entity::Entity;
use crate::events::{HydrationEvent, HydrationObservers};
use crate::hook::HydrationHook;
use crate::identifier::Identifier;
use crate::proxy::{Proxy, recover_identifier};
use crate::{ProxyError, ProxyResult};

/// Common contract of proxy factory strategies
///
/// Strategies that generate proxy types ahead of time use
/// `generate_proxy_classes`; the uninitialized-value strategy has nothing to
/// generate.
pub trait ProxyProvider: Send + Sync {
	/// Build a placeholder for `class_name` with the given identifier
	fn get_proxy(&self, class_name: &str, identifier: Identifier) -> ProxyResult<Proxy>;

	/// Generate proxy types for `classes` into `target_dir`
	fn generate_proxy_classes(&self, classes: &[&str], target_dir: Option<&Path>) -> ProxyResult<()>;
}

/// The hook installed by a [`ProxyFactory`]
///
/// Holds the context weakly: the context owns the hook, not the reverse.
pub struct Hydrator {
	context: Weak<PersistenceContext>,
	observers: Arc<HydrationObservers>,
}

impl Hydrator {
	/// Create a hydrator for a context
	pub fn new(context: &Arc<PersistenceContext>, observers: Arc<HydrationObservers>) -> Self {
		Self {
			context: Arc::downgrade(context),
			observers,
		}
	}
}

#[async_trait]
impl HydrationHook for Hydrator {
	async fn hydrate(&self, obj: &mut dyn Entity, triggering_field: &str) -> ProxyResult<()> {
		let context = self.context.upgrade().ok_or(ProxyError::ContextClosed)?;
		let class_name = obj.class_name();

		// Objects outside the mapping are not ours to load
		let Some(descriptor) = context.get_class_metadata(class_name) else {
			tracing::debug!(class = class_name, "No metadata for class, skipping hydration");
			return Ok(());
		};

		let identifier = recover_identifier(&descriptor, obj)?;
		tracing::trace!(
			class = class_name,
			identifier = %identifier,
			field = triggering_field,
			"Hydrating placeholder"
		);

		let persister = context.entity_persister(class_name)?;
		persister.load(&identifier, obj).await?;

		self.observers
			.notify(&HydrationEvent::new(class_name, identifier, triggering_field));
		Ok(())
	}
}

/// Builds placeholders bound to one persistence context
///
/// # Examples
///
/// ```
/// use lazyrow_proxy::{impl_entity, FieldState, Identifier, PersistenceContext, ProxyFactory};
/// use lazyrow_proxy::InMemoryPersister;
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
/// let context = Arc::new(PersistenceContext::new());
/// context
///     .register_entity(User::descriptor(), Arc::new(InMemoryPersister::new("User")))
///     .unwrap();
///
/// let factory = ProxyFactory::create(context.clone(), true).unwrap();
/// assert!(context.has_hook());
///
/// let user = factory.get_proxy("User", Identifier::single("id", 42_i64)).unwrap();
/// assert!(user.peek("name").await.unwrap().is_uninitialized());
/// # });
/// ```
pub struct ProxyFactory {
	context: Arc<PersistenceContext>,
	hydrator: Arc<Hydrator>,
	observers: Arc<HydrationObservers>,
	log: Arc<HydrationLog>,
	config: ProxyConfig,
	hook_registered: bool,
}

impl std::fmt::Debug for ProxyFactory {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ProxyFactory")
			.field("context", &self.context)
			.field("config", &self.config)
			.field("hook_registered", &self.hook_registered)
			.finish_non_exhaustive()
	}
}

impl ProxyFactory {
	/// Bind a factory to a context, optionally installing its hook
	pub fn create(context: Arc<PersistenceContext>, register_hook: bool) -> ProxyResult<Self> {
		Self::with_config(context, ProxyConfig::new().with_register_hook(register_hook))
	}

	/// Bind a factory to a context with explicit configuration
	///
	/// Fails with [`ProxyError::HookAlreadyRegistered`] if the configuration
	/// asks for the hook and the context already has one.
	pub fn with_config(context: Arc<PersistenceContext>, config: ProxyConfig) -> ProxyResult<Self> {
		let observers = Arc::new(HydrationObservers::new());
		let log = Arc::new(HydrationLog::new());
		let hydrator = Arc::new(Hydrator::new(&context, Arc::clone(&observers)));

		if config.register_hook {
			context.install_hook(hydrator.clone())?;
			if config.record_diagnostics {
				observers.subscribe(log.clone());
			}
			tracing::debug!("Registered lazy-load hydration hook");
		}

		Ok(Self {
			context,
			hydrator,
			observers,
			log,
			hook_registered: config.register_hook,
			config,
		})
	}

	/// Build a placeholder for `class_name`
	///
	/// Identifier fields present in `identifier` are set; every other
	/// persistent field stays uninitialized. Does not touch storage.
	pub fn get_proxy(&self, class_name: &str, identifier: Identifier) -> ProxyResult<Proxy> {
		let descriptor = self
			.context
			.get_class_metadata(class_name)
			.ok_or_else(|| ProxyError::UnknownClass(class_name.to_string()))?;

		let mut entity = descriptor.new_instance();
		for (field, value) in identifier.iter() {
			if descriptor.is_identifier(field) {
				entity.set_value(field, value.clone())?;
			}
		}

		tracing::debug!(class = class_name, identifier = %identifier, "Created placeholder");
		Ok(Proxy::new(
			descriptor,
			entity,
			self.context.hook(),
			self.config.poison_on_failure,
		))
	}

	/// No-op: placeholders are plain instances, there is nothing to generate
	pub fn generate_proxy_classes(
		&self,
		classes: &[&str],
		target_dir: Option<&Path>,
	) -> ProxyResult<()> {
		tracing::debug!(
			classes = classes.len(),
			target_dir = ?target_dir,
			"Proxy class generation is not needed for uninitialized-value proxies"
		);
		Ok(())
	}

	/// Run this factory's hydration routine on `obj`
	pub async fn hydrate(&self, obj: &mut dyn Entity, triggering_field: &str) -> ProxyResult<()> {
		self.hydrator.hydrate(obj, triggering_field).await
	}

	/// Remove this factory's hook from the context
	///
	/// Returns false if the installed hook belongs to someone else or none is
	/// installed; that hook is left in place.
	pub fn unregister_hook(&mut self) -> bool {
		let Some(installed) = self.context.hook() else {
			return false;
		};
		let ours: Arc<dyn HydrationHook> = self.hydrator.clone();
		if !Arc::ptr_eq(&installed, &ours) {
			return false;
		}
		self.context.remove_hook();
		self.hook_registered = false;
		true
	}

	/// Whether this factory's hook is installed
	pub fn hook_registered(&self) -> bool {
		self.hook_registered
	}

	/// The bound persistence context
	pub fn context(&self) -> &Arc<PersistenceContext> {
		&self.context
	}

	/// Observers notified after each hydration
	pub fn observers(&self) -> &Arc<HydrationObservers> {
		&self.observers
	}

	/// Lazy-load log fed by this factory's hook
	pub fn diagnostics(&self) -> &Arc<HydrationLog> {
		&self.log
	}

	/// Active configuration
	pub fn config(&self) -> &ProxyConfig {
		&self.config
	}
}

impl ProxyProvider for ProxyFactory {
	fn get_proxy(&self, class_name: &str, identifier: Identifier) -> ProxyResult<Proxy> {
		ProxyFactory::get_proxy(self, class_name, identifier)
	}

	fn generate_proxy_classes(&self, classes: &[&str], target_dir: Option<&Path>) -> ProxyResult<()> {
		ProxyFactory::generate_proxy_classes(self, classes, target_dir)
	}
}
