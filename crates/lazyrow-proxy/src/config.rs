//! Proxy factory configuration

use serde::Deserialize;

/// Proxy factory configuration
///
/// Deserializable so it can be embedded in a settings file; missing keys
/// take their defaults.
///
/// # Examples
///
/// ```
/// use lazyrow_proxy::ProxyConfig;
///
/// let config = ProxyConfig::new().with_poison_on_failure(false);
/// assert!(config.register_hook);
/// assert!(!config.poison_on_failure);
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
	/// Install the factory's hydration hook on the persistence context
	pub register_hook: bool,

	/// Mark a placeholder unusable after a failed hydration
	pub poison_on_failure: bool,

	/// Subscribe the factory's lazy-load log to hydration events
	pub record_diagnostics: bool,
}

impl Default for ProxyConfig {
	fn default() -> Self {
		Self {
			register_hook: true,
			poison_on_failure: true,
			record_diagnostics: true,
		}
	}
}

impl ProxyConfig {
	/// Create a configuration with default values
	pub fn new() -> Self {
		Self::default()
	}

	/// Set whether the hook is installed
	pub fn with_register_hook(mut self, register: bool) -> Self {
		self.register_hook = register;
		self
	}

	/// Set whether failed hydration poisons the placeholder
	pub fn with_poison_on_failure(mut self, poison: bool) -> Self {
		self.poison_on_failure = poison;
		self
	}

	/// Set whether lazy-loads are recorded
	pub fn with_record_diagnostics(mut self, record: bool) -> Self {
		self.record_diagnostics = record;
		self
	}
}
