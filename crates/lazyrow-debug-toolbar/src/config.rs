//! Toolbar configuration

use serde::Deserialize;

/// Debug toolbar configuration
///
/// Missing keys take their defaults when deserialized from a settings file.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ToolbarConfig {
	/// Whether the toolbar collects and renders anything
	pub enabled: bool,

	/// Ids of the panels to show; empty means all registered panels
	pub enabled_panels: Vec<String>,

	/// Hydrations of one class at which the lazy-load panel warns
	pub lazy_load_warning_threshold: usize,
}

impl Default for ToolbarConfig {
	fn default() -> Self {
		Self {
			enabled: cfg!(debug_assertions),
			enabled_panels: Vec::new(),
			lazy_load_warning_threshold: 5,
		}
	}
}

impl ToolbarConfig {
	/// Create a configuration with default values
	pub fn new() -> Self {
		Self::default()
	}

	/// Set whether the toolbar is enabled
	pub fn with_enabled(mut self, enabled: bool) -> Self {
		self.enabled = enabled;
		self
	}

	/// Restrict the toolbar to the given panel ids
	pub fn with_enabled_panels<I, S>(mut self, panels: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.enabled_panels = panels.into_iter().map(Into::into).collect();
		self
	}

	/// Set the repeated-hydration warning threshold
	pub fn with_lazy_load_warning_threshold(mut self, threshold: usize) -> Self {
		self.lazy_load_warning_threshold = threshold;
		self
	}

	/// Returns true if the panel should be collected and rendered
	pub fn is_panel_enabled(&self, panel_id: &str) -> bool {
		self.enabled_panels.is_empty() || self.enabled_panels.iter().any(|id| id == panel_id)
	}
}
