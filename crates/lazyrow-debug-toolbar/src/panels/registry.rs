//! Panel registry

use crate::config::ToolbarConfig;
use crate::context::ToolbarContext;
use crate::error::{ToolbarError, ToolbarResult};
use crate::panels::{Panel, PanelStats};

/// Ordered set of panels, highest priority first
#[derive(Default)]
pub struct PanelRegistry {
	panels: Vec<Box<dyn Panel>>,
}

impl PanelRegistry {
	/// Create an empty registry
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a panel, replacing any panel with the same id
	pub fn register(&mut self, panel: Box<dyn Panel>) {
		self.panels.retain(|existing| existing.id() != panel.id());
		self.panels.push(panel);
		// Stable sort keeps registration order among equal priorities
		self.panels
			.sort_by_key(|panel| std::cmp::Reverse(panel.priority()));
	}

	/// Look up a panel by id
	pub fn get(&self, id: &str) -> Option<&dyn Panel> {
		self.panels
			.iter()
			.find(|panel| panel.id() == id)
			.map(|panel| panel.as_ref())
	}

	/// Panels in display order
	pub fn panels(&self) -> impl Iterator<Item = &dyn Panel> {
		self.panels.iter().map(|panel| panel.as_ref())
	}

	/// Number of registered panels
	pub fn len(&self) -> usize {
		self.panels.len()
	}

	/// Returns true if no panel is registered
	pub fn is_empty(&self) -> bool {
		self.panels.is_empty()
	}

	/// Switch on instrumentation of every panel the configuration enables
	pub async fn enable_all(&self, config: &ToolbarConfig) -> ToolbarResult<()> {
		for panel in self.enabled_panels(config) {
			panel.enable_instrumentation().await?;
			tracing::debug!(panel = panel.id(), "Enabled panel instrumentation");
		}
		Ok(())
	}

	/// Switch off instrumentation of every panel the configuration enables
	pub async fn disable_all(&self, config: &ToolbarConfig) -> ToolbarResult<()> {
		for panel in self.enabled_panels(config) {
			panel.disable_instrumentation().await?;
		}
		Ok(())
	}

	/// Generate and render stats of every enabled panel
	///
	/// Returns nothing when the toolbar is disabled. A failing panel is logged
	/// and left out rather than failing the whole toolbar.
	pub async fn collect(
		&self,
		ctx: &ToolbarContext,
		config: &ToolbarConfig,
	) -> Vec<PanelStats> {
		if !config.enabled {
			return Vec::new();
		}

		let mut collected = Vec::new();
		for panel in self.enabled_panels(config) {
			match Self::collect_panel(panel, ctx).await {
				Ok(stats) => collected.push(stats),
				Err(error) => {
					tracing::warn!(panel = panel.id(), error = %error, "Skipping panel");
				}
			}
		}
		collected
	}

	/// Generate and render stats of one panel
	pub async fn collect_one(&self, id: &str, ctx: &ToolbarContext) -> ToolbarResult<PanelStats> {
		let panel = self
			.get(id)
			.ok_or_else(|| ToolbarError::PanelNotFound(id.to_string()))?;
		Self::collect_panel(panel, ctx).await
	}

	async fn collect_panel(panel: &dyn Panel, ctx: &ToolbarContext) -> ToolbarResult<PanelStats> {
		let mut stats = panel.generate_stats(ctx).await?;
		stats.rendered_html = Some(panel.render(&stats)?);
		Ok(stats)
	}

	fn enabled_panels<'a>(
		&'a self,
		config: &'a ToolbarConfig,
	) -> impl Iterator<Item = &'a dyn Panel> + 'a {
		self.panels()
			.filter(move |panel| config.is_panel_enabled(panel.id()))
	}
}
