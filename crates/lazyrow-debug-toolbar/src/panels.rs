//! Panel system

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::context::ToolbarContext;
use crate::error::ToolbarResult;

#[cfg(feature = "lazy-load-panel")]
pub mod lazy_load;
pub mod registry;

pub use registry::PanelRegistry;

/// A toolbar panel
///
/// Panels collect their own data while instrumented and turn it into
/// [`PanelStats`] for a [`ToolbarContext`] on demand.
#[async_trait]
pub trait Panel: Send + Sync {
	/// Stable identifier, used by [`ToolbarConfig::enabled_panels`](crate::ToolbarConfig)
	fn id(&self) -> &'static str;

	/// Display name
	fn name(&self) -> &'static str;

	/// Higher priorities are shown first
	fn priority(&self) -> i32 {
		0
	}

	/// Start collecting data
	async fn enable_instrumentation(&self) -> ToolbarResult<()> {
		Ok(())
	}

	/// Stop collecting data
	async fn disable_instrumentation(&self) -> ToolbarResult<()> {
		Ok(())
	}

	/// Summarize collected data for a window
	async fn generate_stats(&self, ctx: &ToolbarContext) -> ToolbarResult<PanelStats>;

	/// Render statistics as an HTML fragment
	fn render(&self, stats: &PanelStats) -> ToolbarResult<String>;
}

/// Statistics produced by a panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelStats {
	/// Id of the panel that produced these stats
	pub panel_id: String,
	/// Display name of that panel
	pub panel_name: String,
	/// Panel-specific payload
	pub data: serde_json::Value,
	/// One-line summary shown in the toolbar bar
	pub summary: String,
	/// HTML filled in by [`PanelRegistry::collect`]
	pub rendered_html: Option<String>,
}
