//! Panel with canned lazy-load counts, for registry and rendering tests

use async_trait::async_trait;
use lazyrow_debug_toolbar::{
	context::ToolbarContext,
	error::{ToolbarError, ToolbarResult},
	panels::{Panel, PanelStats},
};
use parking_lot::Mutex;
use std::sync::Arc;

/// Lifecycle call made on a [`CannedPanel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
	Enable,
	Disable,
	Stats,
}

/// Stage at which a [`CannedPanel`] fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breaks {
	Never,
	Stats,
	Render,
}

/// Panel reporting a fixed number of lazy-loads per class
///
/// Clones share the call journal, so a test keeps a handle after boxing the
/// panel into a registry.
#[derive(Debug, Clone)]
pub struct CannedPanel {
	id: &'static str,
	priority: i32,
	loads: Vec<(&'static str, usize)>,
	breaks: Breaks,
	journal: Arc<Mutex<Vec<Call>>>,
}

impl CannedPanel {
	pub fn new(id: &'static str) -> Self {
		Self {
			id,
			priority: 0,
			loads: Vec::new(),
			breaks: Breaks::Never,
			journal: Arc::new(Mutex::new(Vec::new())),
		}
	}

	pub fn ranked(mut self, priority: i32) -> Self {
		self.priority = priority;
		self
	}

	/// Report `count` lazy-loads of `class`
	pub fn loads(mut self, class: &'static str, count: usize) -> Self {
		self.loads.push((class, count));
		self
	}

	pub fn breaks_at(mut self, breaks: Breaks) -> Self {
		self.breaks = breaks;
		self
	}

	/// How many times `call` was made
	pub fn calls(&self, call: Call) -> usize {
		self.journal.lock().iter().filter(|c| **c == call).count()
	}

	fn total(&self) -> usize {
		self.loads.iter().map(|(_, count)| count).sum()
	}
}

#[async_trait]
impl Panel for CannedPanel {
	fn id(&self) -> &'static str {
		self.id
	}

	fn name(&self) -> &'static str {
		self.id
	}

	fn priority(&self) -> i32 {
		self.priority
	}

	async fn enable_instrumentation(&self) -> ToolbarResult<()> {
		self.journal.lock().push(Call::Enable);
		Ok(())
	}

	async fn disable_instrumentation(&self) -> ToolbarResult<()> {
		self.journal.lock().push(Call::Disable);
		Ok(())
	}

	async fn generate_stats(&self, ctx: &ToolbarContext) -> ToolbarResult<PanelStats> {
		self.journal.lock().push(Call::Stats);
		if self.breaks == Breaks::Stats {
			return Err(ToolbarError::RenderError(format!("{}: no stats", self.id)));
		}

		let by_class: serde_json::Map<String, serde_json::Value> = self
			.loads
			.iter()
			.map(|(class, count)| (class.to_string(), serde_json::json!(count)))
			.collect();
		Ok(PanelStats {
			panel_id: self.id.to_string(),
			panel_name: self.id.to_string(),
			data: serde_json::json!({ "label": ctx.label, "by_class": by_class }),
			summary: format!("{} lazy-loads", self.total()),
			rendered_html: None,
		})
	}

	fn render(&self, stats: &PanelStats) -> ToolbarResult<String> {
		if self.breaks == Breaks::Render {
			return Err(ToolbarError::RenderError(format!("{}: no html", self.id)));
		}
		Ok(format!(
			r#"<section data-panel="{}">{}</section>"#,
			stats.panel_id, stats.summary
		))
	}
}
