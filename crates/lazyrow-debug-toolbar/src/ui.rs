//! Toolbar rendering

use crate::context::ToolbarContext;
use crate::error::{ToolbarError, ToolbarResult};
use crate::panels::PanelStats;
use crate::utils::html_escape;

/// Render collected panel stats as a self-contained HTML fragment
///
/// Every panel must already carry its rendered HTML, as produced by
/// [`PanelRegistry::collect`](crate::PanelRegistry::collect).
///
/// # Examples
///
/// ```
/// use lazyrow_debug_toolbar::{PanelStats, ToolbarContext, render_toolbar};
///
/// let stats = PanelStats {
///     panel_id: "lazy_load".to_string(),
///     panel_name: "Lazy Loads".to_string(),
///     data: serde_json::json!({}),
///     summary: "0 lazy-loads".to_string(),
///     rendered_html: Some("<p>nothing</p>".to_string()),
/// };
///
/// let html = render_toolbar(&ToolbarContext::new("GET /users"), &[stats]).unwrap();
/// assert!(html.contains("0 lazy-loads"));
/// ```
pub fn render_toolbar(ctx: &ToolbarContext, panel_stats: &[PanelStats]) -> ToolbarResult<String> {
	let mut tabs = String::new();
	let mut bodies = String::new();

	for stats in panel_stats {
		let body = stats.rendered_html.as_deref().ok_or_else(|| {
			ToolbarError::RenderError(format!("Panel '{}' has not been rendered", stats.panel_id))
		})?;
		let id = html_escape(&stats.panel_id);

		tabs.push_str(&format!(
			r#"<li class="lzr-tab" data-panel="{}"><strong>{}</strong> <small>{}</small></li>"#,
			id,
			html_escape(&stats.panel_name),
			html_escape(&stats.summary)
		));
		bodies.push_str(&format!(
			r#"<section class="lzr-panel" id="lzr-panel-{}">{}</section>"#,
			id, body
		));
	}

	Ok(format!(
		r#"<div id="lzr-debug-toolbar">
	<header>{} <small>{}</small></header>
	<ul class="lzr-tabs">{}</ul>
	{}
</div>"#,
		html_escape(&ctx.label),
		ctx.started_at.to_rfc3339(),
		tabs,
		bodies
	))
}
