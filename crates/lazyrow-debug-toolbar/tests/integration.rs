//! Registry, rendering and end-to-end lazy-load panel tests

use crate::common::builders::HydrationEventBuilder;
use crate::common::fixtures::*;
use crate::common::canned_panel::{Breaks, Call, CannedPanel};
use chrono::{Duration, Utc};
use lazyrow_debug_toolbar::{
	LazyLoadPanel, Panel, PanelRegistry, ToolbarConfig, ToolbarContext, ToolbarError,
	render_toolbar,
};
use lazyrow_proxy::{HydrationObservers, Identifier, InMemoryPersister, ProxyFactory};
use rstest::*;
use std::sync::Arc;

#[rstest]
fn test_registry_orders_by_priority(mut empty_registry: PanelRegistry) {
	empty_registry.register(Box::new(CannedPanel::new("low").ranked(10)));
	empty_registry.register(Box::new(CannedPanel::new("high").ranked(90)));
	empty_registry.register(Box::new(CannedPanel::new("mid").ranked(50)));

	let ids: Vec<&str> = empty_registry.panels().map(|panel| panel.id()).collect();
	assert_eq!(ids, vec!["high", "mid", "low"]);
}

#[rstest]
#[tokio::test]
async fn test_registry_replaces_same_id(
	mut empty_registry: PanelRegistry,
	enabled_config: ToolbarConfig,
	test_context: ToolbarContext,
) {
	empty_registry.register(Box::new(CannedPanel::new("loads").loads("User", 1)));
	empty_registry.register(Box::new(CannedPanel::new("loads").loads("User", 3)));
	assert_eq!(empty_registry.len(), 1);

	let stats = empty_registry.collect(&test_context, &enabled_config).await;
	assert_eq!(stats[0].summary, "3 lazy-loads");
}

#[rstest]
#[tokio::test]
async fn test_enable_all_honours_enabled_panels(mut empty_registry: PanelRegistry) {
	let shown = CannedPanel::new("shown");
	let hidden = CannedPanel::new("hidden");
	empty_registry.register(Box::new(shown.clone()));
	empty_registry.register(Box::new(hidden.clone()));

	let config = ToolbarConfig::new()
		.with_enabled(true)
		.with_enabled_panels(["shown"]);
	empty_registry.enable_all(&config).await.unwrap();
	empty_registry.disable_all(&config).await.unwrap();

	assert_eq!(shown.calls(Call::Enable), 1);
	assert_eq!(shown.calls(Call::Disable), 1);
	assert_eq!(hidden.calls(Call::Enable), 0);
	assert_eq!(hidden.calls(Call::Disable), 0);
}

#[rstest]
#[tokio::test]
async fn test_collect_skips_failing_panels(
	mut empty_registry: PanelRegistry,
	enabled_config: ToolbarConfig,
	test_context: ToolbarContext,
) {
	empty_registry.register(Box::new(
		CannedPanel::new("ok").loads("Post", 2).loads("User", 1),
	));
	empty_registry.register(Box::new(CannedPanel::new("stats").breaks_at(Breaks::Stats)));
	empty_registry.register(Box::new(CannedPanel::new("render").breaks_at(Breaks::Render)));

	let stats = empty_registry.collect(&test_context, &enabled_config).await;

	assert_eq!(stats.len(), 1);
	assert_eq!(stats[0].panel_id, "ok");
	assert_eq!(stats[0].summary, "3 lazy-loads");
	assert_eq!(stats[0].data["label"], "GET /posts");
	assert_eq!(stats[0].data["by_class"]["Post"], 2);
	assert_eq!(
		stats[0].rendered_html.as_deref(),
		Some(r#"<section data-panel="ok">3 lazy-loads</section>"#)
	);
}

#[rstest]
#[tokio::test]
async fn test_collect_is_empty_when_disabled(
	mut empty_registry: PanelRegistry,
	test_context: ToolbarContext,
) {
	let panel = CannedPanel::new("loads").loads("Post", 4);
	empty_registry.register(Box::new(panel.clone()));

	let config = ToolbarConfig::new().with_enabled(false);
	assert!(empty_registry.collect(&test_context, &config).await.is_empty());
	assert_eq!(panel.calls(Call::Stats), 0);
}

#[rstest]
#[tokio::test]
async fn test_collect_one_unknown_panel(
	empty_registry: PanelRegistry,
	test_context: ToolbarContext,
) {
	let err = empty_registry
		.collect_one("lazy_load", &test_context)
		.await
		.unwrap_err();
	assert!(matches!(err, ToolbarError::PanelNotFound(ref id) if id == "lazy_load"));
}

#[rstest]
#[tokio::test]
async fn test_panel_reports_placeholder_reads(
	post_factory: (Arc<InMemoryPersister>, ProxyFactory),
	enabled_config: ToolbarConfig,
	test_context: ToolbarContext,
) {
	let (posts, factory) = post_factory;
	let mut registry = PanelRegistry::new();
	registry.register(Box::new(
		LazyLoadPanel::attach(&factory)
			.with_threshold(enabled_config.lazy_load_warning_threshold),
	));
	registry.enable_all(&enabled_config).await.unwrap();

	// One placeholder per row, each read in turn
	for id in 1..=6_i64 {
		let post = factory.get_proxy("Post", Identifier::single("id", id)).unwrap();
		post.get("title").await.unwrap();
	}
	assert_eq!(posts.load_count(), 6);

	let stats = registry.collect(&test_context, &enabled_config).await;
	assert_eq!(stats.len(), 1);
	assert_eq!(stats[0].summary, "6 lazy-loads");
	assert_eq!(stats[0].summary, factory.diagnostics().summary());
	assert_eq!(stats[0].data["repeated_classes"], serde_json::json!(["Post"]));

	let html = render_toolbar(&test_context, &stats).unwrap();
	assert!(html.contains("Post hydrated 5+ times"));
	assert!(html.contains("Post(id=6)"));
}

#[rstest]
#[tokio::test]
async fn test_panel_ignores_reads_while_disabled(
	post_factory: (Arc<InMemoryPersister>, ProxyFactory),
	test_context: ToolbarContext,
) {
	let (_posts, factory) = post_factory;
	let panel = LazyLoadPanel::attach(&factory);

	let early = factory.get_proxy("Post", Identifier::single("id", 1_i64)).unwrap();
	early.get("title").await.unwrap();

	panel.enable_instrumentation().await.unwrap();
	let late = factory.get_proxy("Post", Identifier::single("id", 2_i64)).unwrap();
	late.get("title").await.unwrap();
	panel.disable_instrumentation().await.unwrap();

	let stats = panel.generate_stats(&test_context).await.unwrap();
	assert_eq!(stats.summary, "1 lazy-loads");
	assert_eq!(factory.diagnostics().count(), 2);
}

#[rstest]
#[tokio::test]
async fn test_panel_window_excludes_older_events(test_context: ToolbarContext) {
	let panel = LazyLoadPanel::new(Arc::new(HydrationObservers::new()));
	panel.log().record(
		HydrationEventBuilder::new("Post")
			.identifier("id", 1_i64)
			.timestamp(Utc::now() - Duration::hours(1))
			.build(),
	);
	panel.log().record(
		HydrationEventBuilder::new("Post")
			.identifier("id", 2_i64)
			.field("title")
			.build(),
	);

	let stats = panel.generate_stats(&test_context).await.unwrap();
	assert_eq!(stats.summary, "1 lazy-loads");
	assert_eq!(stats.data["events"][0]["identifier"], "id=2");
	assert_eq!(stats.data["events"][0]["field"], "title");
}
