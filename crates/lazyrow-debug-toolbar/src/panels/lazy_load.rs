//! Lazy-load debugging panel

use async_trait::async_trait;
use indexmap::IndexMap;
use lazyrow_proxy::{HydrationEvent, HydrationLog, HydrationObservers, ObserverId, ProxyFactory};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::context::ToolbarContext;
use crate::error::ToolbarResult;
use crate::panels::{Panel, PanelStats};
use crate::utils::html_escape;

/// Panel listing every placeholder hydration in the window
///
/// While instrumented the panel keeps its own log subscribed to a factory's
/// hydration observers. It flags classes hydrated at least `warning_threshold`
/// times (a loop touching one placeholder after another) and rows hydrated
/// more than once (several placeholders for the same row).
pub struct LazyLoadPanel {
	observers: Arc<HydrationObservers>,
	log: Arc<HydrationLog>,
	subscription: Mutex<Option<ObserverId>>,
	warning_threshold: usize,
}

impl LazyLoadPanel {
	/// Create a panel listening on `observers`, with the default threshold (5)
	pub fn new(observers: Arc<HydrationObservers>) -> Self {
		Self {
			observers,
			log: Arc::new(HydrationLog::new()),
			subscription: Mutex::new(None),
			warning_threshold: 5,
		}
	}

	/// Create a panel listening on a factory's hydrations
	pub fn attach(factory: &ProxyFactory) -> Self {
		Self::new(Arc::clone(factory.observers()))
	}

	/// Set the repeated-hydration warning threshold
	pub fn with_threshold(mut self, warning_threshold: usize) -> Self {
		self.warning_threshold = warning_threshold;
		self
	}

	/// Log fed while the panel is instrumented
	pub fn log(&self) -> &Arc<HydrationLog> {
		&self.log
	}

	/// Returns true while the panel's log is subscribed
	pub fn is_instrumented(&self) -> bool {
		self.subscription.lock().is_some()
	}
}

#[async_trait]
impl Panel for LazyLoadPanel {
	fn id(&self) -> &'static str {
		"lazy_load"
	}

	fn name(&self) -> &'static str {
		"Lazy Loads"
	}

	fn priority(&self) -> i32 {
		80
	}

	async fn enable_instrumentation(&self) -> ToolbarResult<()> {
		let mut subscription = self.subscription.lock();
		if subscription.is_none() {
			*subscription = Some(self.observers.subscribe(self.log.clone()));
		}
		Ok(())
	}

	async fn disable_instrumentation(&self) -> ToolbarResult<()> {
		if let Some(id) = self.subscription.lock().take() {
			self.observers.unsubscribe(id);
		}
		Ok(())
	}

	async fn generate_stats(&self, ctx: &ToolbarContext) -> ToolbarResult<PanelStats> {
		let events: Vec<HydrationEvent> = self
			.log
			.entries()
			.into_iter()
			.filter(|event| ctx.covers(event))
			.collect();

		let mut class_counts: IndexMap<&str, usize> = IndexMap::new();
		let mut row_counts: IndexMap<(&str, String), usize> = IndexMap::new();
		for event in &events {
			*class_counts.entry(event.class_name.as_str()).or_insert(0) += 1;
			*row_counts
				.entry((event.class_name.as_str(), event.identifier.to_string()))
				.or_insert(0) += 1;
		}

		let repeated_classes: Vec<&str> = class_counts
			.iter()
			.filter(|&(_, &count)| count >= self.warning_threshold)
			.map(|(&class, _)| class)
			.collect();
		let duplicate_count = row_counts.values().filter(|&&count| count > 1).count();

		let classes_data: Vec<serde_json::Value> = class_counts
			.iter()
			.map(|(class, count)| {
				serde_json::json!({
					"class": class,
					"count": count,
					"is_repeated": *count >= self.warning_threshold,
				})
			})
			.collect();

		let events_data: Vec<serde_json::Value> = events
			.iter()
			.enumerate()
			.map(|(idx, event)| {
				let key = (event.class_name.as_str(), event.identifier.to_string());
				let is_duplicate = row_counts.get(&key).is_some_and(|&count| count > 1);
				serde_json::json!({
					"index": idx,
					"class": event.class_name,
					"identifier": event.identifier.to_string(),
					"field": event.field,
					"timestamp": event.timestamp.to_rfc3339(),
					"is_duplicate": is_duplicate,
				})
			})
			.collect();

		let data = serde_json::json!({
			"total_lazy_loads": events.len(),
			"warning_threshold": self.warning_threshold,
			"duplicate_count": duplicate_count,
			"repeated_classes": repeated_classes,
			"classes": classes_data,
			"events": events_data,
		});

		Ok(PanelStats {
			panel_id: self.id().to_string(),
			panel_name: self.name().to_string(),
			data,
			summary: format!("{} lazy-loads", events.len()),
			rendered_html: None,
		})
	}

	fn render(&self, stats: &PanelStats) -> ToolbarResult<String> {
		let data = &stats.data;

		let total = data["total_lazy_loads"].as_u64().unwrap_or(0);
		let threshold = data["warning_threshold"].as_u64().unwrap_or(5);
		let duplicate_count = data["duplicate_count"].as_u64().unwrap_or(0);

		let empty = vec![];
		let repeated = data["repeated_classes"].as_array().unwrap_or(&empty);
		let classes = data["classes"].as_array().unwrap_or(&empty);
		let events = data["events"].as_array().unwrap_or(&empty);

		let mut warnings = Vec::new();
		for class in repeated.iter().filter_map(|class| class.as_str()) {
			warnings.push(format!(
				"<div class='lzr-warning'>⚠️ {} hydrated {}+ times, consider loading eagerly</div>",
				html_escape(class),
				threshold
			));
		}
		if duplicate_count > 0 {
			warnings.push(format!(
				"<div class='lzr-warning'>⚠️ {} rows hydrated more than once</div>",
				duplicate_count
			));
		}
		let warnings_html = warnings.join("");

		let classes_html: String = classes
			.iter()
			.map(|c| {
				format!(
					"<li>{}: {}</li>",
					html_escape(c["class"].as_str().unwrap_or("")),
					c["count"].as_u64().unwrap_or(0)
				)
			})
			.collect();

		let events_html: String = events
			.iter()
			.map(|e| {
				let badge = if e["is_duplicate"].as_bool().unwrap_or(false) {
					" <span class='lzr-badge lzr-badge-warning'>DUPLICATE</span>"
				} else {
					""
				};
				format!(
					r#"
					<tr>
						<td>#{}</td>
						<td>{}({}){}</td>
						<td><code>{}</code></td>
						<td>{}</td>
					</tr>
					"#,
					e["index"].as_u64().unwrap_or(0) + 1,
					html_escape(e["class"].as_str().unwrap_or("")),
					html_escape(e["identifier"].as_str().unwrap_or("")),
					badge,
					html_escape(e["field"].as_str().unwrap_or("")),
					html_escape(e["timestamp"].as_str().unwrap_or(""))
				)
			})
			.collect();

		Ok(format!(
			r#"
			<div class="lzr-panel-content">
				<h3>Lazy Loads</h3>
				<div class="lzr-summary">
					<p><strong>Total Lazy Loads:</strong> {}</p>
					<ul>{}</ul>
				</div>
				{}
				<table class="lzr-table">
					<thead>
						<tr>
							<th>#</th>
							<th>Entity</th>
							<th>Triggered by</th>
							<th>At</th>
						</tr>
					</thead>
					<tbody>{}</tbody>
				</table>
			</div>
			"#,
			total, classes_html, warnings_html, events_html
		))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::{Duration, Utc};
	use lazyrow_proxy::Identifier;
	use rstest::*;

	fn event(class: &str, id: i64, field: &str) -> HydrationEvent {
		HydrationEvent::new(class, Identifier::single("id", id), field)
	}

	fn window() -> ToolbarContext {
		ToolbarContext::starting_at("test", Utc::now() - Duration::minutes(1))
	}

	#[rstest]
	#[tokio::test]
	async fn test_instrumentation_toggles_subscription() {
		let observers = Arc::new(HydrationObservers::new());
		let panel = LazyLoadPanel::new(observers.clone());

		panel.enable_instrumentation().await.unwrap();
		panel.enable_instrumentation().await.unwrap();
		assert!(panel.is_instrumented());
		assert_eq!(observers.len(), 1);

		observers.notify(&event("User", 1, "name"));
		panel.disable_instrumentation().await.unwrap();
		observers.notify(&event("User", 2, "name"));

		assert!(!panel.is_instrumented());
		assert!(observers.is_empty());
		assert_eq!(panel.log().count(), 1);
	}

	#[rstest]
	#[tokio::test]
	async fn test_generate_stats_flags_repeated_classes() {
		let panel = LazyLoadPanel::new(Arc::new(HydrationObservers::new())).with_threshold(3);
		for id in 1..=3 {
			panel.log().record(event("Post", id, "title"));
		}
		panel.log().record(event("User", 42, "name"));

		let stats = panel.generate_stats(&window()).await.unwrap();

		assert_eq!(stats.panel_id, "lazy_load");
		assert_eq!(stats.summary, "4 lazy-loads");
		assert_eq!(stats.data["total_lazy_loads"].as_u64().unwrap(), 4);
		assert_eq!(stats.data["repeated_classes"], serde_json::json!(["Post"]));
		assert_eq!(stats.data["duplicate_count"].as_u64().unwrap(), 0);
	}

	#[rstest]
	#[tokio::test]
	async fn test_generate_stats_flags_duplicate_rows() {
		let panel = LazyLoadPanel::new(Arc::new(HydrationObservers::new()));
		panel.log().record(event("User", 42, "name"));
		panel.log().record(event("User", 42, "email"));
		panel.log().record(event("User", 7, "name"));

		let stats = panel.generate_stats(&window()).await.unwrap();

		assert_eq!(stats.data["duplicate_count"].as_u64().unwrap(), 1);
		let flags: Vec<bool> = stats.data["events"]
			.as_array()
			.unwrap()
			.iter()
			.map(|e| e["is_duplicate"].as_bool().unwrap())
			.collect();
		assert_eq!(flags, vec![true, true, false]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_generate_stats_respects_window() {
		let panel = LazyLoadPanel::new(Arc::new(HydrationObservers::new()));
		panel.log().record(event("User", 1, "name"));

		let later = ToolbarContext::starting_at("later", Utc::now() + Duration::minutes(1));
		let stats = panel.generate_stats(&later).await.unwrap();
		assert_eq!(stats.summary, "0 lazy-loads");
	}

	#[rstest]
	#[tokio::test]
	async fn test_render_escapes_identifiers() {
		let panel = LazyLoadPanel::new(Arc::new(HydrationObservers::new())).with_threshold(1);
		panel.log().record(HydrationEvent::new(
			"Tenant",
			Identifier::single("slug", "<acme>"),
			"name",
		));

		let stats = panel.generate_stats(&window()).await.unwrap();
		let html = panel.render(&stats).unwrap();

		assert!(html.contains("Tenant(slug=&quot;&lt;acme&gt;&quot;)"));
		assert!(html.contains("Tenant hydrated 1+ times"));
		assert!(!html.contains("<acme>"));
	}
}
