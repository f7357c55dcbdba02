//! Common test fixtures for lazyrow-debug-toolbar tests
//!
//! This module provides reusable test fixtures using rstest framework.

use chrono::{Duration, Utc};
use lazyrow_debug_toolbar::{PanelRegistry, ToolbarConfig, ToolbarContext};
use lazyrow_proxy::{
	FieldState, Identifier, InMemoryPersister, PersistenceContext, ProxyFactory, impl_entity,
};
use rstest::*;
use std::sync::Arc;

/// Entity used by the end-to-end tests
pub struct Post {
	pub id: FieldState<i64>,
	pub title: FieldState<String>,
}

impl_entity!(Post, "Post", identifier = [id], fields = { id: i64, title: String });

/// Enabled toolbar configuration fixture
///
/// Overrides `debug_assertions` so the toolbar is on in release test runs.
#[fixture]
pub fn enabled_config() -> ToolbarConfig {
	ToolbarConfig::new().with_enabled(true)
}

/// Toolbar context fixture whose window opened a minute ago
#[fixture]
pub fn test_context() -> ToolbarContext {
	ToolbarContext::starting_at("GET /posts", Utc::now() - Duration::minutes(1))
}

/// Empty panel registry fixture
#[fixture]
pub fn empty_registry() -> PanelRegistry {
	PanelRegistry::new()
}

/// Factory over ten stored posts, with its hook installed
#[fixture]
pub fn post_factory() -> (Arc<InMemoryPersister>, ProxyFactory) {
	let posts = Arc::new(InMemoryPersister::new("Post"));
	for id in 1..=10_i64 {
		posts.insert(Identifier::single("id", id), [("title", format!("Post {id}"))]);
	}

	let context = Arc::new(PersistenceContext::new());
	context
		.register_entity(Post::descriptor(), posts.clone())
		.unwrap();
	let factory = ProxyFactory::create(context, true).unwrap();
	(posts, factory)
}
