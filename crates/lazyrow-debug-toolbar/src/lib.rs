//! # Lazyrow Debug Toolbar
//!
//! Development-time panels over lazyrow's hydration events.
//!
//! The [`LazyLoadPanel`] subscribes to a proxy factory's hydration observers
//! while instrumented and reports every lazy-load in a [`ToolbarContext`]
//! window, warning about classes hydrated one placeholder at a time and rows
//! hydrated more than once.
//!
//! ## Features
//!
//! - `lazy-load-panel` - Lazy-load panel (default)
//! - `full` - All panels enabled
//!
//! ## Quick Start
//!
//! ```rust
//! use lazyrow_debug_toolbar::{
//!     LazyLoadPanel, PanelRegistry, ToolbarConfig, ToolbarContext, render_toolbar,
//! };
//! use lazyrow_proxy::{PersistenceContext, ProxyFactory};
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let factory = ProxyFactory::create(Arc::new(PersistenceContext::new()), true).unwrap();
//! let config = ToolbarConfig::new().with_enabled(true);
//!
//! let mut registry = PanelRegistry::new();
//! registry.register(Box::new(LazyLoadPanel::attach(&factory)));
//! registry.enable_all(&config).await.unwrap();
//!
//! let ctx = ToolbarContext::new("GET /users");
//! // ... read placeholders built by `factory` ...
//! let stats = registry.collect(&ctx, &config).await;
//! let html = render_toolbar(&ctx, &stats).unwrap();
//! assert!(html.contains("0 lazy-loads"));
//! # });
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

pub mod config;
pub mod context;
pub mod error;
pub mod panels;
pub mod ui;
pub mod utils;

pub use config::ToolbarConfig;
pub use context::ToolbarContext;
pub use error::{ToolbarError, ToolbarResult};
pub use panels::{Panel, PanelRegistry, PanelStats};
pub use ui::render_toolbar;

#[cfg(feature = "lazy-load-panel")]
pub use panels::lazy_load::LazyLoadPanel;
