//! Integration tests for lazyrow-debug-toolbar crate
//!
//! Covers the panel registry, toolbar rendering and the lazy-load panel fed
//! by a real proxy factory.

pub mod common;
pub mod integration;

pub use common::{builders::HydrationEventBuilder, canned_panel::CannedPanel, fixtures::*};
