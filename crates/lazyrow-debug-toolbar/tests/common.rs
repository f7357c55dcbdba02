//! Shared test utilities

pub mod builders;
pub mod fixtures;
pub mod canned_panel;
