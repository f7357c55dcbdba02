//! Error types for the debug toolbar

use lazyrow_proxy::ProxyError;
use thiserror::Error;

/// Errors raised while collecting or rendering panels
#[derive(Debug, Error)]
pub enum ToolbarError {
	/// A panel failed to produce its statistics or HTML
	#[error("Render error: {0}")]
	RenderError(String),

	/// No panel with this id is registered
	#[error("Panel not found: {0}")]
	PanelNotFound(String),

	/// Error from the proxy layer
	#[error(transparent)]
	Proxy(#[from] ProxyError),
}

/// Result type for toolbar operations
pub type ToolbarResult<T> = Result<T, ToolbarError>;
