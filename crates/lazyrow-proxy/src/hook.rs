//! The hydration hook seam

use async_trait::async_trait;

use crate::entity::Entity;
use crate::ProxyResult;

/// Callback invoked when an uninitialized field of a placeholder is read
///
/// A persistence context holds at most one hook. Placeholders capture the
/// hook present when they are built and call it directly.
#[async_trait]
pub trait HydrationHook: Send + Sync {
	/// Populate `obj` in place; `triggering_field` is the field being read
	async fn hydrate(&self, obj: &mut dyn Entity, triggering_field: &str) -> ProxyResult<()>;
}
