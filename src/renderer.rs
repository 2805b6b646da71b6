// src/renderer.rs
use async_trait::async_trait;

/// Headless-rendering seam for pages that assemble content with JavaScript.
/// Returns the post-execution markup, or `None` when rendering failed.
/// The email extractor treats an absent renderer as "fallback disabled".
#[async_trait]
pub trait HeadlessRenderer: Send + Sync {
    async fn render(&self, url: &str) -> Option<String>;
}
