use crate::domain::model::{AnchorId, LinkBinding};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type ReadyListener = Arc<dyn Fn(&mut dyn HostDocument) + Send + Sync>;
pub type ClickListener = Arc<dyn Fn(&dyn HostDocument, &LinkBinding) + Send + Sync>;

/// Minimal capability set of a loaded web page.
pub trait HostDocument {
    /// Subscribe to the "structure fully parsed" event.
    fn add_ready_listener(&mut self, listener: ReadyListener);

    /// All hyperlink elements present right now, in document order.
    fn anchors(&self) -> Vec<AnchorId>;

    fn add_click_listener(&mut self, binding: LinkBinding, listener: ClickListener);

    /// Absolute URL of the anchor's href, resolved against the document base URL.
    /// Anchors without an href resolve to the empty string.
    fn resolve_href(&self, anchor: AnchorId) -> String;
}

/// Diagnostic (console) output stream.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, message: &str);
}

#[async_trait]
pub trait SiteFiles: Send + Sync {
    /// Read a file relative to the site root.
    async fn read(&self, relative_path: &str) -> Result<Vec<u8>>;
}
