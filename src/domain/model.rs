use serde::{Deserialize, Serialize};

/// Message emitted once the host document reports it is ready.
pub const LOAD_MESSAGE: &str = "Website loaded successfully!";

/// Prefix of the message emitted when a registered hyperlink is activated.
pub const CLICK_PREFIX: &str = "Clicked link: ";

/// Identity of a hyperlink element inside a host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnchorId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub id: AnchorId,
    /// Raw attribute text; `None` when the element carries no `href`.
    pub href: Option<String>,
}

/// Context value bound to an activation handler when it is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkBinding {
    pub anchor: AnchorId,
}

impl LinkBinding {
    pub fn new(anchor: AnchorId) -> Self {
        Self { anchor }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiagnosticRecord {
    pub seq: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub reason: String,
    pub content_type: String,
    pub body: Vec<u8>,
}
