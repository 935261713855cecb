pub mod document;
pub mod http;
pub mod page_logger;
pub mod server;

pub use crate::domain::model::{Anchor, AnchorId, HttpRequest, HttpResponse, LinkBinding};
pub use crate::domain::ports::{DiagnosticSink, HostDocument, SiteFiles};
pub use crate::utils::error::Result;
