use crate::domain::model::{HttpRequest, HttpResponse};
use crate::utils::error::{Result, SiteError};
use regex::Regex;
use std::sync::LazyLock;

/// Size of the single read used to receive a request.
pub const BUFFER_SIZE: usize = 4096;

static REQUEST_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z]+) (/[^ ]*) HTTP/1\.[01]").expect("request line pattern")
});

/// Parse the request line of an HTTP/1.0 or HTTP/1.1 request.
pub fn parse_request(raw: &[u8]) -> Result<HttpRequest> {
    let text = String::from_utf8_lossy(raw);
    let caps = REQUEST_LINE.captures(&text).ok_or(SiteError::BadRequest)?;
    Ok(HttpRequest {
        method: caps[1].to_string(),
        path: caps[2].to_string(),
    })
}

/// Map a request path to a file path relative to the site root.
///
/// `/` maps to `index`. Query strings and fragments are dropped. Any `..`
/// segment or NUL byte is reported as not found so lookups never leave the root.
pub fn resolve_target(path: &str, index: &str) -> Result<String> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    if path.is_empty() || path == "/" {
        return Ok(index.to_string());
    }

    if path.contains('\0') {
        return Err(SiteError::NotFound {
            path: path.replace('\0', "\\0"),
        });
    }

    if path.split('/').any(|segment| segment == "..") {
        tracing::warn!("Rejected path traversal attempt: {}", path);
        return Err(SiteError::NotFound {
            path: path.to_string(),
        });
    }

    Ok(path.trim_start_matches('/').to_string())
}

pub fn content_type(file_path: &str) -> &'static str {
    let extension = file_path
        .rsplit_once('.')
        .map(|(_, extension)| extension)
        .filter(|extension| !extension.contains('/'));
    match extension {
        Some("html") => "text/html",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

impl HttpResponse {
    pub fn ok(content_type: &str, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            reason: "OK".to_string(),
            content_type: content_type.to_string(),
            body,
        }
    }

    /// Plain-text error response whose body repeats the status text.
    pub fn error(status: u16, status_text: &str) -> Self {
        Self {
            status,
            reason: status_text.to_string(),
            content_type: "text/plain".to_string(),
            body: status_text.as_bytes().to_vec(),
        }
    }

    pub fn from_error(err: &SiteError) -> Self {
        let (status, status_text) = err.status();
        Self::error(status, status_text)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let head = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            self.status,
            self.reason,
            self.content_type,
            self.body.len()
        );
        let mut bytes = Vec::with_capacity(head.len() + self.body.len());
        bytes.extend_from_slice(head.as_bytes());
        bytes.extend_from_slice(&self.body);
        bytes
    }
}
