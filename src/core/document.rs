use crate::domain::model::{Anchor, AnchorId, LinkBinding};
use crate::domain::ports::{ClickListener, HostDocument, ReadyListener};
use crate::utils::error::Result;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static IGNORED_BLOCKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<!--.*?-->|<script\b.*?</script\s*>|<style\b.*?</style\s*>")
        .expect("ignored block pattern")
});
// Attribute list of a start tag; quoted values may contain `>` and `=`.
const TAG_ATTRIBUTES: &str =
    r#"((?:\s+[^\s=>"']+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'>]+))?)*)\s*/?>"#;

static ANCHOR_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("(?i)<a{}", TAG_ATTRIBUTES)).expect("anchor tag pattern")
});
static BASE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("(?i)<base{}", TAG_ATTRIBUTES)).expect("base tag pattern")
});
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\s+([^\s=>"']+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#)
        .expect("attribute pattern")
});
static CHARACTER_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#([0-9]{1,7})|#[xX]([0-9a-fA-F]{1,6})|(amp|lt|gt|quot|apos));")
        .expect("character reference pattern")
});

/// In-memory host document: a fixed base URL, an ordered list of anchors and
/// the listeners registered on them.
#[derive(Clone)]
pub struct MemoryDocument {
    base_url: Url,
    anchors: Vec<Anchor>,
    ready_listeners: Vec<ReadyListener>,
    click_listeners: Vec<(LinkBinding, ClickListener)>,
}

impl std::fmt::Debug for MemoryDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDocument")
            .field("base_url", &self.base_url.as_str())
            .field("anchors", &self.anchors)
            .field("ready_listeners", &self.ready_listeners.len())
            .field("click_listeners", &self.click_listeners.len())
            .finish()
    }
}

impl MemoryDocument {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            anchors: Vec::new(),
            ready_listeners: Vec::new(),
            click_listeners: Vec::new(),
        })
    }

    /// Build a document from HTML text loaded from `document_url`.
    ///
    /// A `<base href>` element, if present, replaces the document URL as the
    /// base for link resolution. Comments, scripts and styles are skipped.
    pub fn from_html(document_url: &str, html: &str) -> Result<Self> {
        let mut document = Self::new(document_url)?;
        let markup = IGNORED_BLOCKS.replace_all(html, "");

        let base_href = BASE_TAG
            .captures_iter(&markup)
            .find_map(|caps| caps.get(1).and_then(|attrs| href_attribute(attrs.as_str())));
        if let Some(href) = base_href {
            match document.base_url.join(href.trim()) {
                Ok(base) => document.base_url = base,
                Err(e) => tracing::warn!("Ignoring invalid <base href=\"{}\">: {}", href, e),
            }
        }

        for caps in ANCHOR_TAG.captures_iter(&markup) {
            let href = caps.get(1).and_then(|attrs| href_attribute(attrs.as_str()));
            document.insert_anchor(href.as_deref());
        }

        tracing::debug!(
            "Parsed document {} with {} links",
            document.base_url,
            document.anchors.len()
        );
        Ok(document)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn anchor(&self, id: AnchorId) -> Option<&Anchor> {
        self.anchors.iter().find(|anchor| anchor.id == id)
    }

    /// Append a hyperlink element to the document.
    pub fn insert_anchor(&mut self, href: Option<&str>) -> AnchorId {
        let id = AnchorId(self.anchors.len());
        self.anchors.push(Anchor {
            id,
            href: href.map(str::to_string),
        });
        id
    }

    /// Fire the ready event. Every call runs all ready listeners again.
    pub fn dispatch_ready(&mut self) {
        let listeners = self.ready_listeners.clone();
        for listener in &listeners {
            listener(self);
        }
    }

    /// Activate a hyperlink, returning how many handlers ran.
    pub fn click(&self, anchor: AnchorId) -> usize {
        let mut handled = 0;
        for (binding, listener) in &self.click_listeners {
            if binding.anchor == anchor {
                listener(self, binding);
                handled += 1;
            }
        }
        handled
    }

    pub fn click_listener_count(&self) -> usize {
        self.click_listeners.len()
    }
}

impl HostDocument for MemoryDocument {
    fn add_ready_listener(&mut self, listener: ReadyListener) {
        self.ready_listeners.push(listener);
    }

    fn anchors(&self) -> Vec<AnchorId> {
        self.anchors.iter().map(|anchor| anchor.id).collect()
    }

    fn add_click_listener(&mut self, binding: LinkBinding, listener: ClickListener) {
        self.click_listeners.push((binding, listener));
    }

    fn resolve_href(&self, anchor: AnchorId) -> String {
        let Some(raw) = self.anchor(anchor).and_then(|a| a.href.as_deref()) else {
            return String::new();
        };
        match self.base_url.join(raw.trim()) {
            Ok(url) => url.to_string(),
            Err(_) => raw.to_string(),
        }
    }
}

/// Value of the first `href` attribute; later duplicates are ignored.
/// A bare `href` yields the empty string.
fn href_attribute(attributes: &str) -> Option<String> {
    let caps = ATTRIBUTE
        .captures_iter(attributes)
        .find(|caps| caps[1].eq_ignore_ascii_case("href"))?;
    let value = caps
        .get(2)
        .or_else(|| caps.get(3))
        .or_else(|| caps.get(4))
        .map_or("", |value| value.as_str());
    Some(decode_entities(value))
}

/// Decodes numeric references and the five XML named entities. Other named
/// entities (`&nbsp;`, `&copy;`, ...) are left as written.
fn decode_entities(value: &str) -> String {
    CHARACTER_REFERENCE
        .replace_all(value, |caps: &regex::Captures| {
            let decoded = if let Some(decimal) = caps.get(1) {
                decimal.as_str().parse::<u32>().ok().and_then(char::from_u32)
            } else if let Some(hex) = caps.get(2) {
                u32::from_str_radix(hex.as_str(), 16).ok().and_then(char::from_u32)
            } else {
                match &caps[3] {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    _ => Some('\''),
                }
            };
            decoded
                .filter(|c| *c != '\0')
                .map_or_else(|| '\u{FFFD}'.to_string(), |c| c.to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_html_collects_anchors_in_order() {
        let html = r#"
            <html><body>
              <a href="/about">About</a>
              <A HREF='contact.html'>Contact</A>
              <a href=https://rust-lang.org>Rust</a>
              <abbr title="not a link">x</abbr>
              <a name="top">no href</a>
            </body></html>
        "#;
        let document = MemoryDocument::from_html("http://localhost:8080/pages/", html).unwrap();
        let ids = document.anchors();
        assert_eq!(ids.len(), 4);
        assert_eq!(document.resolve_href(ids[0]), "http://localhost:8080/about");
        assert_eq!(
            document.resolve_href(ids[1]),
            "http://localhost:8080/pages/contact.html"
        );
        assert_eq!(document.resolve_href(ids[2]), "https://rust-lang.org/");
        assert_eq!(document.resolve_href(ids[3]), "");
    }

    #[test]
    fn test_base_element_overrides_document_url() {
        let html = r#"<head><base href="https://cdn.example.com/docs/"></head>
            <a href="guide.html">Guide</a>"#;
        let document = MemoryDocument::from_html("http://localhost/index.html", html).unwrap();
        let guide = document.anchors()[0];
        assert_eq!(
            document.resolve_href(guide),
            "https://cdn.example.com/docs/guide.html"
        );
    }

    #[test]
    fn test_comments_and_scripts_are_skipped() {
        let html = r#"
            <!-- <a href="/hidden">hidden</a> -->
            <script>document.write('<a href="/generated">x</a>');</script>
            <a href="/visible?x=1&amp;y=2">shown</a>
        "#;
        let document = MemoryDocument::from_html("https://example.com/", html).unwrap();
        let ids = document.anchors();
        assert_eq!(ids.len(), 1);
        assert_eq!(
            document.resolve_href(ids[0]),
            "https://example.com/visible?x=1&y=2"
        );
    }

    #[test]
    fn test_href_text_inside_other_attributes_is_ignored() {
        let html = r#"
            <a title="see href=/wrong" href="/right">one</a>
            <a data-note='a > b' href="/after-gt">two</a>
            <a href="/first" HREF="/second">three</a>
            <a href>four</a>
        "#;
        let document = MemoryDocument::from_html("https://example.com/docs/", html).unwrap();
        let ids = document.anchors();
        assert_eq!(ids.len(), 4);
        assert_eq!(document.resolve_href(ids[0]), "https://example.com/right");
        assert_eq!(document.resolve_href(ids[1]), "https://example.com/after-gt");
        assert_eq!(document.resolve_href(ids[2]), "https://example.com/first");
        assert_eq!(document.resolve_href(ids[3]), "https://example.com/docs/");
    }

    #[test]
    fn test_numeric_character_references_are_decoded() {
        assert_eq!(decode_entities("&#47;a&#x2F;b&#X2f;c"), "/a/b/c");
        assert_eq!(decode_entities("q?x=1&amp;y=&quot;2&quot;&apos;"), "q?x=1&y=\"2\"'");
        assert_eq!(decode_entities("&nbsp;&#0;"), "&nbsp;\u{FFFD}");

        let html = r#"<a href="&#47;about&#x2F;team">Team</a>"#;
        let document = MemoryDocument::from_html("https://example.com/", html).unwrap();
        let team = document.anchors()[0];
        assert_eq!(document.resolve_href(team), "https://example.com/about/team");
    }

    #[test]
    fn test_invalid_document_url_is_rejected() {
        assert!(MemoryDocument::new("not a url").is_err());
    }
}
