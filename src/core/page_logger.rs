use crate::domain::model::{LinkBinding, CLICK_PREFIX, LOAD_MESSAGE};
use crate::domain::ports::{ClickListener, DiagnosticSink, HostDocument, ReadyListener};
use std::sync::Arc;

/// Logs page readiness and hyperlink activations of a host document.
///
/// Links are discovered once, when the ready event fires. Anchors inserted
/// afterwards get no handler, and every ready dispatch registers a fresh set
/// of handlers (no deduplication, no removal).
#[derive(Clone)]
pub struct PageInteractionLogger {
    sink: Arc<dyn DiagnosticSink>,
}

impl PageInteractionLogger {
    pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { sink }
    }

    /// Subscribe [`initialize`](Self::initialize) to the document's ready event.
    pub fn attach(&self, document: &mut dyn HostDocument) {
        let logger = self.clone();
        let listener: ReadyListener =
            Arc::new(move |document: &mut dyn HostDocument| logger.initialize(document));
        document.add_ready_listener(listener);
    }

    pub fn initialize(&self, document: &mut dyn HostDocument) {
        self.sink.emit(LOAD_MESSAGE);

        let anchors = document.anchors();
        tracing::debug!("Registering click handlers on {} links", anchors.len());

        for anchor in anchors {
            let logger = self.clone();
            let listener: ClickListener =
                Arc::new(move |document: &dyn HostDocument, binding: &LinkBinding| {
                    logger.on_activate(document, binding)
                });
            document.add_click_listener(LinkBinding::new(anchor), listener);
        }
    }

    pub fn on_activate(&self, document: &dyn HostDocument, binding: &LinkBinding) {
        let url = document.resolve_href(binding.anchor);
        self.sink.emit(&format!("{}{}", CLICK_PREFIX, url));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::console::MemorySink;
    use crate::core::document::MemoryDocument;

    fn setup(base: &str, hrefs: &[&str]) -> (MemoryDocument, Arc<MemorySink>) {
        let mut document = MemoryDocument::new(base).unwrap();
        for &href in hrefs {
            document.insert_anchor(Some(href));
        }
        let sink = Arc::new(MemorySink::new());
        PageInteractionLogger::new(sink.clone()).attach(&mut document);
        (document, sink)
    }

    #[test]
    fn test_nothing_happens_before_ready() {
        let (document, sink) = setup("https://example.com/", &["/a"]);
        let first = document.anchors()[0];
        assert_eq!(document.click(first), 0);
        assert!(sink.messages().is_empty());
    }

    #[test]
    fn test_load_message_emitted_once() {
        let (mut document, sink) = setup("https://example.com/", &["/a", "/b"]);
        document.dispatch_ready();
        assert_eq!(sink.messages(), vec![LOAD_MESSAGE.to_string()]);
    }

    #[test]
    fn test_relative_href_is_resolved() {
        let (mut document, sink) = setup("https://example.com/", &["/about"]);
        document.dispatch_ready();
        let about = document.anchors()[0];
        document.click(about);
        assert_eq!(
            sink.messages().last().map(String::as_str),
            Some("Clicked link: https://example.com/about")
        );
    }

    #[test]
    fn test_handler_uses_bound_link() {
        let mut document = MemoryDocument::new("https://example.com/").unwrap();
        let first = document.insert_anchor(Some("/first"));
        let second = document.insert_anchor(Some("/second"));
        let sink = Arc::new(MemorySink::new());
        let logger = PageInteractionLogger::new(sink.clone());

        logger.on_activate(&document, &LinkBinding::new(second));
        logger.on_activate(&document, &LinkBinding::new(first));

        assert_eq!(
            sink.messages(),
            vec![
                "Clicked link: https://example.com/second".to_string(),
                "Clicked link: https://example.com/first".to_string(),
            ]
        );
    }
}
