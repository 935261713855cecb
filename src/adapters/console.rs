use crate::domain::model::DiagnosticRecord;
use crate::domain::ports::DiagnosticSink;
use std::io::Write;
use std::sync::Mutex;

/// Writes diagnostic messages to stdout, one per line. Logs go to stderr, so
/// stdout carries nothing but these messages.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl DiagnosticSink for ConsoleSink {
    fn emit(&self, message: &str) {
        tracing::debug!("console: {}", message);
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", message) {
            tracing::warn!("Failed to write console message: {}", e);
        }
    }
}

/// Keeps every emitted message in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(messages) => messages.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn records(&self) -> Vec<DiagnosticRecord> {
        self.messages()
            .into_iter()
            .enumerate()
            .map(|(seq, message)| DiagnosticRecord { seq, message })
            .collect()
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, message: &str) {
        tracing::debug!("console: {}", message);
        let mut messages = match self.messages.lock() {
            Ok(messages) => messages,
            Err(poisoned) => poisoned.into_inner(),
        };
        messages.push(message.to_string());
    }
}
