//! Diagnostic trace lines emitted while checking a domain.
//!
//! The resolver and prober describe what they do ("Querying 'ns' with type
//! 'SOA'") through a [`DiagnosticSink`]. Sinks only observe; they never
//! change what a check does or returns.

use std::sync::Mutex;

/// Receiver for human-readable trace lines.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, line: &str);
}

/// Discards every line.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn record(&self, _line: &str) {}
}

/// Forwards every line to `tracing` at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, line: &str) {
        tracing::debug!(target: "domwatch::trace", "{}", line);
    }
}

/// Keeps every line in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the lines recorded so far.
    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl DiagnosticSink for MemorySink {
    fn record(&self, line: &str) {
        match self.lines.lock() {
            Ok(mut lines) => lines.push(line.to_string()),
            Err(poisoned) => poisoned.into_inner().push(line.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_keeps_order() {
        let sink = MemorySink::new();
        sink.record("first");
        sink.record("second");
        assert_eq!(sink.lines(), vec!["first", "second"]);
    }

    #[test]
    fn test_sinks_are_usable_as_trait_objects() {
        let sinks: Vec<Box<dyn DiagnosticSink>> = vec![
            Box::new(NullSink),
            Box::new(TracingSink),
            Box::new(MemorySink::new()),
        ];
        for sink in &sinks {
            sink.record("Querying 'a.iana-servers.net' with type 'SOA'");
        }
    }
}
