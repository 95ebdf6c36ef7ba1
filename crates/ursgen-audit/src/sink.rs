//! Audit sinks

use crate::event::AuditEvent;
use std::sync::Mutex;
use tracing::info;

/// Destination for audit events.
///
/// Recording is fire-and-forget: a sink must never fail the operation
/// that produced the event.
pub trait AuditSink: Send + Sync {
    /// Record one event.
    fn record(&self, event: AuditEvent);
}

/// Sink that emits structured tracing events under the `audit` target.
#[derive(Debug, Default)]
pub struct TracingSink;

impl AuditSink for TracingSink {
    fn record(&self, event: AuditEvent) {
        match &event.llm {
            Some(llm) => info!(
                target: "audit",
                id = %event.id,
                action = %event.action,
                resource_type = %event.resource_type,
                resource_id = %event.resource_id,
                classification = %event.data_classification,
                model = %llm.model,
                input_tokens = llm.input_tokens,
                output_tokens = llm.output_tokens,
                latency_ms = llm.latency_ms,
                "audit"
            ),
            None => info!(
                target: "audit",
                id = %event.id,
                action = %event.action,
                resource_type = %event.resource_type,
                resource_id = %event.resource_id,
                classification = %event.data_classification,
                "audit"
            ),
        }
    }
}

/// Sink that keeps events in memory, for tests and inspection.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events, in order.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditSink for MemorySink {
    fn record(&self, event: AuditEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::AuditAction;
    use ursgen_domain::DataClassification;

    #[test]
    fn memory_sink_captures_in_order() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());
        sink.record(AuditEvent::new(
            AuditAction::Ingest,
            "session",
            "s1",
            DataClassification::Internal,
        ));
        sink.record(AuditEvent::new(
            AuditAction::Normalize,
            "session",
            "s1",
            DataClassification::Internal,
        ));
        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].action, AuditAction::Ingest);
        assert_eq!(events[1].action, AuditAction::Normalize);
    }

    #[test]
    fn tracing_sink_accepts_events() {
        // Smoke test: recording must not panic without a subscriber.
        TracingSink.record(AuditEvent::new(
            AuditAction::Review,
            "document",
            "URS-2026-0001",
            DataClassification::Confidential,
        ));
    }
}
