//! ursgen Audit Trail
//!
//! Every pipeline operation leaves one [`AuditEvent`] in a sink. Events
//! carry the acting resource, its data classification, operation
//! metadata, and model-call telemetry when a stage called a model.
//! Prompt and response payloads are hashed, never stored.
//!
//! Sinks are fire-and-forget: the pipeline never fails because the trail
//! could not be written. [`TracingSink`] is the production sink;
//! [`MemorySink`] backs tests.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod event;
mod sink;

pub use event::{AuditAction, AuditEvent, LlmTelemetry};
pub use sink::{AuditSink, MemorySink, TracingSink};
