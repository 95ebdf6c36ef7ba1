//! ursgen Pipeline Orchestrator
//!
//! The single entry point tying the four stages together:
//!
//! 1. **Ingest**: chunk source material, open a session, assign the
//!    document id.
//! 2. **Normalize**: extract typed, source-cited facts.
//! 3. **Clarify**: raise gap questions; answers re-enter the session as
//!    new chunks.
//! 4. **Generate**: synthesize the full requirements document.
//!
//! plus deterministic QA review and the document lifecycle (updates,
//! approval workflow). Every operation leaves an audit event.
//!
//! # Architecture
//!
//! The pipeline owns `Arc`'d in-memory registries and generic stage
//! drivers over one [`CompletionService`](ursgen_llm::CompletionService).
//! Stages operate on owned snapshots, so no registry lock is ever held
//! across an await point. Documents are committed only once fully
//! assembled; an aborted generation leaves no partial state.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod pipeline;

pub use error::PipelineError;
pub use pipeline::{AnswerOutcome, DocumentFilter, IngestRequest, Pipeline, SourceInput};
