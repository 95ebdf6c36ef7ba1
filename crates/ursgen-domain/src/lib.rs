//! ursgen Domain Layer
//!
//! This crate contains the canonical schema for the requirements pipeline.
//! Every downstream crate depends on these types; none of them depend back.
//!
//! ## Key Concepts
//!
//! - **SourceChunk**: a bounded segment of source text, the atomic unit of
//!   traceability. Immutable once created.
//! - **Fact**: a typed, source-cited statement extracted from chunks.
//! - **ClarifyingQuestion**: a gap/ambiguity question whose answer re-enters
//!   the traceability graph as a new chunk.
//! - **Urs**: the User Requirements Specification aggregate, the canonical
//!   output document.
//!
//! ## Invariants owned here
//!
//! - An `explicit` fact cites at least one source chunk; an `inferred` fact
//!   carries an inference reason.
//! - Functional requirement descriptions start with "The system shall"
//!   after normalization.
//! - A requirement whose every source reference is an assumption has low
//!   confidence.
//!
//! Identifier formats (`URS-YYYY-NNNN`, `FR-NNN`, `NFR-NNN`,
//! `{source}-chunk-{NNNN}`) are validated in [`ids`]. Loose priority and
//! confidence strings from upstream services map onto the fixed enums via
//! the synonym tables in [`synonyms`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chunk;
pub mod fact;
pub mod ids;
pub mod question;
pub mod session;
pub mod synonyms;
pub mod urs;

// Re-exports for convenience
pub use chunk::{DataClassification, SourceChunk, SourceType};
pub use fact::{Confidence, EntitySet, Fact, FactType, Gap, GapType, NormalizedFacts};
pub use question::{Answer, ClarifyingQuestion, QuestionCategory, QuestionPriority};
pub use session::{Session, SessionStatus};
pub use urs::{
    AcceptanceCriterion, Approval, ApprovalStatus, Assumption, ConfidenceLevel,
    ExecutiveSummary, FunctionalRequirement, NfrCategory, NonFunctionalRequirement, PainPoint,
    Person, Priority, ProblemStatement, Scope, SourceReference, Urs, UrsMetadata, UrsStatus,
    VersionEntry,
};
