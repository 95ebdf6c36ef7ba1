//! ursgen Clarification Stage
//!
//! Stage 2 of the pipeline: find what the stakeholder input does not say.
//!
//! # Architecture
//!
//! The [`Clarifier`] produces prioritized [`ClarifyingQuestion`]s and a
//! completeness score from the extracted facts and the raw chunks. Two code
//! paths exist: a completion-backed path, and a deterministic rule-based
//! path used when no completion service is configured or when the model
//! output is unusable. Answers re-enter the pipeline as new source chunks
//! via [`submit_answers`], keeping the traceability graph closed.
//!
//! [`ClarifyingQuestion`]: ursgen_domain::ClarifyingQuestion

#![warn(missing_docs)]
#![warn(clippy::all)]

mod answers;
mod clarifier;
mod error;
mod heuristics;
mod parser;
mod prompt;
mod scoring;

pub use answers::{submit_answers, AnswerOutcome};
pub use clarifier::{Clarifier, ClarifyOutcome};
pub use error::ClarifierError;
pub use heuristics::rule_based_questions;
pub use scoring::completeness_score;
