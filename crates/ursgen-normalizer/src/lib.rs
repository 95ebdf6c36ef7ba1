//! ursgen Normalization Stage
//!
//! Stage 1 of the pipeline: turn source chunks into typed, source-cited
//! facts.
//!
//! # Architecture
//!
//! The [`Normalizer`] builds an extraction prompt from the chunks, runs one
//! completion, and parses the output permissively: individually broken
//! facts are dropped with a warning, and completely unusable output fails
//! closed to an empty [`NormalizedFacts`](ursgen_domain::NormalizedFacts)
//! rather than an error. Only transport-level completion failures
//! propagate.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod normalizer;
mod parser;
mod prompt;

pub use error::NormalizerError;
pub use normalizer::{NormalizeOutcome, Normalizer};
pub use parser::parse_facts_response;
