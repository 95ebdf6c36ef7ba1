//! ursgen Generation Stage
//!
//! Stage 3 of the pipeline: synthesize the URS document.
//!
//! # Architecture
//!
//! The [`Generator`] asks the completion service for a loose document
//! outline, then maps it onto the strict schema in `ursgen_domain::urs`:
//! descriptions normalized to "The system shall", loose priority and
//! confidence labels coerced through the synonym tables, acceptance
//! criteria guaranteed non-empty, and every requirement tied back to a
//! source chunk or explicitly marked as an assumption. A model that
//! produces nothing usable still yields a valid document through the
//! fallback requirement; only transport failures are errors, and the
//! caller commits nothing in that case.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod generator;
mod parser;
mod prompt;

pub use error::GeneratorError;
pub use generator::{GenerateOutcome, Generator};
