//! ursgen QA Engine
//!
//! Stage 4 of the pipeline: deterministic quality review of a generated
//! requirements document. No model calls are made here; every check is a
//! rule over the document text and structure, so a review is repeatable
//! and explainable.
//!
//! ## Checks
//!
//! - "The system shall" phrasing on every functional requirement
//! - source references and confidence (traceability)
//! - at least one acceptance criterion per requirement (blocking)
//! - vague-term and measurability scans on criteria, descriptions and
//!   the executive summary
//! - unvalidated scope assumptions
//!
//! ## Scoring
//!
//! Findings are routed by category onto four dimensions (completeness,
//! clarity, testability, traceability), each starting at 100 and taxed
//! per finding by severity. An issue-free document scores exactly 100.
//!
//! # Examples
//!
//! ```ignore
//! use ursgen_qa::QaEngine;
//!
//! let report = QaEngine::default().review(&urs);
//! if !report.ready_for_approval {
//!     for issue in &report.issues {
//!         eprintln!("[{}] {}: {}", issue.severity, issue.location, issue.description);
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod checks;
mod config;
mod engine;
mod report;
mod scoring;

pub use checks::{find_vague_term, is_measurable};
pub use config::QaConfig;
pub use engine::QaEngine;
pub use report::{IssueCategory, QaIssue, QaReport, QaScores, Severity};
pub use scoring::score_issues;
