//! ursgen Chunking Layer
//!
//! Splits source text into bounded, traceable chunks.
//!
//! # Architecture
//!
//! The [`Chunker`] cleans text, splits it into sentences, and packs whole
//! sentences into chunks of at most `chunk_size` characters. Consecutive
//! chunks share trailing sentences up to `overlap` characters so no
//! requirement-bearing sentence loses its surrounding context at a chunk
//! boundary.
//!
//! Chunk ids are `{source_id}-chunk-{index:04}` and each chunk carries a
//! truncated SHA-256 of its content for integrity checks.
//!
//! # Examples
//!
//! ```
//! use ursgen_chunker::{Chunker, ChunkerConfig, SourceMeta};
//! use ursgen_domain::{DataClassification, SourceType};
//!
//! let chunker = Chunker::new(ChunkerConfig::default());
//! let meta = SourceMeta {
//!     source_id: "src-1".to_string(),
//!     source_type: SourceType::UserInput,
//!     source_name: "intake notes".to_string(),
//!     data_classification: DataClassification::Internal,
//! };
//! let chunks = chunker.chunk(&meta, "The team processes invoices by hand.");
//! assert_eq!(chunks[0].chunk_id, "src-1-chunk-0000");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod chunker;
mod config;

pub use chunker::{content_hash, Chunker, SourceMeta};
pub use config::ChunkerConfig;

/// Rough token estimate at four characters per token.
pub fn estimate_tokens(text: &str) -> usize {
    text.len().div_ceil(4)
}

/// Join chunk bodies into one labeled block for prompt context.
pub fn merge_chunks(chunks: &[ursgen_domain::SourceChunk]) -> String {
    chunks
        .iter()
        .map(|c| format!("[{}] {}", c.chunk_id, c.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_estimate_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }

    #[test]
    fn merged_chunks_are_labeled() {
        use ursgen_domain::{DataClassification, SourceType};
        let chunker = Chunker::new(ChunkerConfig::default());
        let meta = SourceMeta {
            source_id: "s".to_string(),
            source_type: SourceType::Email,
            source_name: "thread".to_string(),
            data_classification: DataClassification::Internal,
        };
        let chunks = chunker.chunk(&meta, "Hello there.");
        let merged = merge_chunks(&chunks);
        assert!(merged.starts_with("[s-chunk-0000] Hello there."));
    }
}
