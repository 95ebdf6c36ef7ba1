//! Sentence-aware chunk packing

use crate::ChunkerConfig;
use chrono::Utc;
use sha2::{Digest, Sha256};
use ursgen_domain::{DataClassification, SourceChunk, SourceType};

/// Provenance shared by every chunk cut from one source.
#[derive(Debug, Clone)]
pub struct SourceMeta {
    /// Source id, the chunk id prefix
    pub source_id: String,
    /// Kind of source material
    pub source_type: SourceType,
    /// Human-readable source name
    pub source_name: String,
    /// Classification inherited by every chunk
    pub data_classification: DataClassification,
}

/// A packed chunk body with offsets into the cleaned sentence stream.
struct PackedBody {
    content: String,
    start_offset: usize,
    end_offset: usize,
}

/// Splits cleaned text into overlapping, sentence-aligned chunks.
pub struct Chunker {
    config: ChunkerConfig,
}

impl Chunker {
    /// Create a chunker with the given configuration.
    pub fn new(config: ChunkerConfig) -> Self {
        Self { config }
    }

    /// Chunk a single body of text. Whitespace-only input produces no
    /// chunks.
    pub fn chunk(&self, meta: &SourceMeta, text: &str) -> Vec<SourceChunk> {
        let sentences = split_sentences(&clean_text(text));
        self.pack(&sentences)
            .into_iter()
            .enumerate()
            .map(|(index, body)| self.build_chunk(meta, index, body, None))
            .collect()
    }

    /// Chunk page-structured input (e.g. an extracted PDF). Chunk indices
    /// run continuously across pages; each chunk records its page number
    /// and offsets relative to that page.
    pub fn chunk_pages(&self, meta: &SourceMeta, pages: &[(u32, String)]) -> Vec<SourceChunk> {
        let mut chunks = Vec::new();
        let mut index = 0usize;
        for (page_number, text) in pages {
            let sentences = split_sentences(&clean_text(text));
            for body in self.pack(&sentences) {
                chunks.push(self.build_chunk(meta, index, body, Some(*page_number)));
                index += 1;
            }
        }
        chunks
    }

    fn build_chunk(
        &self,
        meta: &SourceMeta,
        index: usize,
        body: PackedBody,
        page_number: Option<u32>,
    ) -> SourceChunk {
        let content_hash = content_hash(&body.content);
        SourceChunk {
            chunk_id: ursgen_domain::ids::format_chunk_id(&meta.source_id, index),
            source_id: meta.source_id.clone(),
            source_type: meta.source_type,
            source_name: meta.source_name.clone(),
            content: body.content,
            content_hash,
            page_number,
            start_offset: Some(body.start_offset),
            end_offset: Some(body.end_offset),
            data_classification: meta.data_classification,
            created_at: Utc::now(),
        }
    }

    /// Pack whole sentences into bodies of at most `chunk_size` characters,
    /// carrying trailing sentences up to `overlap` characters into the next
    /// body.
    fn pack(&self, sentences: &[String]) -> Vec<PackedBody> {
        // Sentence offsets in the stream where sentences are joined by
        // single spaces.
        let mut offsets = Vec::with_capacity(sentences.len());
        let mut cursor = 0usize;
        for sentence in sentences {
            offsets.push(cursor);
            cursor += sentence.len() + 1;
        }

        let make_body = |indices: &[usize]| -> PackedBody {
            let first = indices[0];
            let last = indices[indices.len() - 1];
            PackedBody {
                content: indices
                    .iter()
                    .map(|&i| sentences[i].as_str())
                    .collect::<Vec<_>>()
                    .join(" "),
                start_offset: offsets[first],
                end_offset: offsets[last] + sentences[last].len(),
            }
        };
        let joined_len = |indices: &[usize]| -> usize {
            if indices.is_empty() {
                return 0;
            }
            indices.iter().map(|&i| sentences[i].len()).sum::<usize>() + indices.len() - 1
        };

        let mut bodies: Vec<PackedBody> = Vec::new();
        let mut current: Vec<usize> = Vec::new();

        for (idx, sentence) in sentences.iter().enumerate() {
            // A sentence that alone exceeds the chunk size is hard-split.
            if sentence.len() > self.config.chunk_size {
                if !current.is_empty() {
                    bodies.push(make_body(&current));
                    current.clear();
                }
                let base = offsets[idx];
                let mut piece_start = 0usize;
                for piece in hard_split(sentence, self.config.chunk_size) {
                    let piece_len = piece.len();
                    bodies.push(PackedBody {
                        content: piece,
                        start_offset: base + piece_start,
                        end_offset: base + piece_start + piece_len,
                    });
                    piece_start += piece_len;
                }
                continue;
            }

            let added = if current.is_empty() {
                sentence.len()
            } else {
                sentence.len() + 1
            };
            if joined_len(&current) + added > self.config.chunk_size && !current.is_empty() {
                bodies.push(make_body(&current));
                let mut tail = overlap_tail(&current, sentences, self.config.overlap);
                // Shrink the carried tail so the next body stays in bounds.
                while !tail.is_empty()
                    && joined_len(&tail) + 1 + sentence.len() > self.config.chunk_size
                {
                    tail.remove(0);
                }
                current = tail;
            }
            current.push(idx);
        }

        if !current.is_empty() {
            bodies.push(make_body(&current));
        }
        bodies
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new(ChunkerConfig::default())
    }
}

/// Collapse whitespace runs within paragraphs, keeping paragraph breaks.
/// Control characters fall out with the rest of the whitespace handling.
fn clean_text(text: &str) -> String {
    text.split("\n\n")
        .map(|paragraph| {
            paragraph
                .split(|c: char| c.is_whitespace() || c.is_control())
                .filter(|w| !w.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Split on sentence-ending punctuation followed by whitespace and an
/// uppercase letter. Paragraph breaks always end a sentence.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    for paragraph in text.split("\n\n") {
        let chars: Vec<char> = paragraph.chars().collect();
        let mut start = 0usize;
        let mut i = 0usize;
        while i < chars.len() {
            if matches!(chars[i], '.' | '!' | '?') {
                // Find the next non-whitespace character.
                let mut j = i + 1;
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }
                if j > i + 1 && j < chars.len() && chars[j].is_uppercase() {
                    let sentence: String = chars[start..=i].iter().collect();
                    let sentence = sentence.trim().to_string();
                    if !sentence.is_empty() {
                        sentences.push(sentence);
                    }
                    start = j;
                    i = j;
                    continue;
                }
            }
            i += 1;
        }
        if start < chars.len() {
            let sentence: String = chars[start..].iter().collect();
            let sentence = sentence.trim().to_string();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
        }
    }
    sentences
}

/// Trailing sentence indices totaling at most `overlap` characters.
fn overlap_tail(indices: &[usize], sentences: &[String], overlap: usize) -> Vec<usize> {
    let mut tail: Vec<usize> = Vec::new();
    let mut len = 0usize;
    for &idx in indices.iter().rev() {
        let added = if tail.is_empty() {
            sentences[idx].len()
        } else {
            sentences[idx].len() + 1
        };
        if len + added > overlap {
            break;
        }
        len += added;
        tail.push(idx);
    }
    tail.reverse();
    tail
}

/// Split oversized text on character boundaries into `limit`-sized pieces.
fn hard_split(text: &str, limit: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(limit)
        .map(|piece| piece.iter().collect())
        .collect()
}

/// Truncated SHA-256 of the chunk content, 16 hex characters.
pub fn content_hash(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
    hex[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn meta() -> SourceMeta {
        SourceMeta {
            source_id: "src-1".to_string(),
            source_type: SourceType::UserInput,
            source_name: "notes".to_string(),
            data_classification: DataClassification::Internal,
        }
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        let chunker = Chunker::default();
        assert!(chunker.chunk(&meta(), "").is_empty());
        assert!(chunker.chunk(&meta(), "   \n\n  \t ").is_empty());
    }

    #[test]
    fn small_input_is_one_chunk() {
        let chunker = Chunker::default();
        let chunks = chunker.chunk(&meta(), "The team processes invoices by hand.");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].chunk_id, "src-1-chunk-0000");
        assert_eq!(chunks[0].content_hash.len(), 16);
        assert_eq!(chunks[0].start_offset, Some(0));
    }

    #[test]
    fn whitespace_is_normalized_within_paragraphs() {
        let chunker = Chunker::default();
        let chunks = chunker.chunk(&meta(), "Too   many\tspaces.   Here.");
        assert_eq!(chunks[0].content, "Too many spaces. Here.");
    }

    #[test]
    fn sentences_split_on_punctuation_before_uppercase() {
        let got = split_sentences("First point. Second point! Is this third? Yes.");
        assert_eq!(
            got,
            vec!["First point.", "Second point!", "Is this third?", "Yes."]
        );
    }

    #[test]
    fn abbreviation_before_lowercase_does_not_split() {
        let got = split_sentences("Approx. five people use it daily.");
        assert_eq!(got, vec!["Approx. five people use it daily."]);
    }

    #[test]
    fn consecutive_chunks_share_overlap() {
        let config = ChunkerConfig {
            chunk_size: 60,
            overlap: 25,
        };
        let chunker = Chunker::new(config);
        let text = "Alpha sentence one here. Beta sentence two here. Gamma sentence three here. Delta sentence four here.";
        let chunks = chunker.chunk(&meta(), text);
        assert!(chunks.len() >= 2);
        // The second chunk repeats the tail sentence of the first.
        let first_tail = chunks[0].content.split(". ").last().unwrap();
        assert!(chunks[1].content.contains(first_tail.trim_end_matches('.')));
    }

    #[test]
    fn offsets_track_sentence_positions() {
        let config = ChunkerConfig {
            chunk_size: 60,
            overlap: 0,
        };
        let chunker = Chunker::new(config);
        let text = "Alpha sentence one here. Beta sentence two here. Gamma sentence three here.";
        let chunks = chunker.chunk(&meta(), text);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].start_offset, Some(0));
        assert_eq!(chunks[0].end_offset, Some(48));
        // The second chunk starts where "Gamma" starts in the cleaned
        // stream.
        assert_eq!(chunks[1].start_offset, Some(49));
        assert_eq!(&text[49..54], "Gamma");
    }

    #[test]
    fn oversized_sentence_is_hard_split() {
        let config = ChunkerConfig {
            chunk_size: 50,
            overlap: 10,
        };
        let chunker = Chunker::new(config);
        let text = "x".repeat(130);
        let chunks = chunker.chunk(&meta(), &text);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.content.len() <= 50));
        assert_eq!(chunks[1].start_offset, Some(50));
        assert_eq!(chunks[2].end_offset, Some(130));
    }

    #[test]
    fn chunk_ids_are_sequential() {
        let config = ChunkerConfig {
            chunk_size: 40,
            overlap: 0,
        };
        let chunker = Chunker::new(config);
        let text = "One sentence here. Two sentence here. Three sentence here. Four sentence here.";
        let chunks = chunker.chunk(&meta(), text);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_id, format!("src-1-chunk-{:04}", i));
        }
    }

    #[test]
    fn pages_carry_page_numbers_and_continuous_indices() {
        let chunker = Chunker::default();
        let pages = vec![
            (1u32, "Page one content. More of page one.".to_string()),
            (2u32, "Page two content.".to_string()),
        ];
        let chunks = chunker.chunk_pages(&meta(), &pages);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].page_number, Some(1));
        assert_eq!(chunks[1].page_number, Some(2));
        assert_eq!(chunks[1].chunk_id, "src-1-chunk-0001");
    }

    #[test]
    fn identical_content_hashes_identically() {
        let chunker = Chunker::default();
        let a = chunker.chunk(&meta(), "Same text here.");
        let b = chunker.chunk(&meta(), "Same text here.");
        assert_eq!(a[0].content_hash, b[0].content_hash);
    }

    proptest! {
        #[test]
        fn chunks_never_exceed_size(text in "[ -~]{0,400}") {
            let config = ChunkerConfig { chunk_size: 80, overlap: 20 };
            let chunker = Chunker::new(config);
            for chunk in chunker.chunk(&meta(), &text) {
                prop_assert!(chunk.content.len() <= 80);
            }
        }

        #[test]
        fn chunking_is_deterministic(text in "[ -~]{0,400}") {
            let chunker = Chunker::default();
            let a: Vec<(String, String)> = chunker
                .chunk(&meta(), &text)
                .into_iter()
                .map(|c| (c.chunk_id, c.content_hash))
                .collect();
            let b: Vec<(String, String)> = chunker
                .chunk(&meta(), &text)
                .into_iter()
                .map(|c| (c.chunk_id, c.content_hash))
                .collect();
            prop_assert_eq!(a, b);
        }
    }
}
