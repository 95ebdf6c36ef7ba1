//! Identifier formats and validators.
//!
//! Document ids are `URS-YYYY-NNNN`, requirements are `FR-NNN` / `NFR-NNN`,
//! chunks are `{source_id}-chunk-NNNN`. The formatters here are the single
//! place these shapes are written.

/// Format a document id from year and sequence number.
pub fn format_urs_id(year: i32, seq: u32) -> String {
    format!("URS-{}-{:04}", year, seq)
}

/// Format a functional requirement id.
pub fn format_fr_id(seq: u32) -> String {
    format!("FR-{:03}", seq)
}

/// Format a non-functional requirement id.
pub fn format_nfr_id(seq: u32) -> String {
    format!("NFR-{:03}", seq)
}

/// Format a chunk id from its source id and position.
pub fn format_chunk_id(source_id: &str, index: usize) -> String {
    format!("{}-chunk-{:04}", source_id, index)
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// True for ids shaped `URS-YYYY-NNNN`.
pub fn is_valid_urs_id(id: &str) -> bool {
    let mut parts = id.split('-');
    matches!(
        (parts.next(), parts.next(), parts.next(), parts.next()),
        (Some("URS"), Some(year), Some(seq), None)
            if year.len() == 4 && all_digits(year) && seq.len() == 4 && all_digits(seq)
    )
}

/// True for ids shaped `FR-NNN`.
pub fn is_valid_fr_id(id: &str) -> bool {
    match id.strip_prefix("FR-") {
        Some(seq) => seq.len() == 3 && all_digits(seq),
        None => false,
    }
}

/// True for ids shaped `NFR-NNN`.
pub fn is_valid_nfr_id(id: &str) -> bool {
    match id.strip_prefix("NFR-") {
        Some(seq) => seq.len() == 3 && all_digits(seq),
        None => false,
    }
}

/// True for ids shaped `{source_id}-chunk-NNNN`.
pub fn is_valid_chunk_id(id: &str) -> bool {
    match id.rfind("-chunk-") {
        Some(pos) => {
            let (source, seq) = (&id[..pos], &id[pos + "-chunk-".len()..]);
            !source.is_empty() && seq.len() == 4 && all_digits(seq)
        }
        None => false,
    }
}
