//! Bounded chunking of normalized source text

use crate::reader::SourceUnit;
use dossier_domain::TextChunk;

/// Splits normalized text into chunks of at most `max_chunk_chars` characters
pub struct TextChunker {
    max_chunk_chars: usize,
}

impl TextChunker {
    /// Create a new text chunker
    pub fn new(max_chunk_chars: usize) -> Self {
        Self {
            max_chunk_chars: max_chunk_chars.max(1),
        }
    }

    /// Chunk the given text
    ///
    /// Text within the limit is one chunk. Otherwise each window is cut at its
    /// last paragraph break when that break lies past the middle of the
    /// window, else hard-cut at the window end. Pieces are trimmed and empty
    /// pieces dropped.
    pub fn split(&self, text: &str) -> Vec<String> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }
        if text.chars().count() <= self.max_chunk_chars {
            return vec![text.to_string()];
        }

        let mut chunks = Vec::new();
        let mut start = 0;
        while start < text.len() {
            let rest = &text[start..];
            let window_end = rest
                .char_indices()
                .nth(self.max_chunk_chars)
                .map(|(i, _)| i)
                .unwrap_or(rest.len());
            let window = &rest[..window_end];

            let cut = match window.rfind("\n\n") {
                Some(pos) if window[..pos].chars().count() > self.max_chunk_chars / 2 => pos,
                _ => window_end,
            };

            let piece = rest[..cut].trim();
            if !piece.is_empty() {
                chunks.push(piece.to_string());
            }
            start += cut;
        }

        chunks
    }

    /// Chunk one source unit into labelled text chunks
    pub fn chunk_unit(&self, unit: &SourceUnit) -> Vec<TextChunk> {
        self.split(&unit.text)
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                TextChunk::new(unit.source_id.as_str(), chunk_label(&unit.location, i + 1), text)
            })
            .collect()
    }
}

/// Location label of the `n`th (1-based) chunk of a unit
pub fn chunk_label(location: &str, n: usize) -> String {
    if n <= 1 {
        location.to_string()
    } else {
        format!("{}, chunk {}", location, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_chunking_needed_for_small_text() {
        let chunker = TextChunker::new(100);
        let chunks = chunker.split("Short text here.");
        assert_eq!(chunks, vec!["Short text here."]);
    }

    #[test]
    fn test_empty_text() {
        assert!(TextChunker::new(100).split("   ").is_empty());
    }

    #[test]
    fn test_cuts_at_late_paragraph_break() {
        let chunker = TextChunker::new(30);
        let text = "First paragraph is long.\n\nSecond paragraph here.";
        let chunks = chunker.split(text);
        assert_eq!(chunks, vec!["First paragraph is long.", "Second paragraph here."]);
    }

    #[test]
    fn test_early_paragraph_break_is_ignored() {
        let chunker = TextChunker::new(20);
        let text = "Tiny.\n\nabcdefghijklmnopqrstuvwxyz";
        let chunks = chunker.split(text);
        assert_eq!(chunks[0], "Tiny.\n\nabcdefghijklm");
        assert_eq!(chunks[1], "nopqrstuvwxyz");
    }

    #[test]
    fn test_very_long_single_paragraph() {
        let chunker = TextChunker::new(20);
        let text = "a".repeat(100);
        let chunks = chunker.split(&text);
        assert_eq!(chunks.len(), 5);
        assert!(chunks.iter().all(|c| c.chars().count() <= 20));
    }

    #[test]
    fn test_multibyte_boundaries() {
        let chunker = TextChunker::new(3);
        let chunks = chunker.split("äöüßéè");
        assert_eq!(chunks, vec!["äöü", "ßéè"]);
    }

    #[test]
    fn test_chunks_are_substrings_of_source() {
        let chunker = TextChunker::new(40);
        let text = "Revenue was $5M in 2023.\n\nHeadcount grew to 40 people.\n\nThe company opened an office in Berlin and one in Oslo.";
        for chunk in chunker.split(text) {
            assert!(text.contains(&chunk));
            assert!(chunk.chars().count() <= 40);
        }
    }

    #[test]
    fn test_chunk_unit_labels() {
        let unit = SourceUnit::new("deck.pdf", "page 3", "x".repeat(25));
        let chunks = TextChunker::new(10).chunk_unit(&unit);
        let labels: Vec<&str> = chunks.iter().map(|c| c.location.as_str()).collect();
        assert_eq!(labels, vec!["page 3", "page 3, chunk 2", "page 3, chunk 3"]);
        assert!(chunks.iter().all(|c| c.source_id == "deck.pdf"));
    }
}
