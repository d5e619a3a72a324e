//! Fixed-size sliding-window chunking.
//!
//! [`FixedSizeChunker`] cuts a document into windows of `chunk_size`
//! characters, each starting `chunk_size - chunk_overlap` characters after the
//! previous one. The final window is truncated to the remaining text, and the
//! first window that reaches the end of the text is the last one emitted.
//!
//! Offsets and sizes count `char`s, so a window never splits a UTF-8 sequence.

use crate::document::{Chunk, Document};
use crate::error::{RagError, Result};

/// Splits text into overlapping fixed-size windows.
///
/// # Example
///
/// ```rust,ignore
/// use benefits_rag::FixedSizeChunker;
///
/// let chunker = FixedSizeChunker::new(1000, 200)?;
/// for chunk in chunker.chunks(&document) {
///     println!("{} #{}: {} chars", chunk.source_document, chunk.index, chunk.text.len());
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSizeChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl FixedSizeChunker {
    /// Create a new `FixedSizeChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` — number of characters per chunk
    /// * `chunk_overlap` — number of characters shared by consecutive chunks
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ChunkingError`] unless `0 <= chunk_overlap < chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(RagError::ChunkingError("chunk_size must be greater than zero".into()));
        }
        if chunk_overlap >= chunk_size {
            return Err(RagError::ChunkingError(format!(
                "chunk_overlap ({chunk_overlap}) must be less than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self { chunk_size, chunk_overlap })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Distance in characters between the starts of consecutive chunks.
    pub fn step(&self) -> usize {
        self.chunk_size - self.chunk_overlap
    }

    /// Lazily chunk a document. Calling this again restarts from offset 0.
    pub fn chunks<'a>(&self, document: &'a Document) -> Chunks<'a> {
        self.chunk_text(&document.text, &document.id)
    }

    /// Lazily chunk raw text, tagging every chunk with `source_document`.
    pub fn chunk_text<'a>(&self, text: &'a str, source_document: &'a str) -> Chunks<'a> {
        Chunks {
            text,
            source_document,
            chunk_size: self.chunk_size,
            step: self.step(),
            byte_pos: 0,
            char_pos: 0,
            index: 0,
        }
    }

    /// Chunk a document eagerly.
    pub fn chunk(&self, document: &Document) -> Vec<Chunk> {
        self.chunks(document).collect()
    }
}

/// Lazy iterator over the chunks of one text. See [`FixedSizeChunker::chunks`].
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    text: &'a str,
    source_document: &'a str,
    chunk_size: usize,
    step: usize,
    byte_pos: usize,
    char_pos: usize,
    index: usize,
}

/// Byte length of the first `chars` characters of `text` (all of it if shorter).
fn byte_len_of_chars(text: &str, chars: usize) -> usize {
    text.char_indices().nth(chars).map_or(text.len(), |(i, _)| i)
}

impl Iterator for Chunks<'_> {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        if self.byte_pos >= self.text.len() {
            return None;
        }

        let rest = &self.text[self.byte_pos..];
        let end = byte_len_of_chars(rest, self.chunk_size);
        let chunk = Chunk {
            text: rest[..end].to_string(),
            source_document: self.source_document.to_string(),
            index: self.index,
            offset: self.char_pos,
        };

        self.index += 1;
        if end == rest.len() {
            // This window reached the end of the text.
            self.byte_pos = self.text.len();
        } else {
            self.byte_pos += byte_len_of_chars(rest, self.step);
            self.char_pos += self.step;
        }

        Some(chunk)
    }
}

impl std::iter::FusedIterator for Chunks<'_> {}
