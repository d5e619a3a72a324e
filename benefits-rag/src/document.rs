//! Data types for documents, chunks, and search hits.

use serde::{Deserialize, Serialize};

/// A source document with its extracted text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Document name; the file name for documents read from disk.
    pub id: String,
    /// Full text: the page texts concatenated without a separator.
    pub text: String,
    /// Number of pages the text was extracted from.
    pub pages: usize,
}

impl Document {
    /// A single-page document.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into(), pages: 1 }
    }

    /// Build a document from per-page texts.
    pub fn from_pages<I, S>(id: impl Into<String>, pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        let mut count = 0;
        for page in pages {
            text.push_str(page.as_ref());
            count += 1;
        }
        Self { id: id.into(), text, pages: count }
    }
}

/// A bounded window of a [`Document`]'s text; the unit of retrieval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    /// The chunk text.
    pub text: String,
    /// The [`Document::id`] this chunk was cut from.
    pub source_document: String,
    /// Position of the chunk within its document (0-based).
    pub index: usize,
    /// Start offset within the document text, in characters.
    pub offset: usize,
}

/// A search result: position of the chunk in the corpus and its score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    /// Index into the corpus chunk sequence.
    pub chunk_index: usize,
    /// Inner product with the query (cosine similarity; higher is closer).
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pages_concatenates_without_separator() {
        let doc = Document::from_pages("plan.pdf", ["Page 1 text", "", "Page 3 text"]);
        assert_eq!(doc.text, "Page 1 textPage 3 text");
        assert_eq!(doc.pages, 3);
    }
}
