//! Prompt context assembly with citation markers.

use serde::Serialize;

use crate::document::Chunk;

/// Retrieved chunks joined into one prompt string, plus the source document
/// of every cited entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssembledContext {
    /// `"[1] <chunk> [2] <chunk> ..."` in retrieval rank order.
    pub text: String,
    /// `sources[i]` is the document that marker `[i + 1]` cites.
    pub sources: Vec<String>,
}

impl AssembledContext {
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Prefix each chunk with a 1-based citation marker and join them with a
/// single space, preserving order.
///
/// No hits produce an empty context, not an error.
pub fn assemble_context<'a, I>(ranked: I) -> AssembledContext
where
    I: IntoIterator<Item = &'a Chunk>,
{
    let mut parts = Vec::new();
    let mut sources = Vec::new();
    for (i, chunk) in ranked.into_iter().enumerate() {
        parts.push(format!("[{}] {}", i + 1, chunk.text));
        sources.push(chunk.source_document.clone());
    }
    AssembledContext { text: parts.join(" "), sources }
}
