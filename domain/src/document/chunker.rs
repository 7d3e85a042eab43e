//! Whitespace chunker.
//!
//! Splits a document into consecutive, non-overlapping windows of at most
//! `chunk_size` words. Each call to [`Chunker::chunks`] starts from the
//! beginning of the text, so the sequence can be consumed lazily or
//! materialized any number of times.
//!
//! ```text
//! chunk_size = 3
//! "a b c d e f g"  ->  "a b c" | "d e f" | "g"
//! ```

use super::entities::{Chunk, Document};
use std::num::NonZeroUsize;
use std::str::SplitWhitespace;

/// Splits text into word windows of a fixed maximum size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    chunk_size: NonZeroUsize,
}

impl Chunker {
    pub fn new(chunk_size: NonZeroUsize) -> Self {
        Self { chunk_size }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size.get()
    }

    /// Lazily yield the chunk texts of `text`
    pub fn chunks<'a>(&self, text: &'a str) -> Chunks<'a> {
        let remaining = text.split_whitespace().count();
        Chunks {
            words: text.split_whitespace(),
            chunk_size: self.chunk_size.get(),
            remaining,
        }
    }

    /// Lazily yield the chunks of a document, tagged with its title
    pub fn chunk_document<'a>(self, document: &'a Document) -> impl Iterator<Item = Chunk> + 'a {
        self.chunks(&document.text)
            .map(move |text| Chunk::new(document.title.clone(), text))
    }
}

/// Iterator over the chunk texts of one document
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    words: SplitWhitespace<'a>,
    chunk_size: usize,
    remaining: usize,
}

impl Iterator for Chunks<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.remaining == 0 {
            return None;
        }
        let take = self.chunk_size.min(self.remaining);
        self.remaining -= take;

        let mut chunk = String::new();
        for word in self.words.by_ref().take(take) {
            if !chunk.is_empty() {
                chunk.push(' ');
            }
            chunk.push_str(word);
        }
        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining.div_ceil(self.chunk_size);
        (n, Some(n))
    }
}

impl ExactSizeIterator for Chunks<'_> {}
