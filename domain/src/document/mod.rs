//! Documents and the windows they are split into.
//!
//! - [`entities::Document`] - a retrieved article, already truncated
//! - [`entities::Chunk`] - a window of a document sized for the reader model
//! - [`chunker::Chunker`] - splits documents into non-overlapping windows

pub mod chunker;
pub mod entities;
