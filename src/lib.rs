//! Text chunking for retrieval pipelines.
//!
//! Four splitters share one `TextSplitter` trait: a recursive character
//! splitter, a token (BPE) splitter, a markdown structure splitter and the
//! chunk-merge kernel underneath them. The document materializer fans a
//! batch of documents out into one document per chunk.
//!
//! ```
//! use rag_chunker::config::SplitterOptions;
//! use rag_chunker::splitter::{RecursiveCharacterSplitter, TextSplitter};
//!
//! let splitter = RecursiveCharacterSplitter::new(
//!     SplitterOptions::default()
//!         .with_chunk_size(20)
//!         .with_chunk_overlap(1),
//! );
//! let chunks = splitter.split_text("Hi.\nI'm Harrison.\n\nHow?\na\nb").unwrap();
//! assert_eq!(chunks, vec!["Hi.\nI'm Harrison.", "How?\na\nb"]);
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod splitter;

pub use config::{LenFn, SplitterOptions};
pub use document::{create_documents, split_documents, Document, Metadata};
pub use error::ChunkerError;
pub use splitter::{
    MarkdownSplitter, RecursiveCharacterSplitter, TextSplitter, TokenSplitter,
};
