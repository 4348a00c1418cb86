pub mod markdown;
pub mod merge;
pub mod recursive;
pub mod token;

pub use markdown::MarkdownSplitter;
pub use recursive::RecursiveCharacterSplitter;
pub use token::TokenSplitter;

use crate::error::ChunkerError;

#[cfg(test)]
use mockall::automock;

/// Capability implemented by every splitter: turn one text into a sequence
/// of bounded-size chunks.
///
/// Splitters are pure and synchronous; a value can be shared across threads
/// and each call owns its own traversal state.
#[cfg_attr(test, automock)]
pub trait TextSplitter: Send + Sync {
    fn split_text(&self, text: &str) -> Result<Vec<String>, ChunkerError>;
}
