use tracing::warn;

use crate::config::SplitterOptions;
use crate::error::ChunkerError;
use crate::splitter::merge::merge_splits;
use crate::splitter::TextSplitter;

/// Splits text on the first separator present in it, recursively
/// re-splitting any piece that is still over the chunk size with the
/// remaining separators, then folds the pieces back together through the
/// chunk-merge kernel.
pub struct RecursiveCharacterSplitter {
    options: SplitterOptions,
}

impl RecursiveCharacterSplitter {
    pub fn new(options: SplitterOptions) -> Self {
        Self { options }
    }

    fn split(&self, text: &str, separators: &[String]) -> Vec<String> {
        // First separator that is empty or occurs in the text wins; the
        // empty string is a catch-all meaning "split into characters".
        // When nothing matches, the last separator is kept as a fallback:
        // splitting on it yields the whole text as one piece, which the
        // merge pass below still trims.
        let mut separator = separators.last().map_or("", String::as_str);
        let mut sep_end = separators.len();
        for (idx, sep) in separators.iter().enumerate() {
            if sep.is_empty() || text.contains(sep.as_str()) {
                separator = sep;
                sep_end = idx + 1;
                break;
            }
        }
        let remaining = &separators[sep_end..];

        let splits = split_on_separator(text, separator, self.options.keep_separator);
        let merge_sep = if self.options.keep_separator {
            ""
        } else {
            separator
        };

        let mut final_chunks: Vec<String> = Vec::new();
        let mut good: Vec<String> = Vec::new();
        for split in splits {
            if self.options.len_of(&split) < self.options.chunk_size {
                good.push(split);
                continue;
            }

            // Flush accumulated small pieces before handling the oversized
            // one, so chunk order follows text order.
            if !good.is_empty() {
                self.merge_into(&mut final_chunks, &good, merge_sep);
                good.clear();
            }

            if remaining.is_empty() {
                warn!(
                    piece_len = self.options.len_of(&split),
                    chunk_size = self.options.chunk_size,
                    "atomic piece exceeds the chunk size"
                );
                final_chunks.push(split);
            } else {
                final_chunks.extend(self.split(&split, remaining));
            }
        }
        if !good.is_empty() {
            self.merge_into(&mut final_chunks, &good, merge_sep);
        }

        final_chunks
    }

    fn merge_into(&self, chunks: &mut Vec<String>, pieces: &[String], separator: &str) {
        let refs: Vec<&str> = pieces.iter().map(String::as_str).collect();
        chunks.extend(merge_splits(
            &refs,
            separator,
            self.options.chunk_size,
            self.options.chunk_overlap,
            &*self.options.len_func,
        ));
    }
}

impl Default for RecursiveCharacterSplitter {
    fn default() -> Self {
        Self::new(SplitterOptions::default())
    }
}

impl TextSplitter for RecursiveCharacterSplitter {
    fn split_text(&self, text: &str) -> Result<Vec<String>, ChunkerError> {
        Ok(self.split(text, &self.options.separators))
    }
}

fn split_on_separator(text: &str, separator: &str, keep_separator: bool) -> Vec<String> {
    if separator.is_empty() {
        return text.chars().map(String::from).collect();
    }
    text.split(separator)
        .enumerate()
        .map(|(idx, piece)| {
            if keep_separator && idx > 0 {
                format!("{separator}{piece}")
            } else {
                piece.to_string()
            }
        })
        .collect()
}
