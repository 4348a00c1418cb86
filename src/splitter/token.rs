use std::collections::HashSet;

use tiktoken_rs::CoreBPE;
use tracing::debug;

use crate::config::SplitterOptions;
use crate::error::ChunkerError;
use crate::splitter::TextSplitter;

/// Splits text by sliding a fixed-stride window over its token ids and
/// decoding each window back to text through the tokenizer.
pub struct TokenSplitter {
    options: SplitterOptions,
}

impl TokenSplitter {
    pub fn new(options: SplitterOptions) -> Self {
        Self { options }
    }

    /// Binds the tokenizer: an explicit encoding name wins, otherwise the
    /// model name resolves to its default encoding.
    fn resolve_tokenizer(&self) -> Result<CoreBPE, ChunkerError> {
        if !self.options.encoding_name.is_empty() {
            return bpe_for_encoding(&self.options.encoding_name).map_err(ChunkerError::from);
        }
        tiktoken_rs::get_bpe_from_model(&self.options.model_name).map_err(ChunkerError::from)
    }

    fn encode(&self, bpe: &CoreBPE, text: &str) -> Result<Vec<usize>, ChunkerError> {
        // Concretely disallowed special tokens are rejected when present.
        if !self.options.disallowed_special.iter().any(|t| t == "all") {
            for token in &self.options.disallowed_special {
                if !self.options.allowed_special.contains(token) && text.contains(token.as_str()) {
                    return Err(ChunkerError::DisallowedSpecialToken(token.clone()));
                }
            }
        }

        if self.options.allowed_special.iter().any(|t| t == "all") {
            return Ok(bpe.encode_with_special_tokens(text));
        }
        let allowed: HashSet<&str> = self
            .options
            .allowed_special
            .iter()
            .map(String::as_str)
            .collect();
        Ok(bpe.encode(text, allowed))
    }

    fn split_ids(&self, bpe: &CoreBPE, ids: &[usize]) -> Result<Vec<String>, ChunkerError> {
        if ids.is_empty() {
            return Ok(vec![String::new()]);
        }

        // Stride is always at least one id so the window advances even
        // when the overlap reaches the chunk size.
        let stride = self
            .options
            .chunk_size
            .saturating_sub(self.options.chunk_overlap)
            .max(1);

        let mut chunks = Vec::new();
        let mut start = 0;
        while start < ids.len() {
            let end = (start + self.options.chunk_size).min(ids.len());
            let window = ids[start..end].to_vec();
            let piece = bpe
                .decode(window)
                .map_err(|err| ChunkerError::Tokenizer(err.to_string()))?;
            chunks.push(piece);
            start += stride;
        }
        Ok(chunks)
    }
}

impl Default for TokenSplitter {
    fn default() -> Self {
        Self::new(
            SplitterOptions::default()
                .with_chunk_size(crate::config::options::DEFAULT_TOKEN_CHUNK_SIZE)
                .with_chunk_overlap(crate::config::options::DEFAULT_TOKEN_CHUNK_OVERLAP),
        )
    }
}

impl TextSplitter for TokenSplitter {
    fn split_text(&self, text: &str) -> Result<Vec<String>, ChunkerError> {
        let bpe = self.resolve_tokenizer()?;
        let ids = self.encode(&bpe, text)?;
        let chunks = self.split_ids(&bpe, &ids)?;
        debug!(tokens = ids.len(), chunks = chunks.len(), "split text by tokens");
        Ok(chunks)
    }
}

fn bpe_for_encoding(name: &str) -> anyhow::Result<CoreBPE> {
    match name {
        "cl100k_base" => tiktoken_rs::cl100k_base(),
        "o200k_base" => tiktoken_rs::o200k_base(),
        "p50k_base" => tiktoken_rs::p50k_base(),
        "p50k_edit" => tiktoken_rs::p50k_edit(),
        "r50k_base" | "gpt2" => tiktoken_rs::r50k_base(),
        _ => Err(anyhow::anyhow!("unknown encoding name: {name}")),
    }
}
