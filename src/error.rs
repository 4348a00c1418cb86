use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChunkerError {
    #[error("tiktoken: {0}")]
    Tokenizer(String),

    #[error("Disallowed special token found in text: {0}")]
    DisallowedSpecialToken(String),

    #[error("number of texts and metadatas does not match")]
    MismatchMetadata,
}

impl From<anyhow::Error> for ChunkerError {
    fn from(err: anyhow::Error) -> Self {
        ChunkerError::Tokenizer(err.to_string())
    }
}
