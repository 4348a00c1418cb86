use std::sync::Arc;

use tracing::debug;

use crate::document::{Document, Metadata};
use crate::error::ChunkerError;
use crate::splitter::TextSplitter;

/// Splits each document's content and emits one output document per chunk,
/// in (document order, chunk order). Metadata is shared by reference with
/// the source document and the `custom_id` is propagated unchanged. The
/// first splitter error aborts the whole batch.
pub fn split_documents(
    splitter: &dyn TextSplitter,
    documents: &[Document],
) -> Result<Vec<Document>, ChunkerError> {
    let mut out = Vec::new();
    for document in documents {
        let chunks = splitter.split_text(&document.page_content)?;
        for chunk in chunks {
            out.push(Document {
                page_content: chunk,
                metadata: Arc::clone(&document.metadata),
                custom_id: document.custom_id.clone(),
            });
        }
    }
    debug!(
        documents = documents.len(),
        chunks = out.len(),
        "split documents"
    );
    Ok(out)
}

/// Pairs raw texts with their metadata and splits them in one pass.
/// `metadatas` may be empty (every document gets an empty map) but must
/// otherwise match `texts` in length.
pub fn create_documents(
    splitter: &dyn TextSplitter,
    texts: &[String],
    metadatas: &[Metadata],
) -> Result<Vec<Document>, ChunkerError> {
    if !metadatas.is_empty() && texts.len() != metadatas.len() {
        return Err(ChunkerError::MismatchMetadata);
    }

    let documents: Vec<Document> = texts
        .iter()
        .enumerate()
        .map(|(idx, text)| {
            let metadata = metadatas.get(idx).cloned().unwrap_or_default();
            Document::new(text.clone()).with_metadata(metadata)
        })
        .collect();

    split_documents(splitter, &documents)
}
