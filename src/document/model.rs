use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Free-form key/value metadata attached to a document.
pub type Metadata = HashMap<String, serde_json::Value>;

/// A unit of content flowing through the chunking pipeline.
///
/// The metadata map is shared by reference: every chunk produced from one
/// document aliases the same map as its source. Callers that mutate
/// metadata per chunk must clone the map first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub page_content: String,
    #[serde(default)]
    pub metadata: Arc<Metadata>,
    /// Stable identifier assigned by the caller, carried unchanged onto
    /// every chunk derived from this document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
}

impl Document {
    pub fn new(page_content: impl Into<String>) -> Self {
        Self {
            page_content: page_content.into(),
            metadata: Arc::new(Metadata::new()),
            custom_id: None,
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Arc::new(metadata);
        self
    }

    pub fn with_custom_id(mut self, custom_id: impl Into<String>) -> Self {
        self.custom_id = Some(custom_id.into());
        self
    }
}
