use std::fmt;
use std::sync::Arc;

use crate::splitter::TextSplitter;

/// Pluggable text length measure shared by the splitters.
pub type LenFn = Arc<dyn Fn(&str) -> usize + Send + Sync>;

pub const DEFAULT_CHUNK_SIZE: usize = 4000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;
pub const DEFAULT_TOKEN_CHUNK_SIZE: usize = 512;
pub const DEFAULT_TOKEN_CHUNK_OVERLAP: usize = 100;
pub const DEFAULT_MODEL_NAME: &str = "gpt-3.5-turbo";
pub const DEFAULT_ENCODING_NAME: &str = "cl100k_base";

/// Immutable configuration consumed by every splitter.
///
/// Values are built once and shared read-only; a splitter never mutates its
/// options after construction, so one `SplitterOptions` value can back
/// concurrent `split_text` calls.
#[derive(Clone)]
pub struct SplitterOptions {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub separators: Vec<String>,
    pub keep_separator: bool,
    pub len_func: LenFn,
    pub model_name: String,
    pub encoding_name: String,
    pub allowed_special: Vec<String>,
    pub disallowed_special: Vec<String>,
    pub code_blocks: bool,
    pub reference_links: bool,
    pub second_splitter: Option<Arc<dyn TextSplitter>>,
}

impl Default for SplitterOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            separators: vec![
                "\n\n".to_string(),
                "\n".to_string(),
                " ".to_string(),
                String::new(),
            ],
            keep_separator: false,
            len_func: Arc::new(|text| text.chars().count()),
            model_name: DEFAULT_MODEL_NAME.to_string(),
            encoding_name: DEFAULT_ENCODING_NAME.to_string(),
            allowed_special: Vec::new(),
            disallowed_special: vec!["all".to_string()],
            code_blocks: false,
            reference_links: false,
            second_splitter: None,
        }
    }
}

impl SplitterOptions {
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_chunk_overlap(mut self, chunk_overlap: usize) -> Self {
        self.chunk_overlap = chunk_overlap;
        self
    }

    pub fn with_separators(mut self, separators: Vec<String>) -> Self {
        self.separators = separators;
        self
    }

    /// Keep the separator attached to the leading edge of each following
    /// piece instead of dropping it between pieces.
    pub fn with_keep_separator(mut self, keep_separator: bool) -> Self {
        self.keep_separator = keep_separator;
        self
    }

    pub fn with_len_func(
        mut self,
        len_func: impl Fn(&str) -> usize + Send + Sync + 'static,
    ) -> Self {
        self.len_func = Arc::new(len_func);
        self
    }

    /// Resolve the tokenizer from a model name. Clears any explicit
    /// encoding name so the model selection takes effect.
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self.encoding_name = String::new();
        self
    }

    pub fn with_encoding_name(mut self, encoding_name: impl Into<String>) -> Self {
        self.encoding_name = encoding_name.into();
        self
    }

    pub fn with_allowed_special(mut self, allowed_special: Vec<String>) -> Self {
        self.allowed_special = allowed_special;
        self
    }

    pub fn with_disallowed_special(mut self, disallowed_special: Vec<String>) -> Self {
        self.disallowed_special = disallowed_special;
        self
    }

    /// Emit fenced and indented code blocks verbatim (markdown splitter).
    pub fn with_code_blocks(mut self, code_blocks: bool) -> Self {
        self.code_blocks = code_blocks;
        self
    }

    /// Render reference-style links resolved to their destination
    /// (markdown splitter).
    pub fn with_reference_links(mut self, reference_links: bool) -> Self {
        self.reference_links = reference_links;
        self
    }

    /// Splitter applied to markdown snippets that still exceed the chunk
    /// size after block assembly.
    pub fn with_second_splitter(mut self, second_splitter: Arc<dyn TextSplitter>) -> Self {
        self.second_splitter = Some(second_splitter);
        self
    }

    /// Measures text with the configured length function.
    pub fn len_of(&self, text: &str) -> usize {
        (*self.len_func)(text)
    }
}

impl fmt::Debug for SplitterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplitterOptions")
            .field("chunk_size", &self.chunk_size)
            .field("chunk_overlap", &self.chunk_overlap)
            .field("separators", &self.separators)
            .field("keep_separator", &self.keep_separator)
            .field("model_name", &self.model_name)
            .field("encoding_name", &self.encoding_name)
            .field("allowed_special", &self.allowed_special)
            .field("disallowed_special", &self.disallowed_special)
            .field("code_blocks", &self.code_blocks)
            .field("reference_links", &self.reference_links)
            .finish_non_exhaustive()
    }
}
