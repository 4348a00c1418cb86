pub mod materialize;
pub mod model;

pub use materialize::{create_documents, split_documents};
pub use model::{Document, Metadata};
