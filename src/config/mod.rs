pub mod options;

pub use options::{LenFn, SplitterOptions};
