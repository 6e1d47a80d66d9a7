pub mod defs;

pub use defs::{InvalidSearchTerm, ResultItem, SearchTerm};
