//! Nested field extraction
//!
//! Walks a dotted field path over a JSON record and yields every value the
//! path reaches. Arrays are expanded into indexed paths (`author[0].given`),
//! and paths that do not resolve are reported as absent instead of failing.

pub mod path;
pub mod walker;

pub use path::FieldPath;
pub use walker::{extract, Extracted, Extraction, Extractor};
