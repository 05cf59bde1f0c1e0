//! Per-record field analysis
//!
//! Turns the extraction results of every configured field into report
//! columns: a `yes`/`no` presence flag per resolved path, a single
//! `count: N` per field, or the raw values.

pub mod analyzer;
pub mod cell;
pub mod mode;

pub use analyzer::Analyzer;
pub use cell::{Cell, Row};
pub use mode::{AnalysisConfig, AnalysisMode, FieldRule};
