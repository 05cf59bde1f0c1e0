//! Report aggregation and output
//!
//! Merges per-record analysis rows into a single table whose columns are
//! the identifier column followed by every observed column in sorted
//! order, and writes that table as CSV.

pub mod aggregate;
pub mod writer;

pub use aggregate::{aggregate, Aggregator, RecordOutcome, Report, ReportRow};
pub use writer::ReportWriter;
