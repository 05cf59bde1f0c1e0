use crate::analyze::{Analyzer, Cell, Row};
use crate::error::FetchError;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

/// What the retrieval side delivered for one identifier
#[derive(Debug)]
pub enum RecordOutcome {
    Fetched(Value),
    Failed(FetchError),
}

impl From<Result<Value, FetchError>> for RecordOutcome {
    fn from(result: Result<Value, FetchError>) -> Self {
        match result {
            Ok(record) => RecordOutcome::Fetched(record),
            Err(err) => RecordOutcome::Failed(err),
        }
    }
}

/// One output row: the record identifier plus its analyzed columns
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub id: String,
    pub cells: Row,
}

/// The finished table
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Identifier column first, then every observed column sorted
    pub columns: Vec<String>,
    pub rows: Vec<ReportRow>,
    /// Number of records that produced a row
    pub fetched: usize,
    /// Number of identifiers whose retrieval failed
    pub failed: usize,
}

impl Report {
    pub fn id_column(&self) -> &str {
        &self.columns[0]
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell for `column` in `row`; `None` when that record never produced it
    pub fn cell<'a>(&self, row: &'a ReportRow, column: &str) -> Option<&'a Cell> {
        row.cells.get(column)
    }

    /// Reorder rows to follow `ids`
    ///
    /// Rows whose identifier is not listed keep their relative order after
    /// the listed ones.
    pub fn order_by(&mut self, ids: &[String]) {
        let position: HashMap<&str, usize> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();
        self.rows
            .sort_by_key(|row| position.get(row.id.as_str()).copied().unwrap_or(usize::MAX));
    }
}

/// Collects analyzed rows as records arrive, in any order
pub struct Aggregator<'a> {
    analyzer: &'a Analyzer,
    id_column: String,
    columns: BTreeSet<String>,
    rows: Vec<ReportRow>,
    failed: usize,
}

impl<'a> Aggregator<'a> {
    pub fn new(analyzer: &'a Analyzer, id_column: impl Into<String>) -> Self {
        Aggregator {
            analyzer,
            id_column: id_column.into(),
            columns: BTreeSet::new(),
            rows: Vec::new(),
            failed: 0,
        }
    }

    /// Add the outcome for one identifier
    pub fn push(&mut self, id: impl Into<String>, outcome: RecordOutcome) {
        let id = id.into();
        match outcome {
            RecordOutcome::Fetched(record) => {
                let mut cells = self.analyzer.analyze(&record);
                // the identifier column always holds the identifier
                if cells.remove(&self.id_column).is_some() {
                    debug!(id = %id, column = %self.id_column, "dropped column shadowing the identifier");
                }
                self.columns.extend(cells.keys().cloned());
                debug!(id = %id, columns = cells.len(), "analyzed record");
                self.rows.push(ReportRow { id, cells });
            }
            RecordOutcome::Failed(err) => {
                warn!(id = %id, error = %err, "skipping record");
                self.failed += 1;
            }
        }
    }

    pub fn finish(self) -> Report {
        let mut columns = Vec::with_capacity(self.columns.len() + 1);
        columns.push(self.id_column);
        columns.extend(self.columns);

        Report {
            columns,
            fetched: self.rows.len(),
            rows: self.rows,
            failed: self.failed,
        }
    }
}

/// Build a report from `(identifier, outcome)` pairs in any order
pub fn aggregate<I, S>(analyzer: &Analyzer, id_column: &str, records: I) -> Report
where
    I: IntoIterator<Item = (S, RecordOutcome)>,
    S: Into<String>,
{
    let mut aggregator = Aggregator::new(analyzer, id_column);
    for (id, outcome) in records {
        aggregator.push(id, outcome);
    }
    aggregator.finish()
}
