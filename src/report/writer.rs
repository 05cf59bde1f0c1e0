use crate::report::aggregate::Report;
use anyhow::{Context, Result};
use std::borrow::Cow;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a [`Report`] as CSV: a header row, then one line per record
pub struct ReportWriter<W: Write> {
    writer: csv::Writer<W>,
    absent_marker: String,
}

impl ReportWriter<File> {
    /// Create (or truncate) the file at `path`
    pub fn to_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(ReportWriter::new(file))
    }
}

impl<W: Write> ReportWriter<W> {
    pub fn new(writer: W) -> Self {
        ReportWriter {
            writer: csv::Writer::from_writer(writer),
            absent_marker: String::new(),
        }
    }

    /// Text written for paths that did not resolve (empty by default)
    pub fn with_absent_marker(mut self, marker: impl Into<String>) -> Self {
        self.absent_marker = marker.into();
        self
    }

    pub fn write_report(&mut self, report: &Report) -> Result<()> {
        self.writer
            .write_record(&report.columns)
            .context("Failed to write header")?;

        for row in &report.rows {
            let record = report.columns.iter().enumerate().map(|(i, column)| {
                if i == 0 {
                    return Cow::Borrowed(row.id.as_str());
                }
                match row.cells.get(column) {
                    Some(cell) => cell.render(&self.absent_marker),
                    None => Cow::Borrowed(""),
                }
            });
            self.writer
                .write_record(record.map(|field| field.into_owned()))
                .with_context(|| format!("Failed to write row for {}", row.id))?;
        }

        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush writer")
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|err| anyhow::anyhow!("Failed to flush writer: {}", err.error()))
    }
}
