//! Identifier list input
//!
//! Reads identifiers from a CSV file with a header row. Problems with the
//! input are logged and produce an empty list; an empty list simply means
//! there is nothing to fetch.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, error, warn};

// Resolver prefixes people paste in front of bare DOIs
static DOI_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:https?://(?:dx\.)?doi\.org/|doi:\s*)").unwrap()
});

/// Strip resolver URL or `doi:` prefixes and surrounding whitespace
pub fn normalize_identifier(raw: &str) -> String {
    DOI_PREFIX_REGEX.replace(raw.trim(), "").trim().to_string()
}

/// Read identifiers from the `column` column of the CSV file at `path`
pub fn read_identifiers<P: AsRef<Path>>(path: P, column: &str) -> Vec<String> {
    let path = path.as_ref();
    match File::open(path) {
        Ok(file) => read_identifiers_from(file, column),
        Err(err) => {
            error!(path = %path.display(), error = %err, "cannot open identifier file");
            Vec::new()
        }
    }
}

/// Read identifiers from any CSV source
///
/// Empty values are skipped and repeated identifiers are kept once, at
/// their first position.
pub fn read_identifiers_from<R: Read>(reader: R, column: &str) -> Vec<String> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let index = match reader.headers() {
        Ok(headers) => headers.iter().position(|h| h.trim() == column),
        Err(err) => {
            error!(error = %err, "cannot read identifier file header");
            return Vec::new();
        }
    };
    let Some(index) = index else {
        error!(column, "identifier file has no such column");
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut ids = Vec::new();

    for (line, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                error!(error = %err, "malformed identifier file");
                return Vec::new();
            }
        };

        let id = normalize_identifier(record.get(index).unwrap_or(""));
        if id.is_empty() {
            continue;
        }
        if !seen.insert(id.clone()) {
            debug!(id = %id, line = line + 2, "duplicate identifier ignored");
            continue;
        }
        ids.push(id);
    }

    if ids.is_empty() {
        warn!(column, "no identifiers found");
    }
    ids
}
