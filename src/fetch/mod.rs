//! Concurrent record retrieval
//!
//! Records are fetched on a bounded worker pool and handed back to the
//! caller as they complete. Completion order is arbitrary, so every outcome
//! carries the identifier it belongs to.

pub mod client;

pub use client::{CatalogClient, DEFAULT_BASE_URL};

use crate::error::FetchError;
use crate::report::RecordOutcome;
use anyhow::{Context, Result};
use serde_json::Value;
use std::sync::mpsc;
use std::thread;
use tracing::debug;

/// Anything that can look up a record by identifier
pub trait RecordSource: Sync {
    fn fetch(&self, id: &str) -> Result<Value, FetchError>;
}

/// Outcome for one requested identifier
#[derive(Debug)]
pub struct FetchedRecord {
    pub id: String,
    pub outcome: RecordOutcome,
}

/// Fetch every identifier on `workers` threads
///
/// `on_record` runs on the calling thread, once per identifier, in
/// completion order. A failed fetch is delivered as
/// [`RecordOutcome::Failed`] and does not affect the others.
pub fn fetch_each<S, F>(source: &S, ids: &[String], workers: usize, mut on_record: F) -> Result<()>
where
    S: RecordSource,
    F: FnMut(FetchedRecord),
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .thread_name(|i| format!("fetch-{i}"))
        .build()
        .context("Failed to start fetch workers")?;
    let pool = &pool;

    let (tx, rx) = mpsc::channel();

    thread::scope(|scope| {
        scope.spawn(move || {
            pool.scope(|s| {
                for id in ids {
                    let tx = tx.clone();
                    s.spawn(move |_| {
                        let outcome = RecordOutcome::from(source.fetch(id));
                        // the receiver lives until every sender is gone
                        let _ = tx.send(FetchedRecord {
                            id: id.clone(),
                            outcome,
                        });
                    });
                }
            });
        });

        let mut delivered = 0usize;
        for record in rx {
            delivered += 1;
            debug!(id = %record.id, delivered, total = ids.len(), "record completed");
            on_record(record);
        }
    });

    Ok(())
}

/// Fetch everything and collect the outcomes, in completion order
pub fn fetch_all<S: RecordSource>(source: &S, ids: &[String], workers: usize) -> Result<Vec<FetchedRecord>> {
    let mut records = Vec::with_capacity(ids.len());
    fetch_each(source, ids, workers, |record| records.push(record))?;
    Ok(records)
}
