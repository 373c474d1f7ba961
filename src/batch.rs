//! Batch comparisons of many candidates against one baseline
//!
//! Comparisons are independent, so they run on a small pool of scoped worker
//! threads. The summary CSV is the only shared resource: workers never touch
//! it. Finished rows travel over a channel to one writer thread, which puts
//! them in candidate order and writes the file in one go once every worker
//! is done, so the file is identical from run to run and never half written.
//!
//! ```text
//! jobs ──► worker 0 ─┐
//!      ──► worker 1 ─┼──► (index, row) ──► writer ──► summary.csv
//!      ──► worker N ─┘
//! ```

use crate::compare::{compare_with_baseline, Comparison};
use crate::error::Result;
use crate::loader::load_result_set;
use crate::names::{DatasetRef, SchedulerNames};
use crate::report::{write_summary_csv, SummaryRecord};
use crate::ttest::CompareConfig;
use crossbeam::channel::{self, Receiver};
use std::collections::BTreeMap;
use std::path::Path;

/// Outcome of one candidate in a batch
#[derive(Debug)]
pub struct BatchEntry {
    pub candidate: DatasetRef,
    pub outcome: Result<Comparison>,
}

/// All outcomes of a batch, in candidate order
#[derive(Debug)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
    /// Rows written to the summary sink (0 without a sink)
    pub rows_written: usize,
}

impl BatchReport {
    pub fn failures(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_err()).count()
    }
}

/// Compare every candidate against `baseline`
///
/// The baseline is loaded once and shared read-only. A failing candidate is
/// reported in its entry and contributes no row; it does not stop the batch.
/// Failing to load the baseline or to write the sink fails the whole batch.
pub fn run_batch(
    candidates: &[DatasetRef],
    baseline: &DatasetRef,
    config: &CompareConfig,
    names: &dyn SchedulerNames,
    sink: Option<&Path>,
) -> Result<BatchReport> {
    config.validate()?;
    let baseline_set = load_result_set(&baseline.path, config.duplicate_policy)?;

    let workers = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(candidates.len())
        .max(1);

    let (job_tx, job_rx) = channel::unbounded::<usize>();
    for idx in 0..candidates.len() {
        // Receiver is alive, cannot fail
        let _ = job_tx.send(idx);
    }
    drop(job_tx);

    let (row_tx, row_rx) = channel::unbounded::<(usize, Option<SummaryRecord>)>();

    let (mut finished, rows_written) = std::thread::scope(|scope| {
        let writer = sink.map(|path| scope.spawn(move || write_rows_in_order(row_rx, path)));

        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let job_rx = job_rx.clone();
                let row_tx = row_tx.clone();
                let baseline_set = &baseline_set;
                scope.spawn(move || {
                    let mut done = Vec::new();
                    for idx in job_rx.iter() {
                        let candidate = &candidates[idx];
                        let outcome = load_result_set(&candidate.path, config.duplicate_policy)
                            .and_then(|set| {
                                compare_with_baseline(
                                    candidate,
                                    &set,
                                    baseline,
                                    baseline_set,
                                    config,
                                )
                            });
                        if let Err(e) = &outcome {
                            tracing::warn!("Failed to compare {}: {}", candidate.label, e);
                        }
                        let record = outcome
                            .as_ref()
                            .ok()
                            .map(|c| SummaryRecord::from_comparison(c, names));
                        // A closed channel only means there is no sink
                        let _ = row_tx.send((idx, record));
                        done.push((idx, outcome));
                    }
                    done
                })
            })
            .collect();
        drop(row_tx);

        let mut finished = Vec::with_capacity(candidates.len());
        for handle in handles {
            match handle.join() {
                Ok(done) => finished.extend(done),
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }

        let rows_written = match writer {
            Some(handle) => match handle.join() {
                Ok(written) => written,
                Err(panic) => std::panic::resume_unwind(panic),
            },
            None => Ok(0),
        };

        (finished, rows_written)
    });

    let rows_written = rows_written?;
    finished.sort_by_key(|(idx, _)| *idx);
    let entries = finished
        .into_iter()
        .map(|(idx, outcome)| BatchEntry {
            candidate: candidates[idx].clone(),
            outcome,
        })
        .collect();

    Ok(BatchReport {
        entries,
        rows_written,
    })
}

/// Single writer: orders rows by candidate index and owns the sink
///
/// The file is only written once all rows are in, and only when at least one
/// comparison succeeded, so a batch in which every comparison fails leaves no
/// output behind.
fn write_rows_in_order(rx: Receiver<(usize, Option<SummaryRecord>)>, path: &Path) -> Result<usize> {
    let pending: BTreeMap<usize, Option<SummaryRecord>> = rx.into_iter().collect();
    let rows: Vec<SummaryRecord> = pending.into_values().flatten().collect();

    if rows.is_empty() {
        tracing::debug!(path = %path.display(), "no successful comparisons, summary not written");
        return Ok(0);
    }

    write_summary_csv(path, &rows)?;
    Ok(rows.len())
}
