//! schedcmp - paired statistical comparison of scheduling algorithms
//!
//! Given two per-instance results tables (one per algorithm, evaluated on the
//! same problem instances), this library aligns the costs instance by
//! instance and runs a two-sided paired t-test on the cost ratio or log cost
//! ratio, with a confidence interval on the mean.
//!
//! Pipeline: [`loader`] -> [`reconcile`] -> [`ttest`] -> [`report`].

pub mod batch;
pub mod cli;
pub mod compare;
pub mod differences;
pub mod error;
pub mod loader;
pub mod names;
pub mod reconcile;
pub mod report;
pub mod ttest;
