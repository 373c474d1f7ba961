//! Summary of paired cost differences `d_i = cost_a_i - cost_b_i`
//!
//! A quick descriptive view to read next to the t-test: how large the
//! per-instance differences are and how often A beats B.

use crate::reconcile::PairedCosts;
use crate::report::format_significant;
use crate::ttest::{mean, median, sample_std_dev};
use serde::Serialize;
use std::fmt;

/// Descriptive statistics of paired differences
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DifferenceSummary {
    pub n: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation, 0 for fewer than two pairs
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// Share of instances where A was cheaper than B
    pub fraction_negative: f64,
}

impl DifferenceSummary {
    /// Summarize `a - b` over aligned costs; `None` when there are no pairs
    pub fn from_paired(paired: &PairedCosts) -> Option<Self> {
        let differences: Vec<f64> = paired.iter().map(|(_, a, b)| a - b).collect();
        Self::from_differences(&differences)
    }

    pub fn from_differences(differences: &[f64]) -> Option<Self> {
        if differences.is_empty() {
            return None;
        }

        let n = differences.len();
        let negative = differences.iter().filter(|d| **d < 0.0).count();

        Some(Self {
            n,
            mean: mean(differences),
            median: median(differences),
            std_dev: sample_std_dev(differences),
            min: differences.iter().copied().fold(f64::INFINITY, f64::min),
            max: differences.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            fraction_negative: negative as f64 / n as f64,
        })
    }
}

impl fmt::Display for DifferenceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "N={}, mean={}, median={}, std={}, min={}, max={}, frac(d<0)={:.3}",
            self.n,
            format_significant(self.mean, 6),
            format_significant(self.median, 6),
            format_significant(self.std_dev, 6),
            format_significant(self.min, 6),
            format_significant(self.max, 6),
            self.fraction_negative
        )
    }
}
