// Per-instance transforms for the paired t-test
//
// A transform maps one (cost_a, cost_b) pair to a single observation and
// supplies the value that observation takes when A and B do not differ.
// The t-test itself lives in `statistics` and is shared by every transform.

use crate::error::{CompareError, Result};
use crate::reconcile::PairedCosts;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Strategy for turning a cost pair into a tested observation
pub trait PairTransform: Send + Sync {
    /// Which transform this is
    fn kind(&self) -> TransformKind;

    /// Expected mean of the observations under "no difference"
    fn null_value(&self) -> f64;

    /// Whether the pair lies inside the transform's domain
    fn accepts(&self, cost_a: f64, cost_b: f64) -> bool;

    /// Human-readable statement of the domain, used in error messages
    fn domain_requirement(&self) -> &'static str;

    /// Map a pair to its observation (only called on accepted pairs)
    fn apply(&self, cost_a: f64, cost_b: f64) -> f64;

    /// Magnitude the rounding error of [`apply`](Self::apply) scales with
    fn noise_scale(&self, cost_a: f64, cost_b: f64) -> f64;

    /// Expression being tested, e.g. `cost_a/cost_b`
    fn expression(&self) -> &'static str;

    /// Short name for the observation, e.g. `ratio`
    fn observation_name(&self) -> &'static str;
}

/// Raw cost ratio `a / b`, null mean 1
#[derive(Debug, Clone, Copy, Default)]
pub struct RatioTransform;

impl PairTransform for RatioTransform {
    fn kind(&self) -> TransformKind {
        TransformKind::RawRatio
    }

    fn null_value(&self) -> f64 {
        1.0
    }

    fn accepts(&self, cost_a: f64, cost_b: f64) -> bool {
        cost_a >= 0.0 && cost_b > 0.0
    }

    fn domain_requirement(&self) -> &'static str {
        "total_cost values must be non-negative, and cost_b must be positive to compute ratios"
    }

    fn apply(&self, cost_a: f64, cost_b: f64) -> f64 {
        cost_a / cost_b
    }

    fn noise_scale(&self, cost_a: f64, cost_b: f64) -> f64 {
        (cost_a / cost_b).abs()
    }

    fn expression(&self) -> &'static str {
        "cost_a/cost_b"
    }

    fn observation_name(&self) -> &'static str {
        "ratio"
    }
}

/// Log cost ratio `ln a - ln b`, null mean 0
#[derive(Debug, Clone, Copy, Default)]
pub struct LogRatioTransform;

impl PairTransform for LogRatioTransform {
    fn kind(&self) -> TransformKind {
        TransformKind::LogRatio
    }

    fn null_value(&self) -> f64 {
        0.0
    }

    fn accepts(&self, cost_a: f64, cost_b: f64) -> bool {
        cost_a > 0.0 && cost_b > 0.0
    }

    fn domain_requirement(&self) -> &'static str {
        "total_cost values must be positive to compute log ratios"
    }

    fn apply(&self, cost_a: f64, cost_b: f64) -> f64 {
        cost_a.ln() - cost_b.ln()
    }

    // Each logarithm carries error relative to its own size, which can dwarf
    // the difference between them
    fn noise_scale(&self, cost_a: f64, cost_b: f64) -> f64 {
        cost_a.ln().abs() + cost_b.ln().abs()
    }

    fn expression(&self) -> &'static str {
        "log(cost_a/cost_b)"
    }

    fn observation_name(&self) -> &'static str {
        "log_ratio"
    }
}

/// Selector for the built-in transforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransformKind {
    /// Mean of cost_a/cost_b against 1
    RawRatio,
    /// Mean of log(cost_a/cost_b) against 0
    #[default]
    LogRatio,
}

impl TransformKind {
    /// The strategy implementing this transform
    pub fn transform(self) -> &'static dyn PairTransform {
        match self {
            TransformKind::RawRatio => &RatioTransform,
            TransformKind::LogRatio => &LogRatioTransform,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransformKind::RawRatio => "raw-ratio",
            TransformKind::LogRatio => "log-ratio",
        }
    }
}

/// Transformed observations, index-aligned with their instances
#[derive(Debug, Clone, PartialEq)]
pub struct PairedSample {
    pub kind: TransformKind,
    pub null_value: f64,
    pub instances: Vec<String>,
    pub values: Vec<f64>,
    /// Mean per-pair rounding-noise scale of `values`
    pub noise_scale: f64,
}

impl PairedSample {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Apply a transform to every pair, failing on the first out-of-domain cost
///
/// Finite costs can still overflow (`1e300 / 1e-10`); a non-finite
/// observation is a domain error for its instance as well.
pub fn transform_pairs(transform: &dyn PairTransform, paired: &PairedCosts) -> Result<PairedSample> {
    let mut values = Vec::with_capacity(paired.len());
    let mut noise_total = 0.0;
    for (instance, cost_a, cost_b) in paired.iter() {
        if !transform.accepts(cost_a, cost_b) {
            return Err(CompareError::Domain(format!(
                "{} (instance {:?}: cost_a={}, cost_b={})",
                transform.domain_requirement(),
                instance,
                cost_a,
                cost_b
            )));
        }
        let value = transform.apply(cost_a, cost_b);
        if !value.is_finite() {
            return Err(CompareError::Domain(format!(
                "{}={} is not finite (instance {:?}: cost_a={}, cost_b={})",
                transform.observation_name(),
                value,
                instance,
                cost_a,
                cost_b
            )));
        }
        noise_total += transform.noise_scale(cost_a, cost_b);
        values.push(value);
    }

    let noise_scale = if values.is_empty() {
        0.0
    } else {
        noise_total / values.len() as f64
    };

    Ok(PairedSample {
        kind: transform.kind(),
        null_value: transform.null_value(),
        instances: paired.instances.clone(),
        values,
        noise_scale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paired(a: &[f64], b: &[f64]) -> PairedCosts {
        PairedCosts {
            instances: (0..a.len()).map(|i| format!("inst_{:02}", i)).collect(),
            a: a.to_vec(),
            b: b.to_vec(),
        }
    }

    #[test]
    fn test_ratio_values() {
        let sample = transform_pairs(&RatioTransform, &paired(&[2.0, 3.0], &[1.0, 4.0])).unwrap();
        assert_eq!(sample.values, vec![2.0, 0.75]);
        assert_eq!(sample.null_value, 1.0);
        assert_eq!(sample.kind, TransformKind::RawRatio);
    }

    #[test]
    fn test_log_ratio_values() {
        let sample =
            transform_pairs(&LogRatioTransform, &paired(&[10.0, 12.0], &[10.0, 10.0])).unwrap();
        assert_eq!(sample.values[0], 0.0);
        assert!((sample.values[1] - 1.2f64.ln()).abs() < 1e-12);
        assert_eq!(sample.null_value, 0.0);
    }

    #[test]
    fn test_ratio_allows_zero_numerator() {
        let sample = transform_pairs(&RatioTransform, &paired(&[0.0, 1.0], &[1.0, 1.0])).unwrap();
        assert_eq!(sample.values, vec![0.0, 1.0]);
    }

    #[test]
    fn test_ratio_rejects_zero_denominator() {
        let err = transform_pairs(&RatioTransform, &paired(&[1.0, 1.0], &[1.0, 0.0])).unwrap_err();
        match err {
            CompareError::Domain(msg) => assert!(msg.contains("inst_01")),
            other => panic!("Expected Domain error, got {:?}", other),
        }
    }

    #[test]
    fn test_ratio_overflow_is_domain_error() {
        let err = transform_pairs(
            &RatioTransform,
            &paired(&[1e300, 2.0, 3.0], &[1e-10, 1.0, 1.0]),
        )
        .unwrap_err();
        match err {
            CompareError::Domain(msg) => {
                assert!(msg.contains("inst_00"));
                assert!(msg.contains("not finite"));
            }
            other => panic!("Expected Domain error, got {:?}", other),
        }
    }

    #[test]
    fn test_noise_scale_tracks_log_magnitude() {
        let sample =
            transform_pairs(&LogRatioTransform, &paired(&[1.0, 1.0], &[1.0, 1.0])).unwrap();
        assert_eq!(sample.noise_scale, 0.0);

        let b = [1000.0, 2000.0];
        let a = [b[0] * 1.000001, b[1] * 1.000001];
        let log = transform_pairs(&LogRatioTransform, &paired(&a, &b)).unwrap();
        let raw = transform_pairs(&RatioTransform, &paired(&a, &b)).unwrap();
        assert!(log.noise_scale > 10.0);
        assert!((raw.noise_scale - 1.000001).abs() < 1e-9);
    }

    #[test]
    fn test_ratio_rejects_negative_numerator() {
        assert!(matches!(
            transform_pairs(&RatioTransform, &paired(&[-1.0, 1.0], &[1.0, 1.0])),
            Err(CompareError::Domain(_))
        ));
    }

    #[test]
    fn test_log_ratio_rejects_zero_numerator() {
        assert!(matches!(
            transform_pairs(&LogRatioTransform, &paired(&[0.0, 1.0], &[1.0, 1.0])),
            Err(CompareError::Domain(_))
        ));
    }

    #[test]
    fn test_kind_selects_strategy() {
        assert_eq!(TransformKind::RawRatio.transform().null_value(), 1.0);
        assert_eq!(TransformKind::LogRatio.transform().null_value(), 0.0);
        assert_eq!(TransformKind::default(), TransformKind::LogRatio);
        assert_eq!(TransformKind::RawRatio.as_str(), "raw-ratio");
    }
}
