// Decision assessment for paired cost comparisons
//
// Combines a transform (what is tested) with the shared one-sample t-test
// (how it is tested) and turns the p-value into a decision.

use crate::error::Result;
use crate::reconcile::PairedCosts;
use crate::ttest::statistics::{one_sample_ttest_scaled, validate_alpha};
use crate::ttest::transform::{transform_pairs, PairTransform, TransformKind};
use serde::Serialize;

/// Outcome of the hypothesis test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// p < alpha: the algorithms differ on average
    Reject,

    /// p >= alpha: no evidence of an average difference
    FailToReject,

    /// p-value undefined (zero variance); never counts as a reject
    Indeterminate,
}

impl Decision {
    fn from_pvalue(pvalue: f64, alpha: f64) -> Self {
        if !pvalue.is_finite() {
            Decision::Indeterminate
        } else if pvalue < alpha {
            Decision::Reject
        } else {
            Decision::FailToReject
        }
    }

    pub fn rejects(self) -> bool {
        self == Decision::Reject
    }
}

/// Geometric-mean ratio and its interval, `exp` of the log-scale results
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeometricRatio {
    pub mean: f64,
    pub ci_low: f64,
    pub ci_high: f64,
}

/// Full result of one paired comparison
///
/// All values are kept at full precision; rounding happens only when a
/// report renders them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    pub transform: TransformKind,
    pub null_value: f64,
    pub n: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub df: usize,
    pub std_error: f64,
    pub statistic: f64,
    pub pvalue: f64,
    pub alpha: f64,
    pub critical_value: f64,
    pub ci_low: f64,
    pub ci_high: f64,
    pub decision: Decision,

    /// Present for log-ratio tests only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometric_ratio: Option<GeometricRatio>,
}

impl TestResult {
    pub fn rejects(&self) -> bool {
        self.decision.rejects()
    }

    pub fn confidence_level(&self) -> f64 {
        1.0 - self.alpha
    }

    /// Mean on the natural ratio scale (raw mean, or geometric mean for logs)
    pub fn ratio_mean(&self) -> f64 {
        match self.geometric_ratio {
            Some(g) => g.mean,
            None => self.mean,
        }
    }

    /// Confidence interval on the natural ratio scale
    pub fn ratio_interval(&self) -> (f64, f64) {
        match self.geometric_ratio {
            Some(g) => (g.ci_low, g.ci_high),
            None => (self.ci_low, self.ci_high),
        }
    }
}

/// Run the paired t-test of `transform` over aligned costs
///
/// Alpha is validated before the data is looked at, then every pair is
/// checked against the transform's domain.
///
/// # Example
/// ```
/// use schedcmp::reconcile::PairedCosts;
/// use schedcmp::ttest::{paired_ttest, Decision, TransformKind};
///
/// let paired = PairedCosts {
///     instances: vec!["a".into(), "b".into(), "c".into()],
///     a: vec![2.0, 4.0, 8.0],
///     b: vec![1.0, 2.0, 4.0],
/// };
/// let result = paired_ttest(&paired, TransformKind::RawRatio.transform(), 0.05).unwrap();
/// assert_eq!(result.mean, 2.0);
/// assert_eq!(result.decision, Decision::Indeterminate);
/// ```
pub fn paired_ttest(
    paired: &PairedCosts,
    transform: &dyn PairTransform,
    alpha: f64,
) -> Result<TestResult> {
    validate_alpha(alpha)?;

    let sample = transform_pairs(transform, paired)?;
    let test = one_sample_ttest_scaled(
        &sample.values,
        sample.null_value,
        alpha,
        sample.noise_scale,
    )?;
    let decision = Decision::from_pvalue(test.pvalue, alpha);

    let geometric_ratio = match sample.kind {
        TransformKind::LogRatio => Some(GeometricRatio {
            mean: test.mean.exp(),
            ci_low: test.ci_low.exp(),
            ci_high: test.ci_high.exp(),
        }),
        TransformKind::RawRatio => None,
    };

    tracing::debug!(
        transform = sample.kind.as_str(),
        n = test.n,
        statistic = test.statistic,
        pvalue = test.pvalue,
        ?decision,
        "paired t-test complete"
    );

    Ok(TestResult {
        transform: sample.kind,
        null_value: sample.null_value,
        n: test.n,
        mean: test.mean,
        std_dev: test.std_dev,
        df: test.df,
        std_error: test.std_error,
        statistic: test.statistic,
        pvalue: test.pvalue,
        alpha,
        critical_value: test.critical_value,
        ci_low: test.ci_low,
        ci_high: test.ci_high,
        decision,
        geometric_ratio,
    })
}
