// One-sample t-test and descriptive statistics
//
// Student's t CDF and quantile come from statrs. Everything is f64 end to
// end: p-values near the decision boundary must not lose precision.
//
// Zero-variance samples have no defined t-statistic. They are reported with
// NaN statistic and p-value rather than being coerced to 0 or 1.

use crate::error::{CompareError, Result};
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};
use statrs::statistics::{Data, Median, Statistics};

/// Spread at or below this multiple of the noise scale counts as zero.
///
/// Transforms like `ln(2a) - ln(a)` differ from each other only by rounding
/// error; without this the t-statistic would explode and force a reject.
pub const DEGENERATE_SPREAD: f64 = 1e-12;

/// Raw output of a one-sample, two-sided t-test
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OneSampleTTest {
    /// Sample size
    pub n: usize,

    /// Sample mean
    pub mean: f64,

    /// Sample standard deviation (divisor n-1)
    pub std_dev: f64,

    /// Degrees of freedom (n-1)
    pub df: usize,

    /// Standard error of the mean, `std_dev / sqrt(n)`
    pub std_error: f64,

    /// t-statistic, NaN when the sample has no spread
    pub statistic: f64,

    /// Two-sided p-value, NaN when the statistic is undefined
    pub pvalue: f64,

    /// Critical value `t*` at `1 - alpha/2`
    pub critical_value: f64,

    /// Lower confidence bound on the mean
    pub ci_low: f64,

    /// Upper confidence bound on the mean
    pub ci_high: f64,
}

/// Check that a significance level lies strictly inside (0, 1)
pub fn validate_alpha(alpha: f64) -> Result<()> {
    if alpha > 0.0 && alpha < 1.0 {
        Ok(())
    } else {
        Err(CompareError::Parameter(format!(
            "alpha must be between 0 and 1 (exclusive), got {}",
            alpha
        )))
    }
}

/// Two-sided one-sample t-test of `mean(values) == null_value`
///
/// # Example
/// ```
/// use schedcmp::ttest::one_sample_ttest;
///
/// let test = one_sample_ttest(&[1.1, 0.9, 1.3, 1.2], 1.0, 0.05).unwrap();
/// assert_eq!(test.df, 3);
/// assert!(test.ci_low < test.mean && test.mean < test.ci_high);
/// ```
pub fn one_sample_ttest(values: &[f64], null_value: f64, alpha: f64) -> Result<OneSampleTTest> {
    let noise_scale = values.iter().map(|v| v.abs()).mean();
    one_sample_ttest_scaled(values, null_value, alpha, noise_scale)
}

/// One-sample t-test with an explicit rounding-noise scale
///
/// `noise_scale` is the magnitude the observations' rounding error is
/// proportional to. A sample whose standard deviation is at most
/// [`DEGENERATE_SPREAD`] times that scale is treated as constant.
pub fn one_sample_ttest_scaled(
    values: &[f64],
    null_value: f64,
    alpha: f64,
    noise_scale: f64,
) -> Result<OneSampleTTest> {
    validate_alpha(alpha)?;

    let n = values.len();
    if n < 2 {
        return Err(CompareError::Parameter(format!(
            "Need at least two paired instances for a t-test, got {}",
            n
        )));
    }

    let m = mean(values);
    let s = sample_std_dev(values);
    if !m.is_finite() || !s.is_finite() {
        return Err(CompareError::Domain(format!(
            "sample mean ({}) and standard deviation ({}) must be finite",
            m, s
        )));
    }
    let df = n - 1;
    let se = s / (n as f64).sqrt();

    let dist = StudentsT::new(0.0, 1.0, df as f64)
        .map_err(|e| CompareError::Parameter(format!("invalid t distribution: {}", e)))?;

    let degenerate = s == 0.0 || s <= DEGENERATE_SPREAD * noise_scale;
    let raw_statistic = (m - null_value) / se;
    let (statistic, pvalue) = if degenerate || !raw_statistic.is_finite() {
        tracing::debug!(n, mean = m, std_dev = s, noise_scale, "zero-variance sample, t undefined");
        (f64::NAN, f64::NAN)
    } else {
        let p = (2.0 * dist.cdf(-raw_statistic.abs())).min(1.0);
        (raw_statistic, p)
    };

    let critical_value = dist.inverse_cdf(1.0 - alpha / 2.0);
    let margin = critical_value * se;

    Ok(OneSampleTTest {
        n,
        mean: m,
        std_dev: s,
        df,
        std_error: se,
        statistic,
        pvalue,
        critical_value,
        ci_low: m - margin,
        ci_high: m + margin,
    })
}

/// Arithmetic mean (NaN for an empty slice)
pub fn mean(values: &[f64]) -> f64 {
    values.mean()
}

/// Sample standard deviation with Bessel's correction
///
/// Returns 0.0 for fewer than two values.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    values.std_dev()
}

/// Median (mean of the two middle values for even lengths, NaN when empty)
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    Data::new(values.to_vec()).median()
}
