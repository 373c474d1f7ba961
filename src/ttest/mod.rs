// Paired t-tests on per-instance cost transforms
//
// Two algorithms run on the same instances give paired observations. Each
// pair is mapped to a single number (the cost ratio, or its logarithm) and a
// one-sample, two-sided t-test asks whether the mean of those numbers differs
// from its "no difference" value (1 for ratios, 0 for log ratios).
//
// Layout:
// - transform: the per-pair mapping strategies and their domains
// - statistics: the one t-test implementation shared by every transform
// - verdict: decision rule and the final TestResult
// - config: significance level, duplicate policy, transform selection

mod config;
mod statistics;
mod transform;
mod verdict;

pub use config::CompareConfig;
pub use statistics::{
    mean, median, one_sample_ttest, one_sample_ttest_scaled, sample_std_dev, validate_alpha,
    OneSampleTTest, DEGENERATE_SPREAD,
};
pub use transform::{
    transform_pairs, LogRatioTransform, PairTransform, PairedSample, RatioTransform,
    TransformKind,
};
pub use verdict::{paired_ttest, Decision, GeometricRatio, TestResult};
