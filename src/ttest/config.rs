// Configuration for paired cost comparisons
//
// Passed explicitly through every call; nothing here is global state.

use crate::error::Result;
use crate::loader::DuplicatePolicy;
use crate::ttest::statistics::validate_alpha;
use crate::ttest::transform::TransformKind;
use serde::{Deserialize, Serialize};

/// Configuration for a paired comparison
///
/// # Example
/// ```
/// use schedcmp::ttest::CompareConfig;
///
/// let config = CompareConfig::default();
/// assert_eq!(config.significance_level, 0.05); // 95% confidence
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareConfig {
    /// Significance level (alpha), strictly inside (0, 1)
    ///
    /// - 0.05 (default): 95% confidence interval
    /// - 0.01: stricter, fewer false rejects
    /// - 0.10: looser, catches smaller differences earlier
    pub significance_level: f64,

    /// What to do when an instance appears twice in one table
    ///
    /// Default: keep the minimum cost, matching how re-run instances are
    /// usually interpreted (best run counts).
    pub duplicate_policy: DuplicatePolicy,

    /// Which per-instance quantity is tested
    ///
    /// Default: log ratio. Ratios of costs are skewed; the log ratio is
    /// symmetric in A and B.
    pub transform: TransformKind,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            significance_level: 0.05,
            duplicate_policy: DuplicatePolicy::Min,
            transform: TransformKind::LogRatio,
        }
    }
}

impl CompareConfig {
    /// 99% confidence, duplicates rejected
    pub fn strict() -> Self {
        Self {
            significance_level: 0.01,
            duplicate_policy: DuplicatePolicy::Error,
            ..Self::default()
        }
    }

    /// 90% confidence
    pub fn permissive() -> Self {
        Self {
            significance_level: 0.10,
            ..Self::default()
        }
    }

    pub fn with_transform(mut self, transform: TransformKind) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_significance_level(mut self, alpha: f64) -> Self {
        self.significance_level = alpha;
        self
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        validate_alpha(self.significance_level)
    }
}
