//! End-to-end comparison of two results files
//!
//! load -> reconcile -> transform -> t-test. Every step fails fast; a
//! comparison either produces a complete [`Comparison`] or an error.

use crate::error::Result;
use crate::loader::{load_result_set, ResultSet};
use crate::names::DatasetRef;
use crate::reconcile::{reconcile, PairedCosts};
use crate::ttest::{paired_ttest, CompareConfig, TestResult};

/// A finished comparison of algorithm A against algorithm B
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub a: DatasetRef,
    pub b: DatasetRef,
    pub paired: PairedCosts,
    pub result: TestResult,
}

/// Reconcile two loaded result sets and run the configured test
pub fn compare_result_sets(
    a: &ResultSet,
    b: &ResultSet,
    label_a: &str,
    label_b: &str,
    config: &CompareConfig,
) -> Result<(PairedCosts, TestResult)> {
    config.validate()?;
    let paired = reconcile(a, b, label_a, label_b)?;
    let result = paired_ttest(&paired, config.transform.transform(), config.significance_level)?;
    Ok((paired, result))
}

/// Load both results files and compare them
pub fn compare_datasets(
    a: &DatasetRef,
    b: &DatasetRef,
    config: &CompareConfig,
) -> Result<Comparison> {
    config.validate()?;
    let set_a = load_result_set(&a.path, config.duplicate_policy)?;
    let set_b = load_result_set(&b.path, config.duplicate_policy)?;
    compare_with_baseline(a, &set_a, b, &set_b, config)
}

/// Compare against an already-loaded baseline result set
pub(crate) fn compare_with_baseline(
    a: &DatasetRef,
    set_a: &ResultSet,
    b: &DatasetRef,
    set_b: &ResultSet,
    config: &CompareConfig,
) -> Result<Comparison> {
    let (paired, result) = compare_result_sets(set_a, set_b, &a.label, &b.label, config)?;
    Ok(Comparison {
        a: a.clone(),
        b: b.clone(),
        paired,
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompareError;
    use crate::ttest::{Decision, TransformKind};
    use std::path::Path;

    fn write(dir: &Path, name: &str, body: &str) -> DatasetRef {
        let path = dir.join(format!("eval_{}.csv", name));
        std::fs::write(&path, body).unwrap();
        DatasetRef {
            label: name.to_string(),
            path,
        }
    }

    #[test]
    fn test_compare_datasets_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(
            dir.path(),
            "greedy",
            "filename,total_cost\ni1,10\ni2,12\ni3,9\ni4,11\n",
        );
        let b = write(
            dir.path(),
            "baseline",
            "filename,total_cost\ni4,10\ni3,10\ni2,10\ni1,10\n",
        );

        let c = compare_datasets(&a, &b, &CompareConfig::default()).unwrap();
        assert_eq!(c.paired.instances, vec!["i1", "i2", "i3", "i4"]);
        assert_eq!(c.result.transform, TransformKind::LogRatio);
        assert_eq!(c.result.decision, Decision::FailToReject);
        assert_eq!(c.a.label, "greedy");
    }

    #[test]
    fn test_invalid_alpha_before_io() {
        let missing = DatasetRef {
            label: "missing".to_string(),
            path: "/nonexistent/eval_missing.csv".into(),
        };
        let config = CompareConfig::default().with_significance_level(0.0);
        assert!(matches!(
            compare_datasets(&missing, &missing, &config),
            Err(CompareError::Parameter(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a", "filename,total_cost\nx,1\ny,2\n");
        let b = DatasetRef {
            label: "b".to_string(),
            path: dir.path().join("eval_b.csv"),
        };
        assert!(matches!(
            compare_datasets(&a, &b, &CompareConfig::default()),
            Err(CompareError::Io { .. })
        ));
    }
}
