//! Pair reconciliation: align two result sets instance by instance
//!
//! Unmatched instances are always an error. Filtering them out would bias the
//! comparison toward instances where both algorithms produced a result.

use crate::error::{CompareError, Result};
use crate::loader::ResultSet;

/// Costs of two algorithms aligned by instance
///
/// Position `i` of `a` and `b` refers to `instances[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PairedCosts {
    pub instances: Vec<String>,
    pub a: Vec<f64>,
    pub b: Vec<f64>,
}

impl PairedCosts {
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Iterate `(instance, cost_a, cost_b)` triples
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64, f64)> {
        self.instances
            .iter()
            .zip(self.a.iter().zip(self.b.iter()))
            .map(|(name, (a, b))| (name.as_str(), *a, *b))
    }
}

/// Return the sorted instance identifiers shared by both result sets
///
/// Fails with [`CompareError::Mismatch`] unless the identifier sets are
/// identical. The error carries only counts so its size stays bounded no
/// matter how large the inputs are.
pub fn matching_instances(
    a: &ResultSet,
    b: &ResultSet,
    label_a: &str,
    label_b: &str,
) -> Result<Vec<String>> {
    let missing_in_b = a.instances().filter(|name| !b.contains(name)).count();
    let missing_in_a = b.instances().filter(|name| !a.contains(name)).count();

    if missing_in_a > 0 || missing_in_b > 0 {
        return Err(CompareError::Mismatch {
            label_a: label_a.to_string(),
            label_b: label_b.to_string(),
            missing_in_a,
            missing_in_b,
        });
    }

    // BTreeMap iteration is already lexicographic
    Ok(a.instances().map(str::to_string).collect())
}

/// Align two result sets into index-matched cost vectors
pub fn reconcile(
    a: &ResultSet,
    b: &ResultSet,
    label_a: &str,
    label_b: &str,
) -> Result<PairedCosts> {
    let instances = matching_instances(a, b, label_a, label_b)?;

    let mut costs_a = Vec::with_capacity(instances.len());
    let mut costs_b = Vec::with_capacity(instances.len());
    for name in &instances {
        // Both lookups succeed: the identifier sets were just checked equal
        if let (Some(ca), Some(cb)) = (a.get(name), b.get(name)) {
            costs_a.push(ca);
            costs_b.push(cb);
        }
    }

    tracing::debug!(
        label_a,
        label_b,
        instances = instances.len(),
        "reconciled result sets"
    );

    Ok(PairedCosts {
        instances,
        a: costs_a,
        b: costs_b,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{parse_result_set, DuplicatePolicy};

    fn set(rows: &[(&str, f64)]) -> ResultSet {
        let mut text = String::from("filename,total_cost\n");
        for (name, cost) in rows {
            text.push_str(&format!("{},{}\n", name, cost));
        }
        parse_result_set(&text, "test", DuplicatePolicy::Error).unwrap()
    }

    #[test]
    fn test_matching_sets_sorted() {
        let a = set(&[("c", 3.0), ("a", 1.0), ("b", 2.0)]);
        let b = set(&[("b", 20.0), ("c", 30.0), ("a", 10.0)]);

        let paired = reconcile(&a, &b, "A", "B").unwrap();
        assert_eq!(paired.instances, vec!["a", "b", "c"]);
        assert_eq!(paired.a, vec![1.0, 2.0, 3.0]);
        assert_eq!(paired.b, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_mismatch_counts_each_side() {
        let a = set(&[("x", 1.0), ("y", 2.0)]);
        let b = set(&[("x", 1.0), ("z", 2.0)]);

        match reconcile(&a, &b, "A", "B").unwrap_err() {
            CompareError::Mismatch {
                missing_in_a,
                missing_in_b,
                ..
            } => {
                assert_eq!(missing_in_a, 1);
                assert_eq!(missing_in_b, 1);
            }
            other => panic!("Expected Mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_subset_is_still_mismatch() {
        let a = set(&[("x", 1.0), ("y", 2.0), ("w", 4.0)]);
        let b = set(&[("x", 1.0)]);

        match matching_instances(&a, &b, "A", "B").unwrap_err() {
            CompareError::Mismatch {
                missing_in_a,
                missing_in_b,
                ..
            } => {
                assert_eq!(missing_in_a, 0);
                assert_eq!(missing_in_b, 2);
            }
            other => panic!("Expected Mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_mismatch_message_has_no_identifiers() {
        let a = set(&[("secret_instance_1", 1.0)]);
        let b = set(&[("secret_instance_2", 1.0)]);

        let msg = reconcile(&a, &b, "A", "B").unwrap_err().to_string();
        assert!(!msg.contains("secret_instance"));
    }

    #[test]
    fn test_iter_triples() {
        let a = set(&[("p", 4.0), ("q", 6.0)]);
        let b = set(&[("p", 2.0), ("q", 3.0)]);
        let paired = reconcile(&a, &b, "A", "B").unwrap();

        let triples: Vec<_> = paired.iter().collect();
        assert_eq!(triples, vec![("p", 4.0, 2.0), ("q", 6.0, 3.0)]);
    }
}
