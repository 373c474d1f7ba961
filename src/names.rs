//! Scheduler names and the results-directory convention
//!
//! Each evaluated algorithm writes `eval_<canonical>.csv` into one results
//! directory. Users refer to algorithms by loose aliases (`FF`, `first-fit`),
//! so names are canonicalized before the file is located.

use crate::error::{CompareError, Result};
use std::path::{Path, PathBuf};

/// Prefix of every per-algorithm results file
pub const RESULTS_PREFIX: &str = "eval_";

/// Default results directory
pub const DEFAULT_RESULTS_DIR: &str = "eval_results";

/// Maps user-facing scheduler names to canonical identifiers
pub trait SchedulerNames: Send + Sync {
    /// Canonical identifier for a user-supplied name
    fn canonicalize(&self, name: &str) -> String;

    /// Label shown in reports for a canonical identifier
    fn display_name(&self, canonical: &str) -> String {
        canonical.to_string()
    }

    /// Results file name for a scheduler
    fn output_filename(&self, name: &str) -> String {
        format!("{}{}.csv", RESULTS_PREFIX, self.canonicalize(name))
    }
}

/// Built-in canonicalizer: normalized spelling plus a short alias table
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalNames;

const ALIASES: &[(&str, &str)] = &[
    ("ff", "first_fit"),
    ("ffd", "first_fit_decreasing"),
    ("bf", "best_fit"),
    ("bfd", "best_fit_decreasing"),
    ("nf", "next_fit"),
    ("wf", "worst_fit"),
    ("lpt", "longest_processing_time"),
    ("spt", "shortest_processing_time"),
    ("rr", "round_robin"),
    ("sa", "simulated_annealing"),
    ("rand", "random"),
];

impl SchedulerNames for CanonicalNames {
    fn canonicalize(&self, name: &str) -> String {
        let mut out = String::with_capacity(name.len());
        for c in name.trim().chars() {
            let c = match c {
                '-' | ' ' | '.' => '_',
                other => other.to_ascii_lowercase(),
            };
            if c == '_' && (out.is_empty() || out.ends_with('_')) {
                continue;
            }
            out.push(c);
        }
        while out.ends_with('_') {
            out.pop();
        }

        ALIASES
            .iter()
            .find(|(alias, _)| *alias == out)
            .map(|(_, canonical)| canonical.to_string())
            .unwrap_or(out)
    }
}

/// Split a comma-separated scheduler list, dropping empty entries
pub fn parse_scheduler_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// A labelled results file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRef {
    pub label: String,
    pub path: PathBuf,
}

/// Locate the results file for a scheduler inside `results_dir`
pub fn resolve_algorithm(
    results_dir: &Path,
    name: &str,
    names: &dyn SchedulerNames,
) -> DatasetRef {
    let label = names.canonicalize(name);
    let path = results_dir.join(names.output_filename(&label));
    DatasetRef { label, path }
}

/// Label two directly supplied CSV paths
///
/// Both files must live in the same directory. Labels are the file stems with
/// the `eval_` prefix removed.
pub fn resolve_csv_pair(path_a: &Path, path_b: &Path) -> Result<(DatasetRef, DatasetRef)> {
    let abs_a = absolute(path_a)?;
    let abs_b = absolute(path_b)?;

    if abs_a.parent() != abs_b.parent() {
        return Err(CompareError::Parameter(format!(
            "Both CSV paths must be in the same directory ({} vs {})",
            path_a.display(),
            path_b.display()
        )));
    }

    Ok((
        DatasetRef {
            label: label_from_path(&abs_a),
            path: abs_a,
        },
        DatasetRef {
            label: label_from_path(&abs_b),
            path: abs_b,
        },
    ))
}

/// File stem with the results prefix removed
pub fn label_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    stem.strip_prefix(RESULTS_PREFIX)
        .map(str::to_string)
        .unwrap_or(stem)
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|e| CompareError::io(path, e))
}
