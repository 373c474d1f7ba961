//! Result loader for per-algorithm evaluation tables
//!
//! Reads the `eval_<algorithm>.csv` tables produced by the evaluation harness.
//! Only two columns matter: `filename` (the instance identifier) and
//! `total_cost`. Any other columns are ignored.

use crate::error::{CompareError, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Column holding the instance identifier
pub const INSTANCE_COLUMN: &str = "filename";

/// Column holding the per-instance cost
pub const COST_COLUMN: &str = "total_cost";

/// How to treat an instance that appears on more than one row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Keep the smallest cost seen for the instance
    #[default]
    Min,
    /// Reject the table on the second occurrence
    Error,
}

/// Costs of one algorithm keyed by instance identifier
///
/// Keys are kept in a `BTreeMap` so iteration is lexicographic and every
/// downstream consumer sees the same order on every run.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    origin: String,
    costs: BTreeMap<String, f64>,
}

impl ResultSet {
    /// Where the records came from (file path or caller-supplied name)
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    pub fn get(&self, instance: &str) -> Option<f64> {
        self.costs.get(instance).copied()
    }

    pub fn contains(&self, instance: &str) -> bool {
        self.costs.contains_key(instance)
    }

    /// Instance identifiers in lexicographic order
    pub fn instances(&self) -> impl Iterator<Item = &str> {
        self.costs.keys().map(String::as_str)
    }

    /// (instance, cost) pairs in lexicographic order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.costs.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Load a result set from a CSV file on disk
pub fn load_result_set(path: &Path, policy: DuplicatePolicy) -> Result<ResultSet> {
    let text = std::fs::read_to_string(path).map_err(|e| CompareError::io(path, e))?;
    parse_result_set(&text, &path.display().to_string(), policy)
}

/// Parse a result set from CSV text
///
/// `origin` only feeds error messages and diagnostics.
pub fn parse_result_set(text: &str, origin: &str, policy: DuplicatePolicy) -> Result<ResultSet> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let Some((_, header_line)) = lines.next() else {
        return Err(schema_error(origin, "missing header row"));
    };

    let header = split_csv_line(header_line.trim_start_matches('\u{feff}'));
    let instance_idx = column_index(&header, INSTANCE_COLUMN)
        .ok_or_else(|| schema_error(origin, format!("missing column '{}'", INSTANCE_COLUMN)))?;
    let cost_idx = column_index(&header, COST_COLUMN)
        .ok_or_else(|| schema_error(origin, format!("missing column '{}'", COST_COLUMN)))?;
    let required = instance_idx.max(cost_idx) + 1;

    let mut costs: BTreeMap<String, f64> = BTreeMap::new();
    let mut collapsed = 0usize;

    for (line_no, line) in lines {
        let fields = split_csv_line(line);
        if fields.len() < required {
            return Err(schema_error(
                origin,
                format!(
                    "line {} has {} field(s), expected at least {}",
                    line_no,
                    fields.len(),
                    required
                ),
            ));
        }

        let instance = fields[instance_idx].trim().to_string();
        let raw_cost = fields[cost_idx].trim();
        let cost = parse_cost(raw_cost).ok_or_else(|| CompareError::Parse {
            origin: origin.to_string(),
            line: line_no,
            value: raw_cost.to_string(),
        })?;

        match costs.get_mut(&instance) {
            None => {
                costs.insert(instance, cost);
            }
            Some(existing) => match policy {
                DuplicatePolicy::Min => {
                    collapsed += 1;
                    if cost < *existing {
                        *existing = cost;
                    }
                }
                DuplicatePolicy::Error => {
                    return Err(CompareError::DuplicateKey {
                        origin: origin.to_string(),
                        instance,
                        line: line_no,
                    });
                }
            },
        }
    }

    if costs.is_empty() {
        return Err(CompareError::EmptyResult {
            origin: origin.to_string(),
        });
    }

    tracing::debug!(
        origin,
        records = costs.len(),
        duplicates_collapsed = collapsed,
        "loaded result set"
    );

    Ok(ResultSet {
        origin: origin.to_string(),
        costs,
    })
}

fn schema_error(origin: &str, reason: impl Into<String>) -> CompareError {
    CompareError::Schema {
        origin: origin.to_string(),
        reason: reason.into(),
    }
}

fn column_index(header: &[String], name: &str) -> Option<usize> {
    header.iter().position(|col| col.trim() == name)
}

/// Parse a cost; `inf` and `nan` are rejected along with garbage
fn parse_cost(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Split one CSV line into fields
///
/// Handles double-quoted fields with `""` escapes, the inverse of
/// `report::escape_field`. Quoted newlines are not supported.
pub(crate) fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
            }
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            '\r' if !in_quotes && chars.peek().is_none() => {}
            _ => field.push(c),
        }
    }
    fields.push(field);

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<ResultSet> {
        parse_result_set(text, "test.csv", DuplicatePolicy::Min)
    }

    #[test]
    fn test_parse_basic_table() {
        let set = parse("filename,total_cost\nb.json,2.5\na.json,1.0\n").unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("a.json"), Some(1.0));
        assert_eq!(set.get("b.json"), Some(2.5));
        assert_eq!(set.instances().collect::<Vec<_>>(), vec!["a.json", "b.json"]);
    }

    #[test]
    fn test_extra_columns_ignored() {
        let text = "scheduler,total_cost,makespan,filename\nff,10.5,3,x.json\nff,7,2,y.json\n";
        let set = parse(text).unwrap();
        assert_eq!(set.get("x.json"), Some(10.5));
        assert_eq!(set.get("y.json"), Some(7.0));
    }

    #[test]
    fn test_missing_header() {
        assert!(matches!(parse(""), Err(CompareError::Schema { .. })));
        assert!(matches!(parse("\n\n"), Err(CompareError::Schema { .. })));
    }

    #[test]
    fn test_missing_cost_column() {
        let err = parse("filename,makespan\na,1\n").unwrap_err();
        match err {
            CompareError::Schema { reason, .. } => assert!(reason.contains("total_cost")),
            other => panic!("Expected Schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_instance_column() {
        let err = parse("name,total_cost\na,1\n").unwrap_err();
        match err {
            CompareError::Schema { reason, .. } => assert!(reason.contains("filename")),
            other => panic!("Expected Schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_short_row_is_schema_error() {
        let err = parse("filename,total_cost\na,1\nb\n").unwrap_err();
        match err {
            CompareError::Schema { reason, .. } => assert!(reason.contains("line 3")),
            other => panic!("Expected Schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_cost_names_line() {
        let err = parse("filename,total_cost\na,1\nb,oops\n").unwrap_err();
        match err {
            CompareError::Parse { line, value, .. } => {
                assert_eq!(line, 3);
                assert_eq!(value, "oops");
            }
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_cost_rejected() {
        assert!(matches!(
            parse("filename,total_cost\na,inf\n"),
            Err(CompareError::Parse { .. })
        ));
        assert!(matches!(
            parse("filename,total_cost\na,NaN\n"),
            Err(CompareError::Parse { .. })
        ));
        assert!(matches!(
            parse("filename,total_cost\na,\n"),
            Err(CompareError::Parse { .. })
        ));
    }

    #[test]
    fn test_duplicate_min_policy_keeps_smallest() {
        let text = "filename,total_cost\nx,3.0\nx,5.0\n";
        let set = parse_result_set(text, "t", DuplicatePolicy::Min).unwrap();
        assert_eq!(set.get("x"), Some(3.0));

        let text = "filename,total_cost\nx,5.0\nx,3.0\n";
        let set = parse_result_set(text, "t", DuplicatePolicy::Min).unwrap();
        assert_eq!(set.get("x"), Some(3.0));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_duplicate_error_policy_rejects() {
        let text = "filename,total_cost\nx,3.0\ny,1.0\nx,5.0\n";
        let err = parse_result_set(text, "t", DuplicatePolicy::Error).unwrap_err();
        match err {
            CompareError::DuplicateKey { instance, line, .. } => {
                assert_eq!(instance, "x");
                assert_eq!(line, 4);
            }
            other => panic!("Expected DuplicateKey error, got {:?}", other),
        }
    }

    #[test]
    fn test_header_only_is_empty_result() {
        assert!(matches!(
            parse("filename,total_cost\n"),
            Err(CompareError::EmptyResult { .. })
        ));
    }

    #[test]
    fn test_blank_lines_and_crlf() {
        let set = parse("filename,total_cost\r\n\r\na,1.5\r\n\r\nb,2\r\n").unwrap();
        assert_eq!(set.get("a"), Some(1.5));
        assert_eq!(set.get("b"), Some(2.0));
    }

    #[test]
    fn test_quoted_fields() {
        let text = "filename,total_cost\n\"dir/a,b.json\",4\n\"say \"\"hi\"\"\",\" 2.5 \"\n";
        let set = parse(text).unwrap();
        assert_eq!(set.get("dir/a,b.json"), Some(4.0));
        assert_eq!(set.get("say \"hi\""), Some(2.5));
    }

    #[test]
    fn test_byte_order_mark_stripped() {
        let set = parse("\u{feff}filename,total_cost\na,1\n").unwrap();
        assert_eq!(set.get("a"), Some(1.0));
    }

    #[test]
    fn test_split_csv_line() {
        assert_eq!(split_csv_line("a,b,,c"), vec!["a", "b", "", "c"]);
        assert_eq!(split_csv_line("\"x,y\",z"), vec!["x,y", "z"]);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = load_result_set(Path::new("/nonexistent/eval_none.csv"), DuplicatePolicy::Min)
            .unwrap_err();
        assert!(matches!(err, CompareError::Io { .. }));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eval_ff.csv");
        std::fs::write(&path, "filename,total_cost\na,1\nb,2\n").unwrap();

        let set = load_result_set(&path, DuplicatePolicy::Error).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.origin().ends_with("eval_ff.csv"));
    }
}
