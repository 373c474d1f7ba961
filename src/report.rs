//! Report rendering for paired comparisons
//!
//! Three views of the same [`TestResult`]: a human-readable text report, a
//! JSON document with full-precision values, and a one-row-per-comparison CSV
//! summary. Rounding only ever happens in the rendered string.

use crate::compare::Comparison;
use crate::differences::DifferenceSummary;
use crate::error::{CompareError, Result};
use crate::names::SchedulerNames;
use crate::ttest::{Decision, TestResult};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Significant digits used for every number in text and CSV output
pub const SIG_FIGS: usize = 4;

/// Header row of the summary CSV
pub const SUMMARY_HEADER: &str = "comparison,ci_ratio,mean_ratio,p_value";

/// Format a number at [`SIG_FIGS`] significant digits
pub fn format_sig(x: f64) -> String {
    format_significant(x, SIG_FIGS)
}

/// Format a number like C's `%.<digits>g`
///
/// Fixed notation for exponents in `[-4, digits)`, scientific otherwise,
/// trailing zeros removed. Non-finite values render as `nan`, `inf`, `-inf`.
pub fn format_significant(x: f64, digits: usize) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if x == 0.0 {
        return if x.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let digits = digits.max(1);
    let sci = format!("{:.*e}", digits - 1, x);
    let Some((mantissa, exponent)) = sci.split_once('e') else {
        return sci;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= digits as i32 {
        format!(
            "{}e{}{:02}",
            strip_trailing_zeros(mantissa),
            if exponent < 0 { '-' } else { '+' },
            exponent.abs()
        )
    } else {
        let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
        strip_trailing_zeros(&format!("{:.*}", decimals, x))
    }
}

fn strip_trailing_zeros(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}

/// Format an interval as `[low, high]`
pub fn format_interval(low: f64, high: f64) -> String {
    format!("[{}, {}]", format_sig(low), format_sig(high))
}

fn decision_line(decision: Decision) -> &'static str {
    match decision {
        Decision::Reject => "REJECT H0",
        Decision::FailToReject => "FAIL TO REJECT H0",
        Decision::Indeterminate => "FAIL TO REJECT H0 (indeterminate: zero variance)",
    }
}

/// Render the human-readable report for one comparison
pub fn render_text(comparison: &Comparison) -> String {
    let r = &comparison.result;
    let transform = r.transform.transform();
    let expr = transform.expression();
    let obs = transform.observation_name();

    let mut lines = vec![
        format!(
            "Algorithm A: {} ({})",
            comparison.a.label,
            comparison.a.path.display()
        ),
        format!(
            "Algorithm B: {} ({})",
            comparison.b.label,
            comparison.b.path.display()
        ),
        format!("Instances: {}", r.n),
        String::new(),
        format!("Test: paired two-tailed t-test on {}", expr),
        format!(
            "H0: mean({}) = {}   (alpha={})",
            expr,
            format_sig(r.null_value),
            format_sig(r.alpha)
        ),
        String::new(),
        format!("mean({}) = {}", obs, format_sig(r.mean)),
        format!("std({})  = {}", obs, format_sig(r.std_dev)),
        format!("t(df={})       = {}", r.df, format_sig(r.statistic)),
        format!("p-value          = {}", format_sig(r.pvalue)),
        format!(
            "{}% CI mean({}): {}",
            format_sig(r.confidence_level() * 100.0),
            obs,
            format_interval(r.ci_low, r.ci_high)
        ),
    ];
    if let Some(g) = r.geometric_ratio {
        lines.push(format!(
            "exp(mean) (geom. mean ratio cost_a/cost_b): {}",
            format_sig(g.mean)
        ));
        lines.push(format!("exp(CI): {}", format_interval(g.ci_low, g.ci_high)));
    }
    lines.push(String::new());
    lines.push(format!("Decision: {}", decision_line(r.decision)));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[derive(Debug, Serialize)]
struct JsonDataset<'a> {
    label: &'a str,
    path: &'a Path,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    algorithm_a: JsonDataset<'a>,
    algorithm_b: JsonDataset<'a>,
    result: &'a TestResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    differences: Option<&'a DifferenceSummary>,
}

/// Render one comparison as pretty-printed JSON (non-finite values become `null`)
pub fn render_json(
    comparison: &Comparison,
    differences: Option<&DifferenceSummary>,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&json_report(comparison, differences))
}

/// Render several comparisons as one JSON array
pub fn render_json_batch(comparisons: &[&Comparison]) -> serde_json::Result<String> {
    let reports: Vec<JsonReport<'_>> = comparisons.iter().map(|c| json_report(c, None)).collect();
    serde_json::to_string_pretty(&reports)
}

fn json_report<'a>(
    comparison: &'a Comparison,
    differences: Option<&'a DifferenceSummary>,
) -> JsonReport<'a> {
    JsonReport {
        algorithm_a: JsonDataset {
            label: &comparison.a.label,
            path: &comparison.a.path,
        },
        algorithm_b: JsonDataset {
            label: &comparison.b.label,
            path: &comparison.b.path,
        },
        result: &comparison.result,
        differences,
    }
}

/// One row of the summary CSV
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRecord {
    /// `"<A> / <B>"`
    pub comparison: String,
    /// Interval on the ratio scale, `"[low, high]"`
    pub ci_ratio: String,
    /// Mean ratio (geometric mean for log-ratio tests)
    pub mean_ratio: String,
    pub p_value: String,
}

impl SummaryRecord {
    pub fn from_comparison(comparison: &Comparison, names: &dyn SchedulerNames) -> Self {
        let r = &comparison.result;
        let (low, high) = r.ratio_interval();
        Self {
            comparison: format!(
                "{} / {}",
                names.display_name(&comparison.a.label),
                names.display_name(&comparison.b.label)
            ),
            ci_ratio: format_interval(low, high),
            mean_ratio: format_sig(r.ratio_mean()),
            p_value: format_sig(r.pvalue),
        }
    }

    /// Format the record as a CSV row (no trailing newline)
    pub fn to_csv_row(&self) -> String {
        [
            escape_field(&self.comparison),
            escape_field(&self.ci_ratio),
            escape_field(&self.mean_ratio),
            escape_field(&self.p_value),
        ]
        .join(",")
    }
}

/// Escape CSV field (handle commas, quotes, newlines)
pub fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Summary CSV text: header plus one row per record
pub fn summary_csv(records: &[SummaryRecord]) -> String {
    let mut output = String::from(SUMMARY_HEADER);
    output.push('\n');
    for record in records {
        output.push_str(&record.to_csv_row());
        output.push('\n');
    }
    output
}

/// Write the summary CSV, creating parent directories as needed
pub fn write_summary_csv(path: &Path, records: &[SummaryRecord]) -> Result<()> {
    ensure_parent_dir(path)?;
    std::fs::write(path, summary_csv(records)).map_err(|e| CompareError::io(path, e))?;
    tracing::debug!(path = %path.display(), rows = records.len(), "wrote summary csv");
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .map_err(|e| CompareError::io(PathBuf::from(parent), e)),
        _ => Ok(()),
    }
}
