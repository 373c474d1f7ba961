use anyhow::{Context, Result};
use clap::Parser;
use schedcmp::batch::run_batch;
use schedcmp::cli::{Cli, OutputFormat};
use schedcmp::compare::{compare_datasets, Comparison};
use schedcmp::differences::DifferenceSummary;
use schedcmp::names::{
    parse_scheduler_list, resolve_algorithm, resolve_csv_pair, CanonicalNames, DatasetRef,
};
use schedcmp::report::{render_json, render_json_batch, render_text, write_summary_csv, SummaryRecord};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Pick the two results files from positional paths or --algo-a/--algo-b
fn resolve_pair(args: &Cli) -> Result<(DatasetRef, DatasetRef)> {
    match args.csv_paths.as_slice() {
        [a, b] => Ok(resolve_csv_pair(a, b)?),
        [] => {
            let (Some(algo_a), Some(algo_b)) = (&args.algo_a, &args.algo_b) else {
                anyhow::bail!("Provide two CSV paths or both --algo-a and --algo-b");
            };
            Ok((
                resolve_algorithm(&args.results_dir, algo_a, &CanonicalNames),
                resolve_algorithm(&args.results_dir, algo_b, &CanonicalNames),
            ))
        }
        other => anyhow::bail!("Expected exactly two CSV paths, got {}", other.len()),
    }
}

fn print_comparison(
    format: OutputFormat,
    comparison: &Comparison,
    differences: Option<&DifferenceSummary>,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            print!("{}", render_text(comparison));
            if let Some(summary) = differences {
                println!();
                println!(
                    "{} vs {}: {}",
                    comparison.a.label, comparison.b.label, summary
                );
            }
        }
        OutputFormat::Json => println!("{}", render_json(comparison, differences)?),
    }
    Ok(())
}

fn run_single(args: &Cli) -> Result<()> {
    let config = args.config();
    let (a, b) = resolve_pair(args)?;

    let comparison = compare_datasets(&a, &b, &config)
        .with_context(|| format!("Comparing {} against {}", a.label, b.label))?;

    // Summary row is only written once the comparison has succeeded
    if let Some(path) = &args.stats_csv {
        let record = SummaryRecord::from_comparison(&comparison, &CanonicalNames);
        write_summary_csv(path, &[record])
            .with_context(|| format!("Writing stats CSV {}", path.display()))?;
    }

    let differences = if args.diff_summary {
        DifferenceSummary::from_paired(&comparison.paired)
    } else {
        None
    };
    print_comparison(args.format, &comparison, differences.as_ref())
}

fn run_batch_mode(args: &Cli, list: &str) -> Result<()> {
    if !args.csv_paths.is_empty() {
        anyhow::bail!("--batch resolves files from --results-dir; do not pass CSV paths");
    }
    let Some(baseline_name) = &args.algo_b else {
        anyhow::bail!("--batch requires --algo-b as the baseline");
    };

    let candidates: Vec<DatasetRef> = parse_scheduler_list(list)
        .iter()
        .map(|name| resolve_algorithm(&args.results_dir, name, &CanonicalNames))
        .collect();
    if candidates.is_empty() {
        anyhow::bail!("--batch list is empty");
    }
    let baseline = resolve_algorithm(&args.results_dir, baseline_name, &CanonicalNames);

    let report = run_batch(
        &candidates,
        &baseline,
        &args.config(),
        &CanonicalNames,
        args.stats_csv.as_deref(),
    )
    .with_context(|| format!("Batch against baseline {}", baseline.label))?;

    let mut succeeded = Vec::new();
    for entry in &report.entries {
        match &entry.outcome {
            Ok(comparison) => succeeded.push(comparison),
            Err(e) => eprintln!("Error: {} vs {}: {}", entry.candidate.label, baseline.label, e),
        }
    }

    match args.format {
        OutputFormat::Text => {
            for (i, comparison) in succeeded.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                let differences = if args.diff_summary {
                    DifferenceSummary::from_paired(&comparison.paired)
                } else {
                    None
                };
                print_comparison(OutputFormat::Text, comparison, differences.as_ref())?;
            }
        }
        OutputFormat::Json => println!("{}", render_json_batch(&succeeded)?),
    }

    let failures = report.failures();
    if failures > 0 {
        anyhow::bail!(
            "{} of {} comparisons failed",
            failures,
            report.entries.len()
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    args.config().validate()?;

    match &args.batch {
        Some(list) => run_batch_mode(&args, list),
        None => run_single(&args),
    }
}
