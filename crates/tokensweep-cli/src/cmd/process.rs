use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Args;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokensweep_core::config::Config;
use tokensweep_core::export::{self, DEFAULT_PER_PAGE};
use tokensweep_core::types::{PrimeStatus, ProcessRequest};
use tokensweep_core::{ingest, io, HttpGateway, Pipeline, ProcessOutput};

/// Entries in a `--log-out` file; an entry may span several lines.
pub const LOG_ENTRY_SEPARATOR: &str = "\n\n";

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

#[derive(Args)]
#[command(group(
    clap::ArgGroup::new("input")
        .required(true)
        .args(["email", "file"]),
))]
pub struct ProcessArgs {
    /// Customer email (single entry)
    #[arg(long)]
    pub email: Option<String>,

    /// Prime status for a single entry
    #[arg(long, default_value = "N/A", requires = "email")]
    pub status: String,

    /// Brand for a single entry (default: config `default_brand`)
    #[arg(long, requires = "email")]
    pub brand: Option<String>,

    /// CSV export to process
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Write the results CSV to this path
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Write the results CSV to processed_feedback_<date>.csv in the current directory
    #[arg(long, conflicts_with = "out")]
    pub export: bool,

    /// Write the processing log to this path
    #[arg(long)]
    pub log_out: Option<PathBuf>,

    /// Results page to print
    #[arg(long, default_value_t = 1)]
    pub page: usize,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, args: ProcessArgs, json: bool) -> anyhow::Result<()> {
    let config = Config::load_with_env(root).context("failed to load config")?;

    let (requests, intro) = match (&args.file, &args.email) {
        (Some(path), _) => read_csv(path, &config)?,
        (None, Some(email)) => {
            let brand = args.brand.as_deref().unwrap_or(&config.default_brand);
            if args.status.parse::<PrimeStatus>().is_err() {
                tracing::warn!(status = %args.status, "unrecognised prime status");
            }
            let request = ProcessRequest::single(email, &args.status, brand, &config.columns)?;
            let intro = format!(
                "Processing single entry: Email: {}, Prime Status: {}...",
                request.email, request.prime_status
            );
            (vec![request], intro)
        }
        (None, None) => anyhow::bail!("either --email or --file is required"),
    };

    let gateway = HttpGateway::new(&config.gateway).context("invalid gateway configuration")?;
    let rt = tokio::runtime::Runtime::new()?;
    let output = rt.block_on(Pipeline::new(&gateway).process(&requests));

    let mut log = Vec::with_capacity(output.log.len() + 1);
    log.push(intro);
    log.extend(output.log.iter().cloned());

    if let Some(path) = &args.log_out {
        io::atomic_write(path, log.join(LOG_ENTRY_SEPARATOR).as_bytes())
            .with_context(|| format!("failed to write log to {}", path.display()))?;
    }

    let export_path = match (&args.out, args.export) {
        (Some(path), _) => Some(path.clone()),
        (None, true) => Some(PathBuf::from(export::default_export_filename(
            chrono::Utc::now().date_naive(),
        ))),
        (None, false) => None,
    };
    if let Some(path) = &export_path {
        let csv = export::to_csv(&output.results)?;
        io::atomic_write(path, csv.as_bytes())
            .with_context(|| format!("failed to write results to {}", path.display()))?;
    }

    if json {
        print_json(&output)?;
    } else {
        print_human(&log, &output, args.page);
        if let Some(path) = &export_path {
            println!("Results written to {}", path.display());
        }
    }
    Ok(())
}

fn read_csv(path: &Path, config: &Config) -> anyhow::Result<(Vec<ProcessRequest>, String)> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv {
        anyhow::bail!(
            "Invalid file type. Please save your Excel sheet as a CSV file and try again."
        );
    }

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let parsed = ingest::parse_csv(&text, &config.columns, &config.default_brand)?;
    let intro = format!(
        "Successfully parsed {} entr(y/ies) from {name}. Starting processing...",
        parsed.requests.len()
    );
    Ok((parsed.requests, intro))
}

// ---------------------------------------------------------------------------
// Human output
// ---------------------------------------------------------------------------

fn print_human(log: &[String], output: &ProcessOutput, page: usize) {
    for entry in log {
        println!("{entry}");
    }
    println!();

    let headers = export::table_headers(&output.results);
    let current = export::paginate(&output.results, page, DEFAULT_PER_PAGE);
    if current.items.is_empty() {
        println!("No results on page {page} ({} page(s)).", current.total_pages);
    } else {
        print_table(&headers, &export::table_rows(current.items, &headers));
        println!(
            "Showing {} to {} of {} results (page {} of {})",
            current.first, current.last, current.total, current.page, current.total_pages
        );
    }

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for item in &output.results {
        *counts.entry(item.task_status.as_str()).or_default() += 1;
    }
    let summary: Vec<String> = counts
        .iter()
        .map(|(status, n)| format!("{n} {status}"))
        .collect();
    println!("Summary: {}", summary.join(", "));

    let attention = output
        .results
        .iter()
        .filter(|item| item.task_status.is_failure())
        .count();
    if attention > 0 {
        println!("{attention} item(s) need attention; see the log above.");
    }
}
