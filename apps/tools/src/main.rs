use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::HttpConceptStore;
use tracing_subscriber::EnvFilter;

mod bulk;
mod csv_rows;
mod seed;

use bulk::{create_all, BulkReport, DEFAULT_CONCURRENCY};

#[derive(Parser, Debug)]
#[command(name = "concepts-tools")]
struct Cli {
    #[arg(
        long,
        env = "CONCEPTS_API_URL",
        default_value = "http://127.0.0.1:8080/api/concepts"
    )]
    api_url: String,
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the reference concepts.
    Seed,
    /// Create every concept listed in a CSV export.
    LoadCsv { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();
    let store = HttpConceptStore::new(cli.api_url);

    let report = match cli.command {
        Command::Seed => create_all(&store, seed::reference_concepts(), cli.concurrency).await,
        Command::LoadCsv { path } => {
            let text = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("failed to read '{}'", path.display()))?;
            let parsed = csv_rows::parse_concepts_csv(&text);
            for row in &parsed.errors {
                println!("skipped line {}: {}", row.line, row.reason);
            }
            create_all(&store, parsed.concepts, cli.concurrency).await
        }
    };

    print_report(&report);
    if !report.failed.is_empty() {
        bail!("{} concept(s) could not be created", report.failed.len());
    }
    Ok(())
}

fn print_report(report: &BulkReport) {
    for (concept_id, err) in &report.failed {
        println!("failed {concept_id}: {err}");
    }
    println!(
        "created {} concept(s), {} failed",
        report.created.len(),
        report.failed.len()
    );
}
