//! Dealflow CLI - build the seed investor and co-investment reports
//!
//! ```bash
//! DEALFLOW_DB_NAME=casestudy.db dealflow
//! ```
//!
//! Settings come from the file named by `DEALFLOW_CONFIG` (JSON) and from
//! `DEALFLOW_*` environment variables, which a `.env` file may provide.

use clap::Parser;
use dealflow::logs::log_error;
use dealflow::{run, AppConfig, PipelineResult, RunSummary};

#[derive(Parser)]
#[command(name = "dealflow", version)]
#[command(about = "Load deal files into a database and write the seed and co-investment reports")]
#[command(long_about = "Load deal files into a database and write the seed and co-investment reports.

Environment:
  DEALFLOW_CONFIG         JSON file with settings (optional)
  DEALFLOW_DB_DRIVER      store driver (default: sqlite)
  DEALFLOW_DB_NAME        database file, or :memory: (required)
  DEALFLOW_DATA_DIR       directory holding the .dat files (default: .)
  DEALFLOW_OUTPUT_DIR     directory for the CSV reports (default: .)")]
struct Cli {}

fn main() {
    dotenvy::dotenv().ok();
    let _cli = Cli::parse();

    match execute() {
        Ok(summary) => print_summary(&summary),
        Err(e) => {
            log_error(format!("Error: {}", e));
            std::process::exit(1);
        }
    }
}

fn execute() -> PipelineResult<RunSummary> {
    let config = AppConfig::load()?;
    run(&config)
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("📊 Tables:");
    for table in &summary.tables {
        println!("   {} ← {} ({} rows)", table.name, table.path.display(), table.row_count);
    }
    println!("📄 {} companies → {}", summary.companies, summary.seed_report.display());
    println!(
        "📄 {} investors → {}",
        summary.matrix_investors,
        summary.co_investment_report.display()
    );
    if !summary.warnings.is_empty() {
        println!("⚠️  {} warnings:", summary.warnings.len());
        for warning in &summary.warnings {
            println!("   - {}", warning);
        }
    }
    println!("\n✨ Done!");
}
