//! End-to-end run: load the three files, store them, query them back and
//! write both reports.
//!
//! # Example
//!
//! ```rust,ignore
//! use dealflow::{run, AppConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let summary = run(&config)?;
//!     println!("{} companies reported", summary.companies);
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use crate::config::{AppConfig, InputConfig, OutputConfig};
use crate::error::{LoadResult, PipelineResult};
use crate::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::models::{Investor, InvestorDirectory, Participation, SeedRow};
use crate::parser::{load_table, LoadedTable};
use crate::report::{write_co_investment_report, write_seed_report};
use crate::store::{self, IfExists, TableStore};

use super::co_investment::co_investment_matrix;
use super::seed::seed_investors;

const DEALS_COLUMNS: &[&str] = &["deal_id", "company_id", "deal_number", "deal_date"];
const DEAL_INVESTOR_COLUMNS: &[&str] = &["deal_id", "investor_id"];
const INVESTORS_COLUMNS: &[&str] = &["investor_id", "investor_name"];

pub const INVESTORS_QUERY: &str = "SELECT investor_id, investor_name FROM investors";

pub const SEED_ROWS_QUERY: &str = "SELECT d.company_id, d.deal_number, d.deal_date, e.investor_id
            FROM deals d JOIN deal_investor e
            ON d.deal_id = e.deal_id";

pub const PARTICIPATIONS_QUERY: &str = "SELECT deal_id, investor_id FROM deal_investor";

/// A source file loaded into the store
#[derive(Debug, Clone)]
pub struct TableInfo {
    pub name: String,
    pub path: PathBuf,
    pub encoding: String,
    pub row_count: usize,
}

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub tables: Vec<TableInfo>,
    /// Rows in the seed report
    pub companies: usize,
    /// Rows (and columns) in the co-investment report
    pub matrix_investors: usize,
    pub seed_report: PathBuf,
    pub co_investment_report: PathBuf,
    /// Data-quality warnings found by the analyses
    pub warnings: Vec<String>,
}

/// Run the whole pipeline with the store named in `config`.
pub fn run(config: &AppConfig) -> PipelineResult<RunSummary> {
    let sources = load_sources(&config.inputs)?;
    log_success("Data read complete");

    log_info(format!("🔌 Connecting to {}", config.store.display_url()));
    let mut store = store::connect(&config.store)?;

    run_with_store(store.as_mut(), sources, &config.output)
}

/// Read the three input files, in the order they are written to the store.
pub fn load_sources(inputs: &InputConfig) -> LoadResult<Vec<(String, LoadedTable)>> {
    let sources = [
        (&inputs.deals, DEALS_COLUMNS),
        (&inputs.deal_investor, DEAL_INVESTOR_COLUMNS),
        (&inputs.investors, INVESTORS_COLUMNS),
    ];

    log_info("📖 Reading input files...");
    let mut loaded = Vec::with_capacity(sources.len());
    for (source, required) in sources {
        let path = inputs.path_of(source);
        let result = load_table(&path, &source.encoding, required)?;
        log_info_indent(
            format!(
                "{} → {} ({} rows, {})",
                path.display(),
                source.table,
                result.table.len(),
                result.encoding
            ),
            1,
        );
        loaded.push((source.table.clone(), result));
    }
    Ok(loaded)
}

/// Store the loaded tables in `store`, derive both reports and write them
/// to `output`.
pub fn run_with_store(
    store: &mut dyn TableStore,
    sources: Vec<(String, LoadedTable)>,
    output: &OutputConfig,
) -> PipelineResult<RunSummary> {
    log_info("💾 Writing tables...");
    let mut tables = Vec::with_capacity(sources.len());
    for (name, loaded) in &sources {
        store.write_table(name, &loaded.table, IfExists::Replace)?;
        log_success(format!("{} ({} rows)", name, loaded.table.len()));
        tables.push(TableInfo {
            name: name.clone(),
            path: loaded.path.clone(),
            encoding: loaded.encoding.clone(),
            row_count: loaded.table.len(),
        });
    }
    drop(sources);

    let investors = Investor::from_table(&store.query(INVESTORS_QUERY)?)?;
    let directory = InvestorDirectory::new(investors);
    log_info(format!("{} investors in directory", directory.len()));

    // Part 1: seed investors per company
    let seed_rows = SeedRow::from_table(&store.query(SEED_ROWS_QUERY)?)?;
    let seeds = seed_investors(&seed_rows, &directory)?;
    let mut warnings = seeds.warnings();
    warnings.iter().for_each(log_warning);

    let seed_report = output.seed_report_path();
    log_info("Now writing part1");
    write_seed_report(&seed_report, &seeds.seeds)?;
    log_success("Part 1 completed");

    // Part 2: co-investment matrix
    let participations = Participation::from_table(&store.query(PARTICIPATIONS_QUERY)?)?;
    let co_investment = co_investment_matrix(&participations, &directory)?;
    let co_investment_warnings = co_investment.warnings();
    co_investment_warnings.iter().for_each(log_warning);
    warnings.extend(co_investment_warnings);

    let co_investment_report = output.co_investment_report_path();
    log_info("Now writing part2");
    write_co_investment_report(&co_investment_report, &co_investment.matrix)?;
    log_success("Part 2 completed");

    Ok(RunSummary {
        tables,
        companies: seeds.seeds.len(),
        matrix_investors: co_investment.matrix.len(),
        seed_report,
        co_investment_report,
        warnings,
    })
}
