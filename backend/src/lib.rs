//! # Dealflow - seed investor and co-investment reports
//!
//! Dealflow loads pipe-delimited deal, participation and investor files into
//! a relational store, then derives two CSV reports: the seed investors of
//! every company and an investor by investor co-investment matrix.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  .dat files │────▶│   Parser    │────▶│    Store    │────▶│  Transform  │
//! │ (UTF8/16LE) │     │ (per-file   │     │  (SQLite,   │     │ (seed, co-  │
//! │             │     │  encoding)  │     │  replace)   │     │  investment)│
//! └─────────────┘     └─────────────┘     └─────────────┘     └──────┬──────┘
//!                                                                     │
//!                                                              ┌──────▼──────┐
//!                                                              │ CSV reports │
//!                                                              └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dealflow::{run, AppConfig};
//!
//! fn main() {
//!     let config = AppConfig::load().unwrap();
//!     let summary = run(&config).unwrap();
//!     println!("Wrote {}", summary.seed_report.display());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - Layered configuration (defaults, JSON file, environment)
//! - [`logs`] - Console logging with a bounded history
//! - [`models`] - Tables, rows and report data
//! - [`parser`] - Delimited file loading with encoding handling
//! - [`store`] - Relational store behind the [`TableStore`] trait
//! - [`transform`] - Seed and co-investment analyses, pipeline
//! - [`report`] - CSV report writers

// Core modules
pub mod config;
pub mod error;
pub mod logs;
pub mod models;

// Loading and storage
pub mod parser;
pub mod store;

// Analysis and output
pub mod report;
pub mod transform;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    AnalysisError, ConfigError, LoadError, PipelineError, ReportError, StoreError,
    AnalysisResult, ConfigResult, LoadResult, PipelineResult, ReportResult, StoreResult,
};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::{AppConfig, InputConfig, OutputConfig, SourceFile, StoreConfig};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    Cell,
    ColumnType,
    Table,
    SeedRow,
    Participation,
    Investor,
    InvestorDirectory,
    SeedInfo,
    MatrixCell,
    CoInvestmentMatrix,
};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{decode_content, detect_encoding, load_table, parse_delimited, LoadedTable};

// =============================================================================
// Re-exports - Store
// =============================================================================

pub use store::{connect, IfExists, SqliteStore, TableStore};

// =============================================================================
// Re-exports - Analyses and pipeline
// =============================================================================

pub use transform::{
    co_investment_matrix,
    seed_investors,
    CoInvestmentAnalysis,
    SeedAnalysis,
    run,
    run_with_store,
    load_sources,
    RunSummary,
    TableInfo,
};

// =============================================================================
// Re-exports - Reports
// =============================================================================

pub use report::{write_co_investment_report, write_seed_report};
