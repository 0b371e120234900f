//! Error types for the dealflow pipeline.
//!
//! One enum per component, wrapped by [`PipelineError`] at the top:
//!
//! - [`ConfigError`] - configuration loading
//! - [`LoadError`] - reading and decoding the input files
//! - [`StoreError`] - relational store connection, writes and queries
//! - [`AnalysisError`] - investor lookups during seed/co-investment analysis
//! - [`ReportError`] - writing the output reports
//!
//! Conversions are `From` implementations so `?` works across boundaries.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while assembling the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required setting was not provided.
    #[error("Missing configuration value: {0}")]
    Missing(String),

    /// A setting was provided but could not be used.
    #[error("Invalid configuration value for {key}: {message}")]
    Invalid { key: String, message: String },

    /// The configuration file could not be read.
    #[error("Cannot read configuration file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for [`crate::config::AppConfig`].
    #[error("Invalid configuration file {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

// =============================================================================
// Loader Errors
// =============================================================================

/// Errors while reading a pipe-delimited source file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file is missing or unreadable.
    #[error("File not found error: {} ({source})", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bytes are not valid in the declared encoding.
    #[error("File encoding error: {} ({message})", .path.display())]
    Encoding { path: PathBuf, message: String },

    /// The encoding label is not known.
    #[error("Unknown encoding '{label}' for {}", .path.display())]
    UnknownEncoding { path: PathBuf, label: String },

    /// The delimited content could not be parsed.
    #[error("{} failed to parse at line {line}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        line: u64,
        message: String,
    },

    /// A column the pipeline depends on is absent from the header.
    #[error("{} is missing required column '{column}'", .path.display())]
    MissingColumn { path: PathBuf, column: String },

    /// The file has no header row.
    #[error("{} is empty", .path.display())]
    EmptyFile { path: PathBuf },
}

// =============================================================================
// Store Errors
// =============================================================================

/// Errors from the relational store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be opened with the configured parameters.
    #[error("Failed connection to database {target}: {message}")]
    Connection { target: String, message: String },

    /// No backend exists for the configured driver.
    #[error("Unsupported database driver '{0}'")]
    UnsupportedDriver(String),

    /// A read-back query failed to prepare or execute.
    #[error("Query failed: {message} [{sql}]")]
    Query { sql: String, message: String },

    /// A table could not be written.
    #[error("Failed to write table '{table}': {message}")]
    Write { table: String, message: String },

    /// A query result does not have the shape the analysis expects.
    #[error("Unexpected result for column '{column}': {message}")]
    SchemaMismatch { column: String, message: String },
}

// =============================================================================
// Analysis Errors
// =============================================================================

/// Errors while deriving seed or co-investment data.
#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    /// A participation references an investor absent from the investor table.
    #[error("Investor '{investor_id}' not found in investor table")]
    UnknownInvestor { investor_id: String },

    /// A seed row for a company carries no investor id.
    #[error("Seed deal of company '{company_id}' has a participation without investor id")]
    MissingInvestorId { company_id: String },
}

// =============================================================================
// Report Errors
// =============================================================================

/// Errors while writing output reports.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The output file could not be created or written.
    #[error("Cannot write report {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level error returned by [`crate::transform::pipeline::run`].
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for loader operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Result type for report writing.
pub type ReportResult<T> = Result<T, ReportError>;

/// Result type for the full pipeline.
pub type PipelineResult<T> = Result<T, PipelineError>;
