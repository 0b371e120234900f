//! Relational store seam.
//!
//! The pipeline only needs two operations: replace a table with loaded rows,
//! and run a read-back query. [`TableStore`] captures both; [`SqliteStore`]
//! is the bundled backend.

pub mod sqlite;

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::models::Table;

pub use sqlite::SqliteStore;

/// What `write_table` does when the table already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IfExists {
    /// Drop the existing table and recreate it
    #[default]
    Replace,
    /// Insert into the existing table
    Append,
    /// Refuse to touch the existing table
    Fail,
}

/// A relational backend that can persist [`Table`]s and answer SQL queries.
pub trait TableStore {
    /// Persist `table` under `name`.
    fn write_table(&mut self, name: &str, table: &Table, if_exists: IfExists) -> StoreResult<()>;

    /// Run a read-only query and return every row.
    fn query(&self, sql: &str) -> StoreResult<Table>;
}

/// Open the backend named by `config.driver`.
pub fn connect(config: &StoreConfig) -> StoreResult<Box<dyn TableStore>> {
    match config.driver.to_lowercase().as_str() {
        "sqlite" | "sqlite3" => Ok(Box::new(SqliteStore::connect(config)?)),
        other => Err(StoreError::UnsupportedDriver(other.to_string())),
    }
}

/// Quote an SQL identifier.
pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
