//! SQLite backend for [`TableStore`].

use rusqlite::types::{ToSql, ToSqlOutput, Value, ValueRef};
use rusqlite::{params_from_iter, Connection};

use super::{quote_identifier, IfExists, TableStore};
use crate::config::{StoreConfig, IN_MEMORY_DATABASE};
use crate::error::{StoreError, StoreResult};
use crate::models::{Cell, Table};

/// SQLite database holding the loaded tables.
///
/// `database` in the [`StoreConfig`] is the database file; host, user and
/// password do not apply to SQLite and are ignored.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database named by `config.database`.
    pub fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let target = config.display_url();
        let connection_error = |e: rusqlite::Error| StoreError::Connection {
            target: target.clone(),
            message: e.to_string(),
        };

        let conn = if config.database == IN_MEMORY_DATABASE {
            Connection::open_in_memory()
        } else {
            Connection::open(&config.database)
        }
        .map_err(connection_error)?;

        // Opening is lazy; reading the schema surfaces "not a database" early.
        conn.query_row("PRAGMA schema_version", [], |row| row.get::<_, i64>(0))
            .map_err(connection_error)?;

        Ok(Self { conn })
    }

    /// Open a private in-memory database (used in tests).
    pub fn in_memory() -> StoreResult<Self> {
        Self::connect(&StoreConfig::in_memory())
    }

    fn table_exists(&self, name: &str) -> rusqlite::Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

fn write_error(table: &str, err: impl std::fmt::Display) -> StoreError {
    StoreError::Write {
        table: table.to_string(),
        message: err.to_string(),
    }
}

impl TableStore for SqliteStore {
    fn write_table(&mut self, name: &str, table: &Table, if_exists: IfExists) -> StoreResult<()> {
        if table.columns().is_empty() {
            return Err(write_error(name, "table has no columns"));
        }

        let exists = self.table_exists(name).map_err(|e| write_error(name, e))?;
        if exists && if_exists == IfExists::Fail {
            return Err(write_error(name, "table already exists"));
        }

        let quoted = quote_identifier(name);
        let column_list = table
            .columns()
            .iter()
            .map(|c| quote_identifier(c))
            .collect::<Vec<_>>()
            .join(", ");

        let tx = self.conn.transaction().map_err(|e| write_error(name, e))?;

        if exists && if_exists == IfExists::Replace {
            tx.execute_batch(&format!("DROP TABLE {};", quoted))
                .map_err(|e| write_error(name, e))?;
        }
        if !exists || if_exists == IfExists::Replace {
            let definitions = table
                .columns()
                .iter()
                .zip(table.column_types())
                .map(|(column, column_type)| {
                    format!("{} {}", quote_identifier(column), column_type.sql_type())
                })
                .collect::<Vec<_>>()
                .join(", ");
            tx.execute_batch(&format!("CREATE TABLE {} ({});", quoted, definitions))
                .map_err(|e| write_error(name, e))?;
        }

        {
            let placeholders = (1..=table.columns().len())
                .map(|i| format!("?{}", i))
                .collect::<Vec<_>>()
                .join(", ");
            let mut insert = tx
                .prepare(&format!(
                    "INSERT INTO {} ({}) VALUES ({})",
                    quoted, column_list, placeholders
                ))
                .map_err(|e| write_error(name, e))?;

            for row in table.rows() {
                insert
                    .execute(params_from_iter(row.iter()))
                    .map_err(|e| write_error(name, e))?;
            }
        }

        tx.commit().map_err(|e| write_error(name, e))
    }

    fn query(&self, sql: &str) -> StoreResult<Table> {
        let query_error = |e: rusqlite::Error| StoreError::Query {
            sql: sql.split_whitespace().collect::<Vec<_>>().join(" "),
            message: e.to_string(),
        };

        let mut stmt = self.conn.prepare(sql).map_err(query_error)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let mut rows = stmt.query([]).map_err(query_error)?;
        let mut cells = Vec::new();
        while let Some(row) = rows.next().map_err(query_error)? {
            let mut values = Vec::with_capacity(width);
            for i in 0..width {
                values.push(cell_from_sql(row.get_ref(i).map_err(query_error)?));
            }
            cells.push(values);
        }

        Ok(Table::new(columns, cells))
    }
}

fn cell_from_sql(value: ValueRef<'_>) -> Cell {
    match value {
        ValueRef::Null => Cell::Null,
        ValueRef::Integer(i) => Cell::Integer(i),
        ValueRef::Real(f) => Cell::Real(f),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Cell::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

impl ToSql for Cell {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Cell::Null => ToSqlOutput::Owned(Value::Null),
            Cell::Integer(i) => ToSqlOutput::Owned(Value::Integer(*i)),
            Cell::Real(f) => ToSqlOutput::Owned(Value::Real(*f)),
            Cell::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}
