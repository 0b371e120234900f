//! Generic tabular data exchanged between the loader and the store.
//!
//! A [`Table`] is a header plus rows of typed [`Cell`]s. Column types are
//! inferred from text the way a dataframe loader does it, so numeric columns
//! land in the store as numbers and compare numerically in SQL.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{StoreError, StoreResult};

/// A single value in a [`Table`].
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Order values by kind, then by value: nulls first, then numbers
    /// compared numerically, then text compared lexically.
    pub fn compare(&self, other: &Cell) -> Ordering {
        match (self, other) {
            (Cell::Integer(a), Cell::Integer(b)) => a.cmp(b),
            (Cell::Text(a), Cell::Text(b)) => a.cmp(b),
            (a, b) => match (a.as_number(), b.as_number()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => a.rank().cmp(&b.rank()),
            },
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Integer(i) => Some(*i as f64),
            Cell::Real(f) => Some(*f),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Cell::Null => 0,
            Cell::Integer(_) | Cell::Real(_) => 1,
            Cell::Text(_) => 2,
        }
    }

    /// String form used for identifiers. `None` for nulls.
    pub fn as_key(&self) -> Option<String> {
        match self {
            Cell::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Integer view of the cell, accepting whole reals and numeric text.
    pub fn as_integer(&self) -> Result<Option<i64>, String> {
        match self {
            Cell::Null => Ok(None),
            Cell::Integer(i) => Ok(Some(*i)),
            Cell::Real(f) if f.is_finite() && f.fract() == 0.0 => Ok(Some(*f as i64)),
            Cell::Real(f) => Err(format!("{} is not a whole number", f)),
            Cell::Text(s) => s
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| format!("'{}' is not an integer", s)),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Integer(i) => write!(f, "{}", i),
            // Debug keeps the trailing ".0" on whole reals
            Cell::Real(r) => write!(f, "{:?}", r),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

/// Storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Real,
    Text,
}

impl ColumnType {
    /// Infer a column type from raw text values. Empty values are ignored.
    pub fn infer<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let mut column_type = ColumnType::Integer;
        for raw in values {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            if column_type == ColumnType::Integer && raw.parse::<i64>().is_ok() {
                continue;
            }
            if is_real(raw) {
                column_type = ColumnType::Real;
                continue;
            }
            return ColumnType::Text;
        }
        column_type
    }

    /// Infer a column type from cells that are already typed.
    pub fn of_cells<'a>(cells: impl IntoIterator<Item = &'a Cell>) -> Self {
        let mut column_type = ColumnType::Integer;
        for cell in cells {
            match cell {
                Cell::Null | Cell::Integer(_) => {}
                Cell::Real(_) => column_type = ColumnType::Real,
                Cell::Text(_) => return ColumnType::Text,
            }
        }
        column_type
    }

    /// Convert raw text to a cell of this type.
    pub fn parse(self, raw: &str) -> Cell {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Null;
        }
        match self {
            ColumnType::Integer => trimmed
                .parse()
                .map(Cell::Integer)
                .unwrap_or_else(|_| Cell::Text(raw.to_string())),
            ColumnType::Real => trimmed
                .parse()
                .map(Cell::Real)
                .unwrap_or_else(|_| Cell::Text(raw.to_string())),
            ColumnType::Text => Cell::Text(raw.to_string()),
        }
    }

    /// SQL column affinity.
    pub fn sql_type(self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
        }
    }
}

/// `f64::from_str` also accepts "inf" and "NaN"; those stay text.
fn is_real(raw: &str) -> bool {
    raw.parse::<f64>().is_ok() && raw.bytes().any(|b| b.is_ascii_digit())
}

/// Named columns and rows of cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Build a table from typed rows. Rows are padded with nulls or
    /// truncated to the header width.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Null);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Build a table from text records, inferring one type per column.
    pub fn from_text_records(columns: Vec<String>, records: Vec<Vec<String>>) -> Self {
        let types: Vec<ColumnType> = (0..columns.len())
            .map(|i| {
                ColumnType::infer(
                    records
                        .iter()
                        .map(|record| record.get(i).map(String::as_str).unwrap_or("")),
                )
            })
            .collect();

        let rows = records
            .iter()
            .map(|record| {
                types
                    .iter()
                    .enumerate()
                    .map(|(i, column_type)| {
                        record
                            .get(i)
                            .map(|raw| column_type.parse(raw))
                            .unwrap_or(Cell::Null)
                    })
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Like [`Table::column_index`], failing when a query result lacks the column.
    pub fn require_column(&self, name: &str) -> StoreResult<usize> {
        self.column_index(name)
            .ok_or_else(|| StoreError::SchemaMismatch {
                column: name.to_string(),
                message: format!("result has columns [{}]", self.columns.join(", ")),
            })
    }

    /// Storage type of every column, inferred from its cells.
    pub fn column_types(&self) -> Vec<ColumnType> {
        (0..self.columns.len())
            .map(|i| ColumnType::of_cells(self.rows.iter().map(|row| &row[i])))
            .collect()
    }
}
