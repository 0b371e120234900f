//! Domain models for the dealflow pipeline.
//!
//! - [`table`] - generic [`Table`]/[`Cell`] rows exchanged with the store
//! - [`SeedRow`], [`Participation`], [`Investor`] - typed views of query results
//! - [`InvestorDirectory`] - investor id to name lookup
//! - [`SeedInfo`] - seed deal investors of one company
//! - [`CoInvestmentMatrix`] - investor by investor shared deal counts

pub mod table;

use std::collections::HashMap;
use std::fmt;

use crate::error::{AnalysisError, AnalysisResult, StoreError, StoreResult};

pub use table::{Cell, ColumnType, Table};

// =============================================================================
// Query rows
// =============================================================================

/// One participation joined with its deal: `deals ⋈ deal_investor`.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedRow {
    pub company_id: Option<String>,
    pub deal_number: Option<i64>,
    pub deal_date: Cell,
    pub investor_id: Option<String>,
}

impl SeedRow {
    pub fn new(company_id: &str, deal_number: i64, deal_date: &str, investor_id: &str) -> Self {
        Self {
            company_id: Some(company_id.to_string()),
            deal_number: Some(deal_number),
            deal_date: Cell::Text(deal_date.to_string()),
            investor_id: Some(investor_id.to_string()),
        }
    }

    /// Read rows from a result with `company_id`, `deal_number`, `deal_date`
    /// and `investor_id` columns.
    pub fn from_table(table: &Table) -> StoreResult<Vec<Self>> {
        let company = table.require_column("company_id")?;
        let number = table.require_column("deal_number")?;
        let date = table.require_column("deal_date")?;
        let investor = table.require_column("investor_id")?;

        table
            .rows()
            .iter()
            .map(|row| {
                let deal_number =
                    row[number]
                        .as_integer()
                        .map_err(|message| StoreError::SchemaMismatch {
                            column: "deal_number".to_string(),
                            message,
                        })?;
                Ok(Self {
                    company_id: row[company].as_key(),
                    deal_number,
                    deal_date: row[date].clone(),
                    investor_id: row[investor].as_key(),
                })
            })
            .collect()
    }
}

/// A `deal_investor` link row.
#[derive(Debug, Clone, PartialEq)]
pub struct Participation {
    pub deal_id: Option<String>,
    pub investor_id: Option<String>,
}

impl Participation {
    pub fn new(deal_id: &str, investor_id: &str) -> Self {
        Self {
            deal_id: Some(deal_id.to_string()),
            investor_id: Some(investor_id.to_string()),
        }
    }

    pub fn from_table(table: &Table) -> StoreResult<Vec<Self>> {
        let deal = table.require_column("deal_id")?;
        let investor = table.require_column("investor_id")?;

        Ok(table
            .rows()
            .iter()
            .map(|row| Self {
                deal_id: row[deal].as_key(),
                investor_id: row[investor].as_key(),
            })
            .collect())
    }
}

/// An `investors` row.
#[derive(Debug, Clone, PartialEq)]
pub struct Investor {
    pub investor_id: String,
    pub investor_name: String,
}

impl Investor {
    pub fn new(investor_id: &str, investor_name: &str) -> Self {
        Self {
            investor_id: investor_id.to_string(),
            investor_name: investor_name.to_string(),
        }
    }

    /// Rows without an investor id cannot be looked up and are dropped.
    pub fn from_table(table: &Table) -> StoreResult<Vec<Self>> {
        let id = table.require_column("investor_id")?;
        let name = table.require_column("investor_name")?;

        Ok(table
            .rows()
            .iter()
            .filter_map(|row| {
                row[id].as_key().map(|investor_id| Self {
                    investor_id,
                    investor_name: row[name].to_string(),
                })
            })
            .collect())
    }
}

// =============================================================================
// Investor Directory
// =============================================================================

/// Investor id to name lookup that remembers the table order.
///
/// When an id repeats, the later row wins the lookup, but every row stays in
/// [`InvestorDirectory::names`].
#[derive(Debug, Clone, Default)]
pub struct InvestorDirectory {
    investors: Vec<Investor>,
    by_id: HashMap<String, usize>,
}

impl InvestorDirectory {
    pub fn new(investors: Vec<Investor>) -> Self {
        let by_id = investors
            .iter()
            .enumerate()
            .map(|(i, investor)| (investor.investor_id.clone(), i))
            .collect();
        Self { investors, by_id }
    }

    /// Name of an investor, or [`AnalysisError::UnknownInvestor`].
    pub fn name_of(&self, investor_id: &str) -> AnalysisResult<&str> {
        self.by_id
            .get(investor_id)
            .map(|&i| self.investors[i].investor_name.as_str())
            .ok_or_else(|| AnalysisError::UnknownInvestor {
                investor_id: investor_id.to_string(),
            })
    }

    /// Investor names in table order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.investors.iter().map(|i| i.investor_name.as_str())
    }

    pub fn len(&self) -> usize {
        self.investors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.investors.is_empty()
    }
}

// =============================================================================
// Derived results
// =============================================================================

/// Investors of a company's earliest deal(s).
#[derive(Debug, Clone, PartialEq)]
pub struct SeedInfo {
    pub company_id: String,
    /// Earliest date among the seed deals, [`Cell::Null`] when none is known
    pub seed_date: Cell,
    pub investor_ids: Vec<String>,
    pub investor_names: Vec<String>,
}

/// Rendered on the diagonal of the co-investment report.
pub const DIAGONAL_MARKER: &str = "-";

/// One value of the co-investment matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixCell {
    /// An investor against itself
    Diagonal,
    /// Number of deals both investors took part in
    Count(usize),
}

impl fmt::Display for MatrixCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixCell::Diagonal => f.write_str(DIAGONAL_MARKER),
            MatrixCell::Count(n) => write!(f, "{}", n),
        }
    }
}

/// Square matrix of shared deal counts, rows and columns in the same order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoInvestmentMatrix {
    investors: Vec<String>,
    cells: Vec<Vec<MatrixCell>>,
}

impl CoInvestmentMatrix {
    pub(crate) fn new(investors: Vec<String>, cells: Vec<Vec<MatrixCell>>) -> Self {
        debug_assert_eq!(investors.len(), cells.len());
        Self { investors, cells }
    }

    /// Row/column labels.
    pub fn investors(&self) -> &[String] {
        &self.investors
    }

    /// Rows paired with their label.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[MatrixCell])> {
        self.investors
            .iter()
            .map(String::as_str)
            .zip(self.cells.iter().map(Vec::as_slice))
    }

    pub fn get(&self, row: usize, column: usize) -> Option<MatrixCell> {
        self.cells.get(row).and_then(|r| r.get(column)).copied()
    }

    /// Cell for two investor names (first occurrence of each).
    pub fn between(&self, a: &str, b: &str) -> Option<MatrixCell> {
        let row = self.investors.iter().position(|n| n == a)?;
        let column = self.investors.iter().position(|n| n == b)?;
        self.get(row, column)
    }

    pub fn len(&self) -> usize {
        self.investors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.investors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_seed_rows_from_query_result() {
        let table = Table::new(
            columns(&["company_id", "deal_number", "deal_date", "investor_id"]),
            vec![
                vec![
                    Cell::Text("C1".into()),
                    Cell::Integer(1),
                    Cell::Text("2020-01-01".into()),
                    Cell::Text("I1".into()),
                ],
                vec![Cell::Integer(7), Cell::Null, Cell::Null, Cell::Text("I2".into())],
            ],
        );

        let rows = SeedRow::from_table(&table).unwrap();
        assert_eq!(rows[0], SeedRow::new("C1", 1, "2020-01-01", "I1"));
        assert_eq!(rows[1].company_id.as_deref(), Some("7"));
        assert_eq!(rows[1].deal_number, None);
        assert_eq!(rows[1].deal_date, Cell::Null);
    }

    #[test]
    fn test_seed_rows_reject_non_numeric_deal_number() {
        let table = Table::new(
            columns(&["company_id", "deal_number", "deal_date", "investor_id"]),
            vec![vec![
                Cell::Text("C1".into()),
                Cell::Text("first".into()),
                Cell::Null,
                Cell::Text("I1".into()),
            ]],
        );

        let err = SeedRow::from_table(&table).unwrap_err();
        assert!(matches!(err, StoreError::SchemaMismatch { ref column, .. } if column == "deal_number"));
    }

    #[test]
    fn test_participations_require_columns() {
        let table = Table::new(columns(&["deal_id"]), vec![]);
        assert!(Participation::from_table(&table).is_err());
    }

    #[test]
    fn test_directory_lookup_and_order() {
        let directory = InvestorDirectory::new(vec![
            Investor::new("I2", "Beta"),
            Investor::new("I1", "Alpha"),
            Investor::new("I2", "Beta Capital"),
        ]);

        assert_eq!(directory.name_of("I1").unwrap(), "Alpha");
        assert_eq!(directory.name_of("I2").unwrap(), "Beta Capital");
        assert_eq!(
            directory.names().collect::<Vec<_>>(),
            vec!["Beta", "Alpha", "Beta Capital"]
        );
        assert_eq!(
            directory.name_of("I3"),
            Err(AnalysisError::UnknownInvestor { investor_id: "I3".into() })
        );
    }

    #[test]
    fn test_investors_without_id_are_dropped() {
        let table = Table::new(
            columns(&["investor_id", "investor_name"]),
            vec![
                vec![Cell::Null, Cell::Text("Ghost".into())],
                vec![Cell::Integer(5), Cell::Text("Five".into())],
            ],
        );

        let investors = Investor::from_table(&table).unwrap();
        assert_eq!(investors, vec![Investor::new("5", "Five")]);
    }

    #[test]
    fn test_matrix_cell_display() {
        assert_eq!(MatrixCell::Diagonal.to_string(), "-");
        assert_eq!(MatrixCell::Count(0).to_string(), "0");
        assert_eq!(MatrixCell::Count(12).to_string(), "12");
    }
}
