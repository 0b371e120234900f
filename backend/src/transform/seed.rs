//! Seed investors per company.
//!
//! # Algorithm
//!
//! ```text
//! rows (company, deal_number, date, investor)      SeedInfo per company
//! ┌──────────────────────────────┐                 ┌─────────────────────────────┐
//! │ C1, 1, 2020-01-02, I2        │                 │ C1  2020-01-01  I2;I1       │
//! │ C1, 2, 2020-05-01, I3        │  ──group──▶     ├─────────────────────────────┤
//! │ C1, 1, 2020-01-01, I1        │  ──min #──▶     │ C2  2021-03-01  I3          │
//! │ C2, 4, 2021-03-01, I3        │                 └─────────────────────────────┘
//! └──────────────────────────────┘
//! ```
//!
//! Every row sharing the minimum deal number is kept, so tied seed deals
//! contribute all of their investors and the earliest of their dates.

use std::collections::HashMap;

use crate::error::{AnalysisError, AnalysisResult};
use crate::models::{Cell, InvestorDirectory, SeedInfo, SeedRow};

/// Seed investors plus the data-quality findings of one analysis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedAnalysis {
    /// One entry per company, in order of first appearance
    pub seeds: Vec<SeedInfo>,
    /// Companies whose deal numbers are all null
    pub skipped_companies: Vec<String>,
    /// Rows dropped because their company id is null
    pub rows_without_company: usize,
}

impl SeedAnalysis {
    /// Data-quality warnings to report for this analysis.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.rows_without_company > 0 {
            warnings.push(format!(
                "{} participations skipped: deal has no company id",
                self.rows_without_company
            ));
        }
        if !self.skipped_companies.is_empty() {
            warnings.push(format!(
                "{} companies skipped: no deal number ({})",
                self.skipped_companies.len(),
                self.skipped_companies.join(", ")
            ));
        }
        warnings
    }
}

/// Compute the seed deal investors of every company.
///
/// Fails with [`AnalysisError::UnknownInvestor`] when a seed row names an
/// investor the directory does not know.
pub fn seed_investors(rows: &[SeedRow], directory: &InvestorDirectory) -> AnalysisResult<SeedAnalysis> {
    let (groups, rows_without_company) = group_by_company(rows);
    let mut analysis = SeedAnalysis {
        seeds: Vec::with_capacity(groups.len()),
        rows_without_company,
        ..SeedAnalysis::default()
    };

    for (company_id, group) in groups {
        let Some(min_deal_number) = group.iter().filter_map(|row| row.deal_number).min() else {
            analysis.skipped_companies.push(company_id.to_string());
            continue;
        };

        let seed_rows: Vec<&SeedRow> = group
            .into_iter()
            .filter(|row| row.deal_number == Some(min_deal_number))
            .collect();
        if seed_rows.is_empty() {
            continue;
        }

        let seed_date = seed_rows
            .iter()
            .map(|row| &row.deal_date)
            .filter(|date| !date.is_null())
            .min_by(|a, b| a.compare(b))
            .cloned()
            .unwrap_or(Cell::Null);

        let mut investor_ids = Vec::with_capacity(seed_rows.len());
        let mut investor_names = Vec::with_capacity(seed_rows.len());
        for row in &seed_rows {
            let investor_id = row
                .investor_id
                .as_deref()
                .ok_or_else(|| AnalysisError::MissingInvestorId {
                    company_id: company_id.to_string(),
                })?;
            investor_names.push(directory.name_of(investor_id)?.to_string());
            investor_ids.push(investor_id.to_string());
        }

        analysis.seeds.push(SeedInfo {
            company_id: company_id.to_string(),
            seed_date,
            investor_ids,
            investor_names,
        });
    }

    Ok(analysis)
}

/// Group rows by company id, keeping first-appearance order of companies
/// and row order within each group. Also returns how many rows had no
/// company id.
fn group_by_company(rows: &[SeedRow]) -> (Vec<(&str, Vec<&SeedRow>)>, usize) {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&SeedRow>)> = Vec::new();
    let mut without_company = 0;

    for row in rows {
        let Some(company_id) = row.company_id.as_deref() else {
            without_company += 1;
            continue;
        };
        let slot = *index.entry(company_id).or_insert_with(|| {
            groups.push((company_id, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(row);
    }

    (groups, without_company)
}
