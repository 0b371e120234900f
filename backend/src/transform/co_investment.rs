//! Investor by investor co-investment counts.
//!
//! Each investor's participations collapse into a set of deal ids; the cell
//! for two different investors is the size of the intersection of their
//! sets. Rows and columns follow the investor table order, restricted to
//! investors with at least one participation.

use std::collections::{HashMap, HashSet};

use crate::error::AnalysisResult;
use crate::models::{CoInvestmentMatrix, InvestorDirectory, MatrixCell, Participation};

/// Matrix plus the data-quality findings of one analysis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoInvestmentAnalysis {
    pub matrix: CoInvestmentMatrix,
    /// Names carried by more than one participating investor id; only the
    /// deal set of the greatest id is kept
    pub shared_names: Vec<String>,
    /// Rows dropped because their investor id is null
    pub rows_without_investor: usize,
}

impl CoInvestmentAnalysis {
    /// Data-quality warnings to report for this analysis.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.rows_without_investor > 0 {
            warnings.push(format!(
                "{} participations skipped: no investor id",
                self.rows_without_investor
            ));
        }
        if !self.shared_names.is_empty() {
            warnings.push(format!(
                "Investor names shared by several ids, greatest id's deals kept: {}",
                self.shared_names.join(", ")
            ));
        }
        warnings
    }
}

/// Build the co-investment matrix from `deal_investor` rows.
pub fn co_investment_matrix(
    rows: &[Participation],
    directory: &InvestorDirectory,
) -> AnalysisResult<CoInvestmentAnalysis> {
    let (mut by_investor, rows_without_investor) = deals_by_investor(rows);
    // Ids sharing a name: the greatest id's deal set stands for the name
    by_investor.sort_by(|a, b| a.0.cmp(b.0));

    let mut by_name: HashMap<&str, HashSet<&str>> = HashMap::with_capacity(by_investor.len());
    let mut shared_names: Vec<String> = Vec::new();
    for (investor_id, deals) in by_investor {
        let name = directory.name_of(investor_id)?;
        if by_name.insert(name, deals).is_some() && !shared_names.iter().any(|n| n == name) {
            shared_names.push(name.to_string());
        }
    }

    let participants: Vec<(&str, &HashSet<&str>)> = directory
        .names()
        .filter_map(|name| by_name.get(name).map(|deals| (name, deals)))
        .collect();

    let cells: Vec<Vec<MatrixCell>> = participants
        .iter()
        .map(|(row_name, row_deals)| {
            participants
                .iter()
                .map(|(column_name, column_deals)| {
                    if row_name == column_name {
                        MatrixCell::Diagonal
                    } else {
                        MatrixCell::Count(row_deals.intersection(column_deals).count())
                    }
                })
                .collect()
        })
        .collect();

    let investors: Vec<String> = participants.iter().map(|(name, _)| name.to_string()).collect();

    Ok(CoInvestmentAnalysis {
        matrix: CoInvestmentMatrix::new(investors, cells),
        shared_names,
        rows_without_investor,
    })
}

/// Deal-id set per investor id, in first-appearance order, and the number
/// of rows without an investor id. Null deal ids are not added to the sets.
fn deals_by_investor(rows: &[Participation]) -> (Vec<(&str, HashSet<&str>)>, usize) {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, HashSet<&str>)> = Vec::new();
    let mut without_investor = 0;

    for row in rows {
        let Some(investor_id) = row.investor_id.as_deref() else {
            without_investor += 1;
            continue;
        };
        let slot = *index.entry(investor_id).or_insert_with(|| {
            groups.push((investor_id, HashSet::new()));
            groups.len() - 1
        });
        if let Some(deal_id) = row.deal_id.as_deref() {
            groups[slot].1.insert(deal_id);
        }
    }

    (groups, without_investor)
}
