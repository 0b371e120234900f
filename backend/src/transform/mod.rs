//! Transformation module.
//!
//! This module turns stored rows into report data:
//! - Seed: seed deal investors per company
//! - Co-investment: investor by investor shared deal counts
//! - Pipeline: load, store, analyse and report in one run

pub mod co_investment;
pub mod pipeline;
pub mod seed;

pub use co_investment::{co_investment_matrix, CoInvestmentAnalysis};
pub use pipeline::*;
pub use seed::{seed_investors, SeedAnalysis};
