//! CSV reports.
//!
//! Fields are joined as-is: an investor id or name containing `,` or `;`
//! produces a line that does not split back into the same fields. Consumers
//! of these files depend on the unquoted format, so no escaping is applied.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{ReportError, ReportResult};
use crate::models::{CoInvestmentMatrix, SeedInfo};

/// File name of the seed investors report.
pub const SEED_REPORT_FILE: &str = "case_study_output1.csv";

/// File name of the co-investment report.
pub const CO_INVESTMENT_REPORT_FILE: &str = "case_study_output2.csv";

/// Header line of the seed investors report.
pub const SEED_REPORT_HEADER: &str = "Company ID,Seed Date,Seed Investor IDs,Seed Investors";

/// Separator between investors inside one seed report field.
pub const LIST_SEPARATOR: &str = ";";

/// Write the seed report: header, then
/// `company_id,seed_date,id1;id2,name1;name2` per company.
pub fn write_seed_report_to<W: Write>(out: &mut W, seeds: &[SeedInfo]) -> std::io::Result<()> {
    writeln!(out, "{}", SEED_REPORT_HEADER)?;
    for seed in seeds {
        writeln!(
            out,
            "{},{},{},{}",
            seed.company_id,
            seed.seed_date,
            seed.investor_ids.join(LIST_SEPARATOR),
            seed.investor_names.join(LIST_SEPARATOR)
        )?;
    }
    Ok(())
}

/// Write the co-investment matrix: a header of investor names after an
/// empty corner cell, then one row per investor.
pub fn write_co_investment_report_to<W: Write>(
    out: &mut W,
    matrix: &CoInvestmentMatrix,
) -> std::io::Result<()> {
    let mut header = vec![""];
    header.extend(matrix.investors().iter().map(String::as_str));
    writeln!(out, "{}", header.join(","))?;

    for (name, cells) in matrix.rows() {
        let mut line = vec![name.to_string()];
        line.extend(cells.iter().map(ToString::to_string));
        writeln!(out, "{}", line.join(","))?;
    }
    Ok(())
}

pub fn render_seed_report(seeds: &[SeedInfo]) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail
    let _ = write_seed_report_to(&mut buf, seeds);
    String::from_utf8_lossy(&buf).into_owned()
}

pub fn render_co_investment_report(matrix: &CoInvestmentMatrix) -> String {
    let mut buf = Vec::new();
    let _ = write_co_investment_report_to(&mut buf, matrix);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Create or truncate `path` and write the seed report into it.
pub fn write_seed_report(path: &Path, seeds: &[SeedInfo]) -> ReportResult<()> {
    write_file(path, |out| write_seed_report_to(out, seeds))
}

/// Create or truncate `path` and write the co-investment report into it.
pub fn write_co_investment_report(path: &Path, matrix: &CoInvestmentMatrix) -> ReportResult<()> {
    write_file(path, |out| write_co_investment_report_to(out, matrix))
}

fn write_file(
    path: &Path,
    body: impl FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
) -> ReportResult<()> {
    let io_error = |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_error)?;
    let mut out = BufWriter::new(file);
    body(&mut out).map_err(io_error)?;
    out.flush().map_err(io_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cell, InvestorDirectory, Investor, Participation};
    use crate::transform::co_investment_matrix;
    use std::fs;
    use tempfile::TempDir;

    fn seed(company: &str, date: &str, ids: &[&str], names: &[&str]) -> SeedInfo {
        SeedInfo {
            company_id: company.to_string(),
            seed_date: Cell::Text(date.to_string()),
            investor_ids: ids.iter().map(|s| s.to_string()).collect(),
            investor_names: names.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn matrix() -> CoInvestmentMatrix {
        let directory = InvestorDirectory::new(vec![
            Investor::new("IA", "A"),
            Investor::new("IB", "B"),
            Investor::new("IC", "C"),
        ]);
        let rows: Vec<Participation> = [("1", "IA"), ("2", "IA"), ("2", "IB"), ("3", "IC")]
            .iter()
            .map(|(deal, investor)| Participation::new(deal, investor))
            .collect();
        co_investment_matrix(&rows, &directory).unwrap().matrix
    }

    #[test]
    fn test_seed_report_format() {
        let seeds = vec![
            seed("C1", "2020-01-01", &["I1", "I2"], &["Alpha", "Beta"]),
            SeedInfo {
                seed_date: Cell::Null,
                ..seed("C2", "", &["I3"], &["Gamma"])
            },
        ];

        assert_eq!(
            render_seed_report(&seeds),
            "Company ID,Seed Date,Seed Investor IDs,Seed Investors\n\
             C1,2020-01-01,I1;I2,Alpha;Beta\n\
             C2,,I3,Gamma\n"
        );
    }

    #[test]
    fn test_numeric_seed_date_is_written_verbatim() {
        let seeds = vec![SeedInfo {
            seed_date: Cell::Integer(20200101),
            ..seed("C1", "", &["I1"], &["Alpha"])
        }];

        assert!(render_seed_report(&seeds).ends_with("C1,20200101,I1,Alpha\n"));
    }

    #[test]
    fn test_empty_seed_report_has_header_only() {
        assert_eq!(render_seed_report(&[]), format!("{}\n", SEED_REPORT_HEADER));
    }

    #[test]
    fn test_co_investment_report_format() {
        assert_eq!(
            render_co_investment_report(&matrix()),
            ",A,B,C\n\
             A,-,1,0\n\
             B,1,-,0\n\
             C,0,0,-\n"
        );
    }

    #[test]
    fn test_names_are_not_escaped() {
        let seeds = vec![seed("C1", "2020-01-01", &["I1"], &["Smith, Jones & Co"])];
        let report = render_seed_report(&seeds);

        assert!(report.ends_with("C1,2020-01-01,I1,Smith, Jones & Co\n"));
    }

    #[test]
    fn test_seed_report_round_trip() {
        let seeds = vec![
            seed("C1", "2020-01-01", &["I1", "I2", "I1"], &["Alpha", "Beta", "Alpha"]),
            seed("C2", "2021-07-15", &["I9"], &["Omega Fund"]),
        ];

        let report = render_seed_report(&seeds);
        let parsed: Vec<Vec<String>> = report
            .lines()
            .skip(1)
            .map(|line| {
                let fields: Vec<&str> = line.split(',').collect();
                fields[2].split(LIST_SEPARATOR).map(str::to_string).collect()
            })
            .collect();

        assert_eq!(parsed[0], seeds[0].investor_ids);
        assert_eq!(parsed[1], seeds[1].investor_ids);
    }

    #[test]
    fn test_write_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SEED_REPORT_FILE);
        fs::write(&path, "stale content that is longer than the new report\n".repeat(10)).unwrap();

        write_seed_report(&path, &[seed("C1", "2020-01-01", &["I1"], &["Alpha"])]).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            format!("{}\nC1,2020-01-01,I1,Alpha\n", SEED_REPORT_HEADER)
        );
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join(CO_INVESTMENT_REPORT_FILE);

        let err = write_co_investment_report(&path, &matrix()).unwrap_err();
        assert!(err.to_string().contains(CO_INVESTMENT_REPORT_FILE));
    }
}
