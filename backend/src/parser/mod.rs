//! Pipe-delimited file loader with explicit or detected encoding.
//!
//! Reads raw bytes, decodes them with `encoding_rs` and parses the text with
//! the `csv` crate into a typed [`Table`].

use std::path::{Path, PathBuf};

use encoding_rs::Encoding;

use crate::error::{LoadError, LoadResult};
use crate::models::Table;

/// Field separator of every input file.
pub const DELIMITER: u8 = b'|';

/// Encoding label that asks for detection instead of a fixed encoding.
pub const AUTO_ENCODING: &str = "auto";

/// A loaded file with metadata
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub path: PathBuf,
    /// Encoding actually used to decode the bytes
    pub encoding: String,
    pub table: Table,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        "utf-16le" | "utf-16" => "utf-16le".to_string(),
        "utf-16be" => "utf-16be".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes with an encoding label (`utf8`, `utf-16`, `latin1`, ... or `auto`).
///
/// A byte order mark overrides the label. Malformed input is an error, never
/// replaced silently. Returns the text and the name of the encoding used.
pub fn decode_content(bytes: &[u8], label: &str, path: &Path) -> LoadResult<(String, String)> {
    let label = if label.trim().eq_ignore_ascii_case(AUTO_ENCODING) {
        detect_encoding(bytes)
    } else {
        label.trim().to_string()
    };

    let encoding = Encoding::for_label(label.as_bytes()).ok_or_else(|| LoadError::UnknownEncoding {
        path: path.to_path_buf(),
        label: label.clone(),
    })?;

    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(LoadError::Encoding {
            path: path.to_path_buf(),
            message: format!("invalid {} byte sequence", used.name()),
        });
    }

    Ok((text.into_owned(), used.name().to_string()))
}

/// Parse delimited text with a header row into a [`Table`].
///
/// Blank lines are skipped, short rows are padded with nulls and extra
/// fields are ignored.
pub fn parse_delimited(content: &str, delimiter: u8, path: &Path) -> LoadResult<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| parse_error(path, &e))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.iter().all(String::is_empty) {
        return Err(LoadError::EmptyFile {
            path: path.to_path_buf(),
        });
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| parse_error(path, &e))?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        records.push(record.iter().map(str::to_string).collect());
    }

    Ok(Table::from_text_records(headers, records))
}

fn parse_error(path: &Path, err: &csv::Error) -> LoadError {
    LoadError::Parse {
        path: path.to_path_buf(),
        line: err.position().map(|p| p.line()).unwrap_or(0),
        message: err.to_string(),
    }
}

/// Read, decode and parse one pipe-delimited file, checking that every
/// `required` column is present.
pub fn load_table(path: &Path, encoding: &str, required: &[&str]) -> LoadResult<LoadedTable> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;

    let (content, used) = decode_content(&bytes, encoding, path)?;
    let table = parse_delimited(&content, DELIMITER, path)?;

    if let Some(column) = required.iter().find(|c| table.column_index(c).is_none()) {
        return Err(LoadError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        });
    }

    Ok(LoadedTable {
        path: path.to_path_buf(),
        encoding: used,
        table,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Cell;
    use std::fs;
    use tempfile::TempDir;

    fn utf16le_with_bom(text: &str) -> Vec<u8> {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn test_parse_pipe_delimited() {
        let content = "deal_id|investor_id\nD1|I1\n\nD2|I2\n";
        let table = parse_delimited(content, DELIMITER, Path::new("mem")).unwrap();

        assert_eq!(table.columns(), &["deal_id".to_string(), "investor_id".to_string()]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1][0], Cell::Text("D2".into()));
    }

    #[test]
    fn test_quoted_field_keeps_delimiter() {
        let content = "investor_id|investor_name\n1|\"Smith | Partners\"\n";
        let table = parse_delimited(content, DELIMITER, Path::new("mem")).unwrap();

        assert_eq!(table.rows()[0][0], Cell::Integer(1));
        assert_eq!(table.rows()[0][1], Cell::Text("Smith | Partners".into()));
    }

    #[test]
    fn test_missing_values_and_extra_fields() {
        let content = "a|b|c\n1||3|4\n2\n";
        let table = parse_delimited(content, DELIMITER, Path::new("mem")).unwrap();

        assert_eq!(table.rows()[0], vec![Cell::Integer(1), Cell::Null, Cell::Integer(3)]);
        assert_eq!(table.rows()[1], vec![Cell::Integer(2), Cell::Null, Cell::Null]);
    }

    #[test]
    fn test_empty_content_is_an_error() {
        let err = parse_delimited("", DELIMITER, Path::new("empty.dat")).unwrap_err();
        assert!(matches!(err, LoadError::EmptyFile { .. }));
    }

    #[test]
    fn test_decode_utf16_with_bom() {
        let bytes = utf16le_with_bom("deal_id|investor_id\nD1|Société\n");
        let (text, used) = decode_content(&bytes, "utf-16", Path::new("rel.dat")).unwrap();

        assert_eq!(used, "UTF-16LE");
        assert!(text.starts_with("deal_id|investor_id"));
        assert!(text.contains("Société"));
    }

    #[test]
    fn test_invalid_utf8_is_an_encoding_error() {
        let bytes: &[u8] = &[b'a', b'|', 0xFF, 0xFE, 0xFD, b'\n'];
        let err = decode_content(bytes, "utf8", Path::new("bad.dat")).unwrap_err();
        assert!(matches!(err, LoadError::Encoding { .. }));
    }

    #[test]
    fn test_unknown_encoding_label() {
        let err = decode_content(b"a|b", "klingon", Path::new("x.dat")).unwrap_err();
        assert!(matches!(err, LoadError::UnknownEncoding { ref label, .. } if label == "klingon"));
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let (decoded, _) = decode_content(bytes, "latin1", Path::new("l1.dat")).unwrap();
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_auto_detects_plain_ascii() {
        let (text, used) = decode_content(b"a|b\n1|2\n", AUTO_ENCODING, Path::new("a.dat")).unwrap();
        assert_eq!(used, "UTF-8");
        assert_eq!(text, "a|b\n1|2\n");
    }

    #[test]
    fn test_load_table_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_table(&dir.path().join("deals.dat"), "utf8", &[]).unwrap_err();
        assert!(matches!(err, LoadError::FileAccess { .. }));
        assert!(err.to_string().contains("deals.dat"));
    }

    #[test]
    fn test_load_table_checks_required_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("investors.dat");
        fs::write(&path, "investor_id|name\nI1|Alpha\n").unwrap();

        let err = load_table(&path, "utf8", &["investor_id", "investor_name"]).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { ref column, .. } if column == "investor_name"));
    }

    #[test]
    fn test_load_table_utf16_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deal_investor_relation.dat");
        fs::write(&path, utf16le_with_bom("deal_id|investor_id\nD1|I1\nD1|I2\n")).unwrap();

        let loaded = load_table(&path, "utf-16", &["deal_id", "investor_id"]).unwrap();
        assert_eq!(loaded.encoding, "UTF-16LE");
        assert_eq!(loaded.table.len(), 2);
    }
}
