//! Report export functions for CSV and JSON formats.
//!
//! Files land in the results directory, named after the mode and the
//! local time of the run.

use super::types::ResultTable;
use chrono::{DateTime, Local};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const DATETIME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Build `<dir>/<mode>_<timestamp>.<ext>`.
pub fn results_file_path(results_dir: &Path, mode: &str, extension: &str, now: &DateTime<Local>) -> PathBuf {
    results_dir.join(format!("{}_{}.{}", mode, now.format(DATETIME_FORMAT), extension))
}

/// Quote a CSV field when it holds a delimiter, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render a table as CSV, header first.
pub fn to_csv_string(table: &ResultTable) -> String {
    let mut out = String::new();
    for row in table.lines() {
        let fields: Vec<String> = row.iter().map(|c| csv_field(&c.to_string())).collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

/// Export a table as CSV.
///
/// # Arguments
/// * `table` - Rows to write, header included
/// * `output_path` - Path to write the CSV file; parent directories are created
pub fn export_csv(table: &ResultTable, output_path: &Path) -> std::io::Result<()> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = BufWriter::new(File::create(output_path)?);
    file.write_all(to_csv_string(table).as_bytes())?;
    file.flush()
}

/// Export a table as a JSON array of row arrays, header first.
pub fn export_json(table: &ResultTable, output_path: &Path) -> std::io::Result<()> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let lines: Vec<_> = table.lines().collect();
    let file = File::create(output_path)?;
    serde_json::to_writer_pretty(file, &lines)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Cell;
    use chrono::TimeZone;

    fn sample() -> ResultTable {
        let mut table = ResultTable::new(&["Article link", "Title", "Editor, author"]);
        table.push_row(vec![
            Cell::from("https://docs.python.org/3/whatsnew/3.12.html"),
            Cell::from("What's New In Python 3.12"),
            Cell::from("Editor: Adam \"Tony\" Turner"),
        ]);
        table
    }

    #[test]
    fn test_csv_quotes_only_when_needed() {
        assert_eq!(
            to_csv_string(&sample()),
            "Article link,Title,\"Editor, author\"\n\
             https://docs.python.org/3/whatsnew/3.12.html,What's New In Python 3.12,\"Editor: Adam \"\"Tony\"\" Turner\"\n"
        );
    }

    #[test]
    fn test_results_file_path_format() {
        let now = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let path = results_file_path(Path::new("results"), "pep", "csv", &now);
        assert_eq!(path, PathBuf::from("results/pep_2024-03-09_14-05-07.csv"));
    }

    #[test]
    fn test_export_csv_creates_results_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results").join("whats-new.csv");
        export_csv(&sample(), &path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Article link,Title,"));
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_export_json_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pep.json");
        let mut table = ResultTable::new(&["Status", "Count"]);
        table.push_row(vec![Cell::from("Total"), Cell::Count(0)]);
        export_json(&table, &path).unwrap();

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value, serde_json::json!([["Status", "Count"], ["Total", 0]]));
    }
}
