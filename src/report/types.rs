//! Report type definitions.
//!
//! This module defines the tabular result model shared by every mode, plus
//! the aggregation types the PEP audit folds its rows into.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use url::Url;

/// One cell of a result table: free text or a count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Count(usize),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Count(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<usize> for Cell {
    fn from(n: usize) -> Self {
        Cell::Count(n)
    }
}

/// Header row plus data rows, in output order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultTable {
    pub header: Vec<Cell>,
    pub rows: Vec<Vec<Cell>>,
}

impl ResultTable {
    pub fn new(header: &[&str]) -> Self {
        Self { header: header.iter().map(|h| Cell::from(*h)).collect(), rows: Vec::new() }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    /// Header followed by every data row.
    pub fn lines(&self) -> impl Iterator<Item = &Vec<Cell>> {
        std::iter::once(&self.header).chain(self.rows.iter())
    }
}

/// Status counts, ordered by first occurrence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusTally {
    counts: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl StatusTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, status: &str) {
        match self.index.get(status) {
            Some(&i) => self.counts[i].1 += 1,
            None => {
                self.index.insert(status.to_string(), self.counts.len());
                self.counts.push((status.to_string(), 1));
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(s, n)| (s.as_str(), *n))
    }
}

/// A PEP whose detail page status is outside the set its index marker allows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MismatchEntry {
    pub url: Url,
    pub actual_status: String,
    pub expected_statuses: Vec<String>,
}

/// Consolidated message listing every mismatch.
pub fn format_mismatches(entries: &[MismatchEntry]) -> String {
    let mut message = String::from("Mismatched statuses:");
    for entry in entries {
        message.push_str(&format!(
            "\n{}\nStatus on page: {}\nExpected statuses: {}",
            entry.url,
            entry.actual_status,
            format_expected(&entry.expected_statuses)
        ));
    }
    message
}

fn format_expected(statuses: &[String]) -> String {
    let quoted: Vec<String> = statuses.iter().map(|s| format!("{:?}", s)).collect();
    format!("[{}]", quoted.join(", "))
}

/// Final PEP audit result: header, one row per status, trailing total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    rows: Vec<(String, Cell)>,
}

impl AuditReport {
    pub const HEADER: (&'static str, &'static str) = ("Status", "Count");
    pub const TOTAL_LABEL: &'static str = "Total";

    pub fn from_tally(tally: &StatusTally) -> Self {
        let mut rows = vec![(Self::HEADER.0.to_string(), Cell::from(Self::HEADER.1))];
        let mut total = 0;
        for (status, count) in tally.iter() {
            rows.push((status.to_string(), Cell::Count(count)));
            total += count;
        }
        rows.push((Self::TOTAL_LABEL.to_string(), Cell::Count(total)));
        Self { rows }
    }

    /// Every row, header and total included.
    pub fn rows(&self) -> &[(String, Cell)] {
        &self.rows
    }

    /// Status rows only, without header and total.
    pub fn status_rows(&self) -> &[(String, Cell)] {
        let rows = self.rows();
        &rows[1..rows.len() - 1]
    }

    pub fn total(&self) -> usize {
        match self.rows().last() {
            Some((_, Cell::Count(n))) => *n,
            _ => 0,
        }
    }

    pub fn into_table(self) -> ResultTable {
        let mut rows = self.rows.into_iter();
        let header = match rows.next() {
            Some((label, value)) => vec![Cell::Text(label), value],
            None => Vec::new(),
        };
        ResultTable { header, rows: rows.map(|(label, value)| vec![Cell::Text(label), value]).collect() }
    }
}
