//! Report generation module - result model, aggregation and export.
//!
//! This module handles:
//! - The tabular result model shared by all modes
//! - Status tallies, mismatch entries and the audit report
//! - Printing result tables to the console
//! - Export to CSV and JSON files
//!
//! Console rendering details live in the console_format module.
//!
//! # Module Organization
//!
//! - `types` - Cell, ResultTable, StatusTally, MismatchEntry, AuditReport
//! - `table` - Plain and pretty console output
//! - `export` - CSV and JSON files in the results directory

mod export;
mod table;
mod types;

// Re-export types
pub use types::{AuditReport, Cell, MismatchEntry, ResultTable, StatusTally, format_mismatches};

// Re-export table functions
pub use table::{print_plain, print_pretty};

// Re-export export functions
pub use export::{export_csv, export_json, results_file_path};
