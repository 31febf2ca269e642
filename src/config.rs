/// Configuration resolution module
///
/// This module handles:
/// - Site URLs and the row ceiling
/// - The expected status table (built-in default or TOML override)
/// - Building an AppConfig from CLI arguments
use crate::cli::CliArgs;
use crate::error::{ParserError, ParserResult};
use log::debug;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

pub const MAIN_DOC_URL: &str = "https://docs.python.org/3/";
pub const PEP_LIST_URL: &str = "https://peps.python.org/";

/// Upper bound on index rows visited in one audit
pub const PEP_MAX_LIMIT: usize = 1000;

/// Status code -> acceptable statuses, as shown in the PEP index legend
const DEFAULT_EXPECTED_STATUS: &[(&str, &[&str])] = &[
    ("A", &["Active", "Accepted"]),
    ("D", &["Deferred"]),
    ("F", &["Final"]),
    ("P", &["Provisional"]),
    ("R", &["Rejected"]),
    ("S", &["Superseded"]),
    ("W", &["Withdrawn"]),
    ("", &["Draft", "Active"]),
];

/// Immutable mapping from index status code to the statuses a detail page may show
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectedStatusTable {
    entries: BTreeMap<String, Vec<String>>,
}

#[derive(Deserialize)]
struct StatusTableFile {
    expected: BTreeMap<String, Vec<String>>,
}

impl ExpectedStatusTable {
    pub fn new(entries: BTreeMap<String, Vec<String>>) -> Self {
        Self { entries }
    }

    pub fn from_pairs(pairs: &[(&str, &[&str])]) -> Self {
        let entries = pairs
            .iter()
            .map(|(code, statuses)| (code.to_string(), statuses.iter().map(|s| s.to_string()).collect()))
            .collect();
        Self { entries }
    }

    /// Parse a TOML table of the form `[expected]\nA = ["Active", "Accepted"]`
    pub fn from_toml_str(content: &str) -> ParserResult<Self> {
        let file: StatusTableFile =
            toml::from_str(content).map_err(|e| ParserError::Config(format!("Invalid status table: {}", e)))?;
        Ok(Self::new(file.expected))
    }

    pub fn load(path: &Path) -> ParserResult<Self> {
        debug!("Loading expected status table from {:?}", path);
        let content = fs::read_to_string(path)
            .map_err(|e| ParserError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Acceptable statuses for `code`; `None` means the table is stale
    pub fn lookup(&self, code: &str) -> Option<&[String]> {
        self.entries.get(code).map(|v| v.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Default for ExpectedStatusTable {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_EXPECTED_STATUS)
    }
}

/// Everything a mode needs, resolved once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub main_doc_url: Url,
    pub pep_list_url: Url,
    pub row_limit: usize,
    pub expected: ExpectedStatusTable,
    pub cache_dir: PathBuf,
    pub use_cache: bool,
    pub results_dir: PathBuf,
    pub downloads_dir: PathBuf,
}

impl AppConfig {
    /// Directory holding the run log
    pub fn logs_dir(&self) -> PathBuf {
        self.cache_dir.join("logs")
    }
}

fn parse_url(raw: &str) -> ParserResult<Url> {
    Url::parse(raw).map_err(|e| ParserError::Config(format!("Invalid URL {}: {}", raw, e)))
}

/// Build a complete AppConfig from CLI arguments
pub fn build_app_config(args: &CliArgs) -> ParserResult<AppConfig> {
    debug!("Building configuration from CLI args");

    let expected = match args.status_table {
        Some(ref path) => ExpectedStatusTable::load(path)?,
        None => ExpectedStatusTable::default(),
    };
    debug!("Expected status table has {} codes", expected.len());

    let work_dir = PathBuf::from(".");

    Ok(AppConfig {
        main_doc_url: parse_url(MAIN_DOC_URL)?,
        pep_list_url: parse_url(PEP_LIST_URL)?,
        row_limit: args.limit,
        expected,
        cache_dir: args.get_cache_dir(),
        use_cache: !args.no_cache,
        results_dir: args.results_dir.clone().unwrap_or_else(|| work_dir.join("results")),
        downloads_dir: work_dir.join("downloads"),
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
