use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::PEP_MAX_LIMIT;

/// Get the default cache directory for pep-audit
/// Uses platform-specific cache directories:
/// - Linux: ~/.cache/pep-audit
/// - macOS: ~/Library/Caches/pep-audit
/// - Windows: %LOCALAPPDATA%/pep-audit
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir().map(|p| p.join("pep-audit")).unwrap_or_else(|| PathBuf::from(".pep-audit"))
}

/// What to crawl
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// List "What's New" articles with title and authors
    WhatsNew,
    /// List documentation versions and their status
    LatestVersions,
    /// Download the A4 PDF documentation archive
    Download,
    /// Audit PEP statuses against the index markers
    Pep,
}

impl Mode {
    /// Name as typed on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::WhatsNew => "whats-new",
            Mode::LatestVersions => "latest-versions",
            Mode::Download => "download",
            Mode::Pep => "pep",
        }
    }
}

/// How to present the result table
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Box-drawn table on stdout
    Pretty,
    /// CSV file in the results directory
    File,
    /// JSON file in the results directory
    Json,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "pep-audit")]
#[command(about = "Python documentation and PEP status parser")]
#[command(version)]
pub struct CliArgs {
    /// Parser mode
    #[arg(value_enum)]
    pub mode: Mode,

    /// Clear the page cache before running
    #[arg(long, short = 'c')]
    pub clear_cache: bool,

    /// Additional output format (default: plain lines on stdout)
    #[arg(long, short = 'o', value_enum)]
    pub output: Option<OutputFormat>,

    /// Maximum number of PEP index rows to audit
    #[arg(long, default_value_t = PEP_MAX_LIMIT)]
    pub limit: usize,

    /// TOML file overriding the expected status table
    #[arg(long, value_name = "PATH")]
    pub status_table: Option<PathBuf>,

    /// Directory for the page cache and run log
    /// Default: ~/.cache/pep-audit (Linux), ~/Library/Caches/pep-audit (macOS)
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Directory for file and JSON output (default: ./results)
    #[arg(long)]
    pub results_dir: Option<PathBuf>,

    /// Always go to the network; do not read or write the page cache
    #[arg(long)]
    pub no_cache: bool,

    /// Override console width for testing (default: auto-detect)
    #[arg(long, value_name = "COLUMNS")]
    pub console_width: Option<usize>,
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        CliArgs::parse()
    }

    /// Validate argument combinations
    pub fn validate(&self) -> Result<(), String> {
        if self.clear_cache && self.no_cache {
            return Err("Cannot specify both --clear-cache and --no-cache".to_string());
        }

        if self.mode == Mode::Pep && self.limit == 0 {
            return Err("--limit must be at least 1 in pep mode".to_string());
        }

        if let Some(ref path) = self.status_table {
            if !path.is_file() {
                return Err(format!("Status table {} does not exist", path.display()));
            }
        }

        Ok(())
    }

    /// Get the cache directory, using the default cache location if not specified
    pub fn get_cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(default_cache_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode_and_flags() {
        let args = CliArgs::try_parse_from(["pep-audit", "pep", "-c", "-o", "pretty"]).unwrap();
        assert_eq!(args.mode, Mode::Pep);
        assert!(args.clear_cache);
        assert_eq!(args.output, Some(OutputFormat::Pretty));
        assert_eq!(args.limit, PEP_MAX_LIMIT);
    }

    #[test]
    fn test_parse_kebab_case_modes() {
        let args = CliArgs::try_parse_from(["pep-audit", "whats-new"]).unwrap();
        assert_eq!(args.mode, Mode::WhatsNew);
        let args = CliArgs::try_parse_from(["pep-audit", "latest-versions", "--output", "file"]).unwrap();
        assert_eq!(args.mode, Mode::LatestVersions);
        assert_eq!(args.output, Some(OutputFormat::File));
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!(CliArgs::try_parse_from(["pep-audit", "peps"]).is_err());
        assert!(CliArgs::try_parse_from(["pep-audit"]).is_err());
    }

    #[test]
    fn test_validate_clear_and_no_cache_fails() {
        let args = CliArgs::try_parse_from(["pep-audit", "pep", "--clear-cache", "--no-cache"]).unwrap();
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validate_zero_limit_fails_only_for_pep() {
        let args = CliArgs::try_parse_from(["pep-audit", "pep", "--limit", "0"]).unwrap();
        assert!(args.validate().is_err());
        let args = CliArgs::try_parse_from(["pep-audit", "download", "--limit", "0"]).unwrap();
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validate_missing_status_table_fails() {
        let args =
            CliArgs::try_parse_from(["pep-audit", "pep", "--status-table", "/nonexistent/status.toml"]).unwrap();
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_mode_names_round_trip_through_clap() {
        for mode in [Mode::WhatsNew, Mode::LatestVersions, Mode::Download, Mode::Pep] {
            let args = CliArgs::try_parse_from(["pep-audit", mode.as_str()]).unwrap();
            assert_eq!(args.mode, mode);
        }
    }
}
