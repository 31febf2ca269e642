/// Run observers
///
/// This module handles:
/// - The `CrawlObserver` interface the modes report through
/// - A console observer (log records + progress bar + run log file)
/// - A recording observer for tests
///
/// Observers never feed back into a run: every callback returns `()`.
use crate::error::{ParserError, ParserResult};
use crate::report::{MismatchEntry, format_mismatches};
use fs2::FileExt;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use url::Url;

pub trait CrawlObserver {
    /// A row loop is about to visit `total` items
    fn on_start(&mut self, _total: usize) {}

    /// One item was processed (or skipped)
    fn on_item(&mut self, _url: &Url) {}

    /// All items visited
    fn on_finish(&mut self) {}

    /// Consolidated mismatch listing; only called with a non-empty slice
    fn on_mismatches(&mut self, entries: &[MismatchEntry]);

    /// A fatal error is about to abort the run
    fn on_fatal(&mut self, err: &ParserError);
}

/// Pass `result` through, showing a fatal error to the observer on the way
pub fn report_fatal<T, O: CrawlObserver + ?Sized>(observer: &mut O, result: ParserResult<T>) -> ParserResult<T> {
    if let Err(ref e) = result {
        observer.on_fatal(e);
    }
    result
}

/// Appends timestamped entries to a log file under an exclusive lock
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    pub fn new(logs_dir: &Path) -> Self {
        Self { path: logs_dir.join("pep-audit.log") }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, level: &str, message: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.lock_exclusive()?;

        let mut writer = BufWriter::new(&file);
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        writeln!(writer, "[{}] {} {}", timestamp, level, message)?;
        writer.flush()?;

        // Unlock is automatic when file goes out of scope
        Ok(())
    }
}

/// Default observer: log records, a progress bar, and the run log file
pub struct ConsoleObserver {
    progress: Option<ProgressBar>,
    show_progress: bool,
    run_log: Option<RunLog>,
}

impl ConsoleObserver {
    pub fn new(run_log: Option<RunLog>) -> Self {
        Self { progress: None, show_progress: true, run_log }
    }

    /// Disable the progress bar (e.g. when stderr is captured)
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    fn write_run_log(&self, level: &str, message: &str) {
        if let Some(ref log) = self.run_log {
            if let Err(e) = log.append(level, message) {
                eprintln!("Failed to write run log {}: {}", log.path().display(), e);
            }
        }
    }
}

impl CrawlObserver for ConsoleObserver {
    fn on_start(&mut self, total: usize) {
        if !self.show_progress {
            return;
        }
        let bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}] {msg}") {
            bar.set_style(style);
        }
        self.progress = Some(bar);
    }

    fn on_item(&mut self, url: &Url) {
        if let Some(ref bar) = self.progress {
            bar.set_message(url.path().to_string());
            bar.inc(1);
        }
    }

    fn on_finish(&mut self) {
        if let Some(bar) = self.progress.take() {
            bar.finish_and_clear();
        }
    }

    fn on_mismatches(&mut self, entries: &[MismatchEntry]) {
        let message = format_mismatches(entries);
        info!("{}", message);
        self.write_run_log("INFO", &message);
    }

    fn on_fatal(&mut self, err: &ParserError) {
        if let Some(bar) = self.progress.take() {
            bar.abandon();
        }
        error!("{}", err);
        self.write_run_log("ERROR", &err.to_string());
    }
}

/// Keeps every callback for later inspection
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub started: Vec<usize>,
    pub items: Vec<Url>,
    pub finished: usize,
    pub mismatch_reports: Vec<Vec<MismatchEntry>>,
    pub fatal: Vec<String>,
}

#[cfg(test)]
impl CrawlObserver for RecordingObserver {
    fn on_start(&mut self, total: usize) {
        self.started.push(total);
    }

    fn on_item(&mut self, url: &Url) {
        self.items.push(url.clone());
    }

    fn on_finish(&mut self) {
        self.finished += 1;
    }

    fn on_mismatches(&mut self, entries: &[MismatchEntry]) {
        self.mismatch_reports.push(entries.to_vec());
    }

    fn on_fatal(&mut self, err: &ParserError) {
        self.fatal.push(err.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_log_appends_timestamped_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = RunLog::new(&dir.path().join("logs"));
        log.append("INFO", "first").unwrap();
        log.append("ERROR", "second").unwrap();

        let content = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("] INFO first"));
        assert!(lines[1].ends_with("] ERROR second"));
    }

    #[test]
    fn test_console_observer_writes_fatal_and_mismatch_to_run_log() {
        let dir = tempfile::tempdir().unwrap();
        let mut observer = ConsoleObserver::new(Some(RunLog::new(dir.path()))).without_progress();

        observer.on_start(2);
        observer.on_item(&Url::parse("https://peps.python.org/pep-0001/").unwrap());
        observer.on_mismatches(&[MismatchEntry {
            url: Url::parse("https://peps.python.org/pep-0001/").unwrap(),
            actual_status: "Draft".to_string(),
            expected_statuses: vec!["Final".to_string()],
        }]);
        observer.on_fatal(&ParserError::UnknownStatusCode { code: "C".to_string() });
        observer.on_finish();

        let content = fs::read_to_string(dir.path().join("pep-audit.log")).unwrap();
        assert!(content.contains("INFO Mismatched statuses:"));
        assert!(content.contains("Status on page: Draft"));
        assert!(content.contains("ERROR Unknown PEP status code: \"C\""));
    }
}
