/// PEP status audit
///
/// This module handles:
/// - Enumerating rows of the PEP numerical index (bounded by the row limit)
/// - Resolving each row's status code against the expected status table
/// - Reading the status from each PEP page
/// - Tallying statuses and collecting mismatches
///
/// Rows are processed strictly in document order, one fetch at a time, so
/// the tally order (and therefore the report) is reproducible.
use crate::config::{AppConfig, ExpectedStatusTable};
use crate::error::{ParserError, ParserResult};
use crate::extract::{Node, Query, find_next_sibling_tag, find_tag, parse_document, resolve_href};
use crate::fetch::Fetcher;
use crate::observer::{CrawlObserver, report_fatal};
use crate::report::{AuditReport, MismatchEntry, StatusTally};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use url::Url;

/// Label of the field holding the status on a PEP page
pub const STATUS_LABEL: &str = "Status:";

lazy_static! {
    static ref PEP_HREF: Regex = Regex::new(r"^/pep-\d{4}").expect("PEP link pattern is valid");
}

/// Settings for one audit run
#[derive(Debug, Clone)]
pub struct AuditConfig {
    pub index_url: Url,
    pub row_limit: usize,
    pub expected: ExpectedStatusTable,
}

impl From<&AppConfig> for AuditConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            index_url: config.pep_list_url.clone(),
            row_limit: config.row_limit,
            expected: config.expected.clone(),
        }
    }
}

/// One index row joined with its PEP page
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub code: String,
    pub detail_url: Url,
    pub actual_status: String,
}

/// Result of a completed audit
#[derive(Debug, Clone, PartialEq)]
pub struct AuditOutcome {
    pub report: AuditReport,
    pub mismatches: Vec<MismatchEntry>,
}

/// Run the audit
///
/// Returns `Ok(None)` when the index page itself could not be fetched.
/// A missing element or an unknown status code aborts the whole run; the
/// observer sees it through `on_fatal` before the error is returned.
pub fn run_pep_audit<F, O>(fetcher: &F, config: &AuditConfig, observer: &mut O) -> ParserResult<Option<AuditOutcome>>
where
    F: Fetcher + ?Sized,
    O: CrawlObserver + ?Sized,
{
    let result = audit(fetcher, config, observer);
    report_fatal(observer, result)
}

fn audit<F, O>(fetcher: &F, config: &AuditConfig, observer: &mut O) -> ParserResult<Option<AuditOutcome>>
where
    F: Fetcher + ?Sized,
    O: CrawlObserver + ?Sized,
{
    debug!("Starting PEP audit of {} (limit {})", config.index_url, config.row_limit);

    let Some(index_page) = fetcher.get(&config.index_url) else {
        return Ok(None);
    };
    let index = parse_document(&index_page.body);

    let numerical_index = find_tag(&index.root_element(), &Query::tag("section").id("numerical-index"))?;
    let tbody = find_tag(&numerical_index, &Query::tag("tbody"))?;
    let rows = tbody.find_all(&Query::tag("tr"), Some(config.row_limit));

    debug!("Auditing {} index rows", rows.len());
    observer.on_start(rows.len());

    let mut tally = StatusTally::new();
    let mut mismatches = Vec::new();

    for row in rows {
        let (code, detail_url) = read_index_row(&row, &index_page.url)?;

        let expected = config
            .expected
            .lookup(&code)
            .ok_or_else(|| ParserError::UnknownStatusCode { code: code.clone() })?;

        let Some(detail_page) = fetcher.get(&detail_url) else {
            debug!("skipping {}: page unavailable", detail_url);
            observer.on_item(&detail_url);
            continue;
        };
        let detail = parse_document(&detail_page.body);
        let actual_status = read_status(&detail.root_element())?;

        let record = Record { code, detail_url, actual_status };
        tally.increment(&record.actual_status);

        if !expected.iter().any(|s| *s == record.actual_status) {
            debug!("{}: status {:?} not in {:?} for code {:?}", record.detail_url, record.actual_status, expected, record.code);
            mismatches.push(MismatchEntry {
                url: record.detail_url.clone(),
                actual_status: record.actual_status.clone(),
                expected_statuses: expected.to_vec(),
            });
        }

        observer.on_item(&record.detail_url);
    }

    observer.on_finish();

    if !mismatches.is_empty() {
        observer.on_mismatches(&mismatches);
    }

    let report = AuditReport::from_tally(&tally);
    debug!(
        "Audit finished: {} statuses, {} pages, {} mismatches",
        report.status_rows().len(),
        report.total(),
        mismatches.len()
    );
    Ok(Some(AuditOutcome { report, mismatches }))
}

/// Status code and PEP page URL from one index row
///
/// The marker's first character is the PEP type; the rest is the status code.
pub fn read_index_row<N: Node>(row: &N, base: &Url) -> ParserResult<(String, Url)> {
    let marker = find_tag(row, &Query::tag("abbr"))?;
    let link = find_tag(row, &Query::tag("a").attr_matches("href", PEP_HREF.clone()))?;
    let detail_url = resolve_href(&link, base)?;

    let code: String = marker.text_content().chars().skip(1).collect();
    Ok((code, detail_url))
}

fn status_label<N: Node>() -> Query<N> {
    Query::tag("dt").filter("text == \"Status:\"", |node: &N| node.text_content() == STATUS_LABEL)
}

/// Status text from a PEP page, exactly as written in the field value
pub fn read_status<N: Node>(page: &N) -> ParserResult<String> {
    let label = find_tag(page, &status_label())?;
    let value = find_next_sibling_tag(&label, &Query::tag("dd"))?;
    Ok(value.text_content())
}

#[cfg(test)]
#[path = "audit_test.rs"]
mod audit_test;
