/// Documentation crawling modes
///
/// This module handles:
/// - "What's New" article listing
/// - Documentation versions from the docs sidebar
/// - Downloading the A4 PDF documentation archive
/// - Dispatching a CLI mode to its implementation
///
/// Every mode returns `Ok(None)` when its entry page cannot be fetched and
/// reports fatal errors through the observer before returning them.
use crate::audit::{AuditConfig, run_pep_audit};
use crate::cli::Mode;
use crate::config::AppConfig;
use crate::error::{ParserError, ParserResult};
use crate::extract::{Node, Query, find_tag, join_url, parse_document, require_attribute, resolve_href};
use crate::fetch::{Fetcher, write_atomic};
use crate::observer::{CrawlObserver, report_fatal};
use crate::report::{Cell, ResultTable};
use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;
use std::path::{Path, PathBuf};
use url::Url;

pub const WHATS_NEW_HEADER: [&str; 3] = ["Article link", "Title", "Editor, author"];
pub const LATEST_VERSIONS_HEADER: [&str; 3] = ["Documentation link", "Version", "Status"];

const ALL_VERSIONS: &str = "All versions";

lazy_static! {
    static ref VERSION_LABEL: Regex =
        Regex::new(r"Python (?P<version>\d\.\d+) \((?P<status>.*)\)").expect("version label pattern is valid");
    static ref PDF_A4_HREF: Regex = Regex::new(r".+pdf-a4\.zip$").expect("archive link pattern is valid");
}

/// Run one CLI mode; `download` never produces a table
pub fn run_mode<F, O>(mode: Mode, fetcher: &F, config: &AppConfig, observer: &mut O) -> ParserResult<Option<ResultTable>>
where
    F: Fetcher + ?Sized,
    O: CrawlObserver + ?Sized,
{
    debug!("Running mode {}", mode.as_str());
    match mode {
        Mode::WhatsNew => whats_new(fetcher, &config.main_doc_url, observer),
        Mode::LatestVersions => latest_versions(fetcher, &config.main_doc_url, observer),
        Mode::Download => download(fetcher, &config.main_doc_url, &config.downloads_dir, observer).map(|_| None),
        Mode::Pep => {
            let outcome = run_pep_audit(fetcher, &AuditConfig::from(config), observer)?;
            Ok(outcome.map(|o| o.report.into_table()))
        }
    }
}

/// One row per "What's New" article: link, title, editor/author line
pub fn whats_new<F, O>(fetcher: &F, main_doc_url: &Url, observer: &mut O) -> ParserResult<Option<ResultTable>>
where
    F: Fetcher + ?Sized,
    O: CrawlObserver + ?Sized,
{
    let result = collect_whats_new(fetcher, main_doc_url, observer);
    report_fatal(observer, result)
}

fn collect_whats_new<F, O>(fetcher: &F, main_doc_url: &Url, observer: &mut O) -> ParserResult<Option<ResultTable>>
where
    F: Fetcher + ?Sized,
    O: CrawlObserver + ?Sized,
{
    let whats_new_url = join_url(main_doc_url, "whatsnew/")?;
    let Some(page) = fetcher.get(&whats_new_url) else {
        return Ok(None);
    };
    let doc = parse_document(&page.body);

    let main_section = find_tag(&doc.root_element(), &Query::tag("section").id("what-s-new-in-python"))?;
    let wrapper = find_tag(&main_section, &Query::tag("div").class("toctree-wrapper"))?;
    let sections = wrapper.find_all(&Query::tag("li").class("toctree-l1"), None);

    let mut table = ResultTable::new(&WHATS_NEW_HEADER);
    observer.on_start(sections.len());

    for section in sections {
        let link = find_tag(&section, &Query::tag("a"))?;
        let article_url = resolve_href(&link, &whats_new_url)?;

        let Some(article) = fetcher.get(&article_url) else {
            observer.on_item(&article_url);
            continue;
        };
        let article_doc = parse_document(&article.body);
        let root = article_doc.root_element();
        let title = find_tag(&root, &Query::tag("h1"))?.text_content();
        let authors = find_tag(&root, &Query::tag("dl"))?.text_content().replace('\n', " ");

        table.push_row(vec![Cell::from(article_url.to_string()), Cell::from(title), Cell::from(authors)]);
        observer.on_item(&article_url);
    }

    observer.on_finish();
    Ok(Some(table))
}

/// One row per documentation version listed in the sidebar
pub fn latest_versions<F, O>(fetcher: &F, main_doc_url: &Url, observer: &mut O) -> ParserResult<Option<ResultTable>>
where
    F: Fetcher + ?Sized,
    O: CrawlObserver + ?Sized,
{
    let result = collect_latest_versions(fetcher, main_doc_url);
    report_fatal(observer, result)
}

fn collect_latest_versions<F: Fetcher + ?Sized>(fetcher: &F, main_doc_url: &Url) -> ParserResult<Option<ResultTable>> {
    let Some(page) = fetcher.get(main_doc_url) else {
        return Ok(None);
    };
    let doc = parse_document(&page.body);

    let sidebar = find_tag(&doc.root_element(), &Query::tag("div").class("sphinxsidebarwrapper"))?;

    // Only the first list is considered; it has to be the versions list
    let list = find_tag(&sidebar, &Query::tag("ul"))?;
    let list_text = list.text_content();
    if !list_text.contains(ALL_VERSIONS) {
        return Err(ParserError::AllVersionsNotFound { text: list_text });
    }

    let mut table = ResultTable::new(&LATEST_VERSIONS_HEADER);
    for link in list.find_all(&Query::tag("a"), None) {
        let href = require_attribute(&link, "href")?;
        let (version, status) = parse_version_label(&link.text_content());
        table.push_row(vec![Cell::from(href), Cell::from(version), Cell::from(status)]);
    }

    Ok(Some(table))
}

/// Split `Python 3.13 (stable)` into `("3.13", "stable")`
///
/// Labels that do not follow that shape (e.g. "All versions") become the
/// version as-is with an empty status.
pub fn parse_version_label(text: &str) -> (String, String) {
    match VERSION_LABEL.captures(text) {
        Some(caps) => (caps["version"].to_string(), caps["status"].to_string()),
        None => (text.to_string(), String::new()),
    }
}

/// Download the A4 PDF archive into `downloads_dir`
///
/// Returns the saved path, or `None` when either the download page or the
/// archive itself could not be fetched.
pub fn download<F, O>(fetcher: &F, main_doc_url: &Url, downloads_dir: &Path, observer: &mut O) -> ParserResult<Option<PathBuf>>
where
    F: Fetcher + ?Sized,
    O: CrawlObserver + ?Sized,
{
    let result = download_archive(fetcher, main_doc_url, downloads_dir);
    report_fatal(observer, result)
}

fn download_archive<F: Fetcher + ?Sized>(fetcher: &F, main_doc_url: &Url, downloads_dir: &Path) -> ParserResult<Option<PathBuf>> {
    let downloads_url = join_url(main_doc_url, "download.html")?;
    let Some(page) = fetcher.get(&downloads_url) else {
        return Ok(None);
    };
    let doc = parse_document(&page.body);

    let main_div = find_tag(&doc.root_element(), &Query::tag("div").attr("role", "main"))?;
    let table = find_tag(&main_div, &Query::tag("table").class("docutils"))?;
    let link = find_tag(&table, &Query::tag("a").attr_matches("href", PDF_A4_HREF.clone()))?;
    let archive_url = resolve_href(&link, &downloads_url)?;
    let file_name = archive_file_name(&archive_url)?;

    let Some(data) = fetcher.get_bytes(&archive_url) else {
        return Ok(None);
    };

    let archive_path = downloads_dir.join(file_name);
    write_atomic(&archive_path, &data)?;
    info!("Archive downloaded and saved: {}", archive_path.display());

    Ok(Some(archive_path))
}

/// Last path segment of the archive URL
fn archive_file_name(url: &Url) -> ParserResult<String> {
    url.path_segments()
        .and_then(|segments| segments.last())
        .filter(|name| !name.is_empty())
        .map(|name| name.to_string())
        .ok_or_else(|| ParserError::InvalidLink { href: url.to_string(), reason: "no file name".to_string() })
}

#[cfg(test)]
#[path = "modes_test.rs"]
mod modes_test;
