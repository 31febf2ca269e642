/// HTTP fetching with an on-disk page cache
///
/// This module handles:
/// - HTTP GET requests through a shared ureq agent
/// - Caching page bodies under the cache directory
/// - Turning network/HTTP failures into logged soft failures (`None`)
use log::{debug, error};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = "pep-audit/0.1.0";

/// A fetched page body together with the URL it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub url: Url,
    pub body: String,
}

/// Source of pages for the parser modes
///
/// `None` means the request failed; implementations log the cause before
/// returning, so callers only decide whether to skip or stop.
pub trait Fetcher {
    fn get(&self, url: &Url) -> Option<Page>;

    fn get_bytes(&self, url: &Url) -> Option<Vec<u8>>;
}

/// ureq-backed fetcher reusing previously fetched pages from disk
pub struct CachedSession {
    agent: ureq::Agent,
    cache_dir: Option<PathBuf>,
}

impl CachedSession {
    /// Create a session caching pages under `cache_dir/pages`
    pub fn new(cache_dir: &Path) -> Self {
        Self { agent: build_agent(), cache_dir: Some(cache_dir.join("pages")) }
    }

    /// Create a session that always goes to the network
    pub fn uncached() -> Self {
        Self { agent: build_agent(), cache_dir: None }
    }

    /// Remove every cached page
    pub fn clear_cache(&self) -> std::io::Result<()> {
        if let Some(ref dir) = self.cache_dir {
            if dir.exists() {
                fs::remove_dir_all(dir)?;
                debug!("cleared page cache at {:?}", dir);
            }
        }
        Ok(())
    }

    fn cached_path(&self, url: &Url) -> Option<PathBuf> {
        self.cache_dir.as_ref().map(|dir| dir.join(cache_key(url)))
    }

    fn read_cached(&self, url: &Url) -> Option<String> {
        let path = self.cached_path(url)?;
        let body = fs::read_to_string(&path).ok()?;
        debug!("cache hit for {}", url);
        Some(body)
    }

    fn store_cached(&self, url: &Url, body: &str) -> std::io::Result<()> {
        match self.cached_path(url) {
            Some(path) => write_atomic(&path, body.as_bytes()),
            None => Ok(()),
        }
    }
}

/// Write `data` to `path` through a sibling temp file, creating parent directories
pub fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    // Write atomically: write to temp file, then rename
    let temp_path = path.with_extension("tmp");
    let mut file = File::create(&temp_path)?;
    file.write_all(data)?;
    file.flush()?;
    drop(file);

    fs::rename(&temp_path, path)
}

impl Fetcher for CachedSession {
    fn get(&self, url: &Url) -> Option<Page> {
        if let Some(body) = self.read_cached(url) {
            return Some(Page { url: url.clone(), body });
        }

        debug!("fetching {}", url);
        let body = match http_get_string(&self.agent, url) {
            Ok(body) => body,
            Err(e) => {
                error!("Failed to fetch {}: {}", url, e);
                return None;
            }
        };

        if let Err(e) = self.store_cached(url, &body) {
            debug!("could not cache {}: {}", url, e);
        }

        Some(Page { url: url.clone(), body })
    }

    fn get_bytes(&self, url: &Url) -> Option<Vec<u8>> {
        debug!("downloading {}", url);
        match http_get_bytes(&self.agent, url) {
            Ok(data) => Some(data),
            Err(e) => {
                error!("Failed to download {}: {}", url, e);
                None
            }
        }
    }
}

fn build_agent() -> ureq::Agent {
    ureq::AgentBuilder::new()
        .user_agent(USER_AGENT)
        .timeout_connect(Duration::from_secs(15))
        .timeout_read(Duration::from_secs(30))
        .build()
}

/// Download a page body using HTTP GET
fn http_get_string(agent: &ureq::Agent, url: &Url) -> Result<String, ureq::Error> {
    let resp = agent.get(url.as_str()).call()?;
    Ok(resp.into_string()?)
}

/// Download raw data from a URL using HTTP GET
fn http_get_bytes(agent: &ureq::Agent, url: &Url) -> Result<Vec<u8>, ureq::Error> {
    let resp = agent.get(url.as_str()).call()?;
    let len = resp.header("Content-Length").and_then(|s| s.parse::<usize>().ok()).unwrap_or(0);
    let mut data: Vec<u8> = Vec::with_capacity(len);
    resp.into_reader().read_to_end(&mut data)?;
    Ok(data)
}

/// File name for a cached page: the URL with everything but [A-Za-z0-9.-] replaced
pub fn cache_key(url: &Url) -> String {
    let mut key: String = url
        .as_str()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect();
    key.push_str(".html");
    key
}
