//! Repository discovery from a directory index page
//!
//! The git host serves an index of its repositories at its root. Every link
//! on that page is turned into a candidate clone URL (`<host>/<path>.git`)
//! and kept only if `git ls-remote` can talk to it. The surviving list is
//! merged into the repository cache file so that later runs can replay it
//! without hitting the index again.
//!
//! Two index formats are understood:
//!
//! - **HTML**: the `href` of every `<a>` element.
//! - **XML**: the `href` attribute of `<a>` elements and the text of
//!   `<href>` elements, with or without the WebDAV `DAV:` namespace.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use log::{debug, info, warn};
use regex::Regex;
use url::Url;
use xot::Xot;

use super::RepositorySource;
use crate::cache::{self, RepoListCache};
use crate::error::{Error, Result};
use crate::mirror::GitOperations;

const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Format of the directory index document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingFormat {
    Html,
    Xml,
}

/// Trait for fetching the index document - allows mocking in tests
pub trait ListingFetcher {
    fn fetch(&self, url: &Url) -> Result<String>;
}

/// Fetches index pages over HTTP(S).
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(concat!("gsmirror/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl ListingFetcher for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<String> {
        info!("Fetching repository index {}", url);
        let body = self
            .client
            .get(url.as_str())
            .send()?
            .error_for_status()?
            .text()?;
        Ok(body)
    }
}

/// Repositories linked from the host's directory index.
pub struct RemoteListingSource<'a> {
    base_url: Url,
    format: ListingFormat,
    cache_path: PathBuf,
    from_cache: bool,
    fetcher: &'a dyn ListingFetcher,
    git: &'a dyn GitOperations,
}

impl<'a> RemoteListingSource<'a> {
    pub fn new(
        base_url: Url,
        format: ListingFormat,
        cache_path: impl Into<PathBuf>,
        fetcher: &'a dyn ListingFetcher,
        git: &'a dyn GitOperations,
    ) -> Self {
        Self {
            base_url,
            format,
            cache_path: cache_path.into(),
            from_cache: false,
            fetcher,
            git,
        }
    }

    /// Replay the cached list instead of fetching and probing the index.
    pub fn from_cache(mut self, from_cache: bool) -> Self {
        self.from_cache = from_cache;
        self
    }

    fn probe(&self, candidate: &str) -> bool {
        match self.git.ls_remote(candidate) {
            Ok(status) => status.success(),
            Err(e) => {
                warn!("Cannot probe {}: {}", candidate, e);
                false
            }
        }
    }
}

impl RepositorySource for RemoteListingSource<'_> {
    fn resolve(&self) -> Result<Vec<String>> {
        if self.from_cache {
            let urls = RepoListCache::load(&self.cache_path).urls();
            info!(
                "Using {} repositories from {}",
                urls.len(),
                self.cache_path.display()
            );
            return Ok(urls);
        }

        let document = self.fetcher.fetch(&self.base_url)?;
        let links = match self.format {
            ListingFormat::Html => extract_html_links(&document)?,
            ListingFormat::Xml => extract_xml_links(&document)?,
        };
        debug!("Index lists {} links", links.len());

        let mut seen = HashSet::new();
        let mut repositories = Vec::new();
        for link in links {
            let Some(candidate) = candidate_url(&self.base_url, &link) else {
                debug!("Ignoring link {}", link);
                continue;
            };
            if !seen.insert(candidate.clone()) {
                continue;
            }
            if self.probe(&candidate) {
                repositories.push(candidate);
            } else {
                info!("{} is not a repository", candidate);
            }
        }

        if let Err(e) = cache::update(&self.cache_path, &repositories) {
            warn!("Repository list was not cached: {}", e);
        }
        Ok(repositories)
    }
}

/// Collect the `href` target of every `<a>` element in an HTML page.
pub fn extract_html_links(document: &str) -> Result<Vec<String>> {
    let anchor = Regex::new(
        r#"(?is)<a\s(?:[^>]*?\s)?href\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#,
    )?;
    let entity = Regex::new(r"&(amp|quot|#39|lt|gt);")?;

    let mut links = Vec::new();
    for captures in anchor.captures_iter(document) {
        if let Some(href) = captures
            .get(1)
            .or_else(|| captures.get(2))
            .or_else(|| captures.get(3))
        {
            links.push(decode_entities(&entity, href.as_str()));
        }
    }
    Ok(links)
}

/// Collect link targets from an XML index document.
pub fn extract_xml_links(document: &str) -> Result<Vec<String>> {
    let mut xot = Xot::new();
    let root = xot.parse(document).map_err(|e| Error::Xml {
        source_name: "directory index".to_string(),
        message: e.to_string(),
    })?;

    let anchor = xot.name("a");
    let href_attribute = xot.name("href");
    let href_elements: Vec<_> = [
        xot.name("href"),
        xot.namespace("DAV:").and_then(|ns| xot.name_ns("href", ns)),
    ]
    .into_iter()
    .flatten()
    .collect();

    let mut links = Vec::new();
    for node in xot.descendants(root) {
        let Some(element) = xot.element(node) else {
            continue;
        };
        let name = element.name();
        if Some(name) == anchor {
            if let Some(href) = href_attribute.and_then(|attr| xot.get_attribute(node, attr)) {
                links.push(href.trim().to_string());
            }
        } else if href_elements.contains(&name) {
            if let Some(text) = xot.text_content_str(node) {
                links.push(text.trim().to_string());
            }
        }
    }
    Ok(links)
}

/// Turn a link on the index page into a clone URL on the same host.
///
/// Returns `None` for links to other hosts, non-HTTP schemes, the index
/// itself, and gitiles views (`/+/...`).
pub fn candidate_url(base: &Url, href: &str) -> Option<String> {
    let mut url = base.join(href.trim()).ok()?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str() != base.host_str() {
        return None;
    }
    if url.port_or_known_default() != base.port_or_known_default() {
        return None;
    }

    let path = url.path().trim_matches('/').to_string();
    if path.is_empty() || path.starts_with('+') || path.contains("/+") {
        return None;
    }

    let path = if path.ends_with(".git") {
        path
    } else {
        format!("{}.git", path)
    };
    url.set_query(None);
    url.set_fragment(None);
    url.set_path(&path);
    Some(url.to_string())
}

/// Decodes in a single pass, so `&amp;lt;` stays `&lt;`.
fn decode_entities(entity: &Regex, text: &str) -> String {
    entity
        .replace_all(text, |captures: &regex::Captures<'_>| match &captures[1] {
            "amp" => "&",
            "quot" => "\"",
            "#39" => "'",
            "lt" => "<",
            _ => ">",
        })
        .into_owned()
}
