// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Web Crawler Module
 * Discovers pages within a target domain and scans each one for secrets
 *
 * Two strategies share one engine: flat mode sweeps breadth-first from both
 * scheme variants of the apex, deep mode probes for a live seed and follows
 * links down to a depth ceiling. Every URL is normalized before it touches
 * the frontier, so the visited set deduplicates scheme-equivalent and
 * fragment-equivalent addresses for free.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::errors::{DetectorResult, NetworkError};
use crate::http_client::HttpClient;
use crate::scanner::SecretScanner;
use crate::session::ScanSession;
use crate::sources;
use crate::types::{CrawlMode, Finding, ScanConfig};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Per-page fetch deadline, tighter than the client default so one slow
/// endpoint cannot stall a whole batch.
const PAGE_FETCH_TIMEOUT_SECS: u64 = 15;

/// Deep mode probes the seed candidates with a short deadline before
/// committing to a scheme.
const SEED_PROBE_TIMEOUT_SECS: u64 = 10;

/// Pause between batches when no explicit rate limit is configured.
const DEFAULT_FLAT_DELAY: Duration = Duration::from_millis(50);
const DEFAULT_DEEP_DELAY: Duration = Duration::from_millis(100);

/// Attributes that can carry a navigable URL on the tags we walk.
const URL_ATTRIBUTES: &[&str] = &["href", "src", "action", "data-url"];

/// Quoted absolute or root-relative URLs inside onclick handlers and
/// inline script bodies.
static INLINE_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"["']((https?://|/)[^"']+)["']"#).unwrap());

/// url(...) references inside inline style blocks.
static CSS_URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"url\(["']?([^)"]+)["']?\)"#).unwrap());

/// Bare hosts anywhere in the raw page body, used for subdomain observation.
static HOST_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://([\w.-]+)").unwrap());

/// Crawls one domain, feeding every fetched page through the scanner and
/// pushing findings into the shared session.
pub struct WebCrawler {
    client: Arc<HttpClient>,
    scanner: Arc<SecretScanner>,
    config: ScanConfig,
}

/// Counters reported once a crawl run finishes.
#[derive(Debug, Default, Clone)]
pub struct CrawlSummary {
    pub pages_scanned: usize,
    pub pages_failed: usize,
    pub subdomains: Vec<String>,
}

/// Frontier bookkeeping for one crawl run.
#[derive(Default)]
struct CrawlState {
    frontier: VecDeque<(String, usize)>,
    visited: HashSet<String>,
    queued: HashSet<String>,
    subdomains: BTreeSet<String>,
}

/// Everything one page fetch produced, merged into the state between batches.
struct PageOutcome {
    url: String,
    depth: usize,
    failed: bool,
    findings: Vec<Finding>,
    links: Vec<String>,
    subdomains: Vec<String>,
}

impl PageOutcome {
    fn empty(url: String, depth: usize) -> Self {
        Self {
            url,
            depth,
            failed: false,
            findings: Vec::new(),
            links: Vec::new(),
            subdomains: Vec::new(),
        }
    }
}

impl WebCrawler {
    pub fn new(client: Arc<HttpClient>, scanner: Arc<SecretScanner>, config: ScanConfig) -> Self {
        Self {
            client,
            scanner,
            config,
        }
    }

    /// Crawls `domain` until the frontier drains, the page budget is spent,
    /// or the session is cancelled. Findings land in `session` as they are
    /// discovered; the summary only carries crawl-level counters.
    pub async fn crawl(&self, domain: &str, session: &ScanSession) -> DetectorResult<CrawlSummary> {
        let base_domain = domain.trim().trim_end_matches('/').to_lowercase();
        let base_domain = base_domain
            .strip_prefix("https://")
            .or_else(|| base_domain.strip_prefix("http://"))
            .unwrap_or(&base_domain)
            .to_string();
        let max_pages = self.config.max_pages.max(1);
        let max_workers = self.config.max_workers.max(1);

        info!(
            "[Crawler] Starting {} crawl of {} (workers: {}, page budget: {})",
            self.config.crawl_mode, base_domain, max_workers, max_pages
        );

        let mut state = CrawlState::default();
        self.seed_frontier(&base_domain, &mut state).await?;

        let mut summary = CrawlSummary::default();
        let mut budget_warned = false;

        while !state.frontier.is_empty() && state.visited.len() < max_pages {
            if session.is_cancelled() {
                info!(
                    "[Crawler] Stop requested, abandoning {} queued URLs",
                    state.frontier.len()
                );
                break;
            }

            let mut batch: Vec<(String, usize)> = Vec::new();
            while batch.len() < max_workers && state.visited.len() + batch.len() < max_pages {
                let Some((url, depth)) = state.frontier.pop_front() else {
                    break;
                };
                if state.visited.contains(&url) {
                    continue;
                }
                if self.config.crawl_mode == CrawlMode::Deep && depth > self.config.max_depth {
                    continue;
                }
                batch.push((url, depth));
            }
            if batch.is_empty() {
                break;
            }

            let outcomes = futures::future::join_all(
                batch
                    .into_iter()
                    .map(|(url, depth)| self.scan_page(url, depth, &base_domain)),
            )
            .await;

            for outcome in outcomes {
                state.visited.insert(outcome.url.clone());
                if outcome.failed {
                    summary.pages_failed += 1;
                }
                let added = session.add_findings(outcome.findings);
                if added > 0 {
                    info!("[Crawler] {} new findings on {}", added, outcome.url);
                }
                let next_depth = outcome.depth + 1;
                for link in outcome.links {
                    if !state.visited.contains(&link) && state.queued.insert(link.clone()) {
                        state.frontier.push_back((link, next_depth));
                    }
                }
                for host in outcome.subdomains {
                    if state.subdomains.insert(host.clone()) {
                        info!("[Crawler] Observed subdomain: {}", host);
                    }
                }
            }

            session.checkpoint().await;

            if state.visited.len() >= max_pages && !state.frontier.is_empty() && !budget_warned {
                warn!(
                    "[WARNING] Page budget of {} reached with {} URLs still queued",
                    max_pages,
                    state.frontier.len()
                );
                budget_warned = true;
            }

            tokio::time::sleep(self.batch_delay()).await;
        }

        summary.pages_scanned = state.visited.len();
        summary.subdomains = state.subdomains.into_iter().collect();

        info!(
            "[Crawler] Finished {}: {} pages scanned, {} failed, {} subdomains observed",
            base_domain,
            summary.pages_scanned,
            summary.pages_failed,
            summary.subdomains.len()
        );

        Ok(summary)
    }

    /// Queues the starting URLs. Flat mode takes both scheme variants and
    /// lets unreachable ones fail as ordinary pages; deep mode insists on a
    /// live seed before any crawling starts.
    async fn seed_frontier(&self, base_domain: &str, state: &mut CrawlState) -> DetectorResult<()> {
        let candidates = [
            format!("https://{}", base_domain),
            format!("http://{}", base_domain),
        ];

        match self.config.crawl_mode {
            CrawlMode::Flat => {
                for seed in candidates {
                    let normalized = normalize_url(&seed);
                    if is_in_scope(&normalized, base_domain)
                        && state.queued.insert(normalized.clone())
                    {
                        state.frontier.push_back((normalized, 0));
                    }
                }
            }
            CrawlMode::Deep => {
                for seed in candidates {
                    match self
                        .client
                        .get_with_timeout(&seed, SEED_PROBE_TIMEOUT_SECS)
                        .await
                    {
                        Ok(response) if response.status_code == 200 => {
                            let normalized = normalize_url(&seed);
                            info!("[Crawler] Seed responded: {}", normalized);
                            if state.queued.insert(normalized.clone()) {
                                state.frontier.push_back((normalized, 0));
                            }
                            break;
                        }
                        Ok(response) => {
                            debug!(
                                "[Crawler] Seed {} answered with status {}",
                                seed, response.status_code
                            );
                        }
                        Err(error) => {
                            debug!("[Crawler] Seed {} unreachable: {}", seed, error);
                        }
                    }
                }
                if state.frontier.is_empty() {
                    return Err(NetworkError::Other(format!(
                        "could not connect to {} over https or http",
                        base_domain
                    ))
                    .into());
                }
            }
        }

        Ok(())
    }

    /// Fetches one page, scans the body, and collects outbound links when the
    /// page is HTML and the mode still allows expansion at this depth.
    async fn scan_page(&self, url: String, depth: usize, base_domain: &str) -> PageOutcome {
        debug!("[Crawler] Fetching {} (depth {})", url, depth);
        let mut outcome = PageOutcome::empty(url, depth);

        let response = match self
            .client
            .get_with_timeout(&outcome.url, PAGE_FETCH_TIMEOUT_SECS)
            .await
        {
            Ok(response) => response,
            Err(error) => {
                warn!("[Crawler] Error scanning {}: {}", outcome.url, error);
                outcome.failed = true;
                return outcome;
            }
        };

        if response.status_code != 200 {
            debug!(
                "[Crawler] Skipping {} (status {})",
                outcome.url, response.status_code
            );
            return outcome;
        }
        if !response.is_text() {
            debug!("[Crawler] Skipping {} (binary content type)", outcome.url);
            return outcome;
        }

        let mut findings = self.scanner.scan_text(&response.body, Some(&outcome.url));
        for finding in &mut findings {
            finding.url = Some(outcome.url.clone());
        }
        outcome.findings = findings;

        let depth_allows = match self.config.crawl_mode {
            CrawlMode::Flat => true,
            CrawlMode::Deep => depth < self.config.max_depth,
        };
        if response.is_html() && depth_allows {
            let (links, subdomains) = extract_links(&outcome.url, &response.body, base_domain);
            outcome.links = links;
            outcome.subdomains = subdomains;
        }

        outcome
    }

    fn batch_delay(&self) -> Duration {
        if self.config.rate_limit > 0.0 {
            Duration::from_secs_f64(self.config.rate_limit)
        } else {
            match self.config.crawl_mode {
                CrawlMode::Flat => DEFAULT_FLAT_DELAY,
                CrawlMode::Deep => DEFAULT_DEEP_DELAY,
            }
        }
    }
}

/// Canonicalizes a URL so equivalent addresses collapse to one frontier key:
/// lowercased host, `www.` prefix dropped, default ports elided, fragment
/// removed, trailing slash trimmed, query parameters sorted. Unparseable
/// input comes back unchanged so callers can still record it.
pub fn normalize_url(raw: &str) -> String {
    let parsed = match Url::parse(raw) {
        Ok(parsed) => parsed,
        Err(_) => return raw.to_string(),
    };
    let Some(host) = parsed.host_str() else {
        return raw.to_string();
    };

    let mut host = host.to_lowercase();
    if let Some(stripped) = host.strip_prefix("www.") {
        host = stripped.to_string();
    }

    let path = parsed.path().trim_end_matches('/');

    // Url::port() already reports None for the scheme default, so any port
    // that survives here is meaningful and must stay in the key.
    let mut normalized = match parsed.port() {
        Some(port) => format!("{}://{}:{}{}", parsed.scheme(), host, port, path),
        None => format!("{}://{}{}", parsed.scheme(), host, path),
    };

    if let Some(query) = parsed.query() {
        if !query.is_empty() {
            let mut params: Vec<&str> = query.split('&').collect();
            params.sort_unstable();
            normalized.push('?');
            normalized.push_str(&params.join("&"));
        }
    }

    normalized
}

/// A normalized URL is crawlable when it speaks http(s), parses, does not
/// point at a skipped binary extension, and mentions the target domain
/// anywhere in the URL. The whole-URL match keeps subdomains and path
/// mirrors like `https://host/example.com` inside scope on purpose.
pub fn is_in_scope(normalized: &str, base_domain: &str) -> bool {
    let parsed = match Url::parse(normalized) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return false;
    }
    if parsed.host_str().is_none() {
        return false;
    }
    if sources::has_skip_extension(parsed.path()) {
        return false;
    }
    normalized.to_lowercase().contains(base_domain)
}

/// Resolves a possibly-relative reference against the page it appeared on.
/// Anything the URL parser rejects is passed through untouched and left for
/// the scope check to discard.
fn resolve_url(base: &str, relative: &str) -> String {
    match Url::parse(base).and_then(|b| b.join(relative)) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => relative.to_string(),
    }
}

/// Pulls candidate URLs out of an HTML page: tag attributes, onclick
/// handlers, quoted URLs in inline scripts, and url() references in inline
/// styles. Returns in-scope normalized links plus any subdomains of the
/// target seen in the raw body.
fn extract_links(page_url: &str, html: &str, base_domain: &str) -> (Vec<String>, Vec<String>) {
    let mut candidates: Vec<String> = Vec::new();

    {
        let document = Html::parse_document(html);
        let tag_selector = Selector::parse("a, link, script, img, form, iframe").unwrap();
        let onclick_selector = Selector::parse("[onclick]").unwrap();
        let script_selector = Selector::parse("script").unwrap();
        let style_selector = Selector::parse("style").unwrap();

        for element in document.select(&tag_selector) {
            for attr in URL_ATTRIBUTES {
                if let Some(value) = element.value().attr(attr) {
                    let value = value.trim();
                    if !value.is_empty() {
                        candidates.push(value.to_string());
                    }
                }
            }
        }

        for element in document.select(&onclick_selector) {
            if let Some(handler) = element.value().attr("onclick") {
                for capture in INLINE_URL_RE.captures_iter(handler) {
                    candidates.push(capture[1].to_string());
                }
            }
        }

        for element in document.select(&script_selector) {
            let body: String = element.text().collect();
            for capture in INLINE_URL_RE.captures_iter(&body) {
                candidates.push(capture[1].to_string());
            }
        }

        for element in document.select(&style_selector) {
            let body: String = element.text().collect();
            for capture in CSS_URL_RE.captures_iter(&body) {
                candidates.push(capture[1].to_string());
            }
        }
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut links: Vec<String> = Vec::new();
    for candidate in candidates {
        let normalized = normalize_url(&resolve_url(page_url, &candidate));
        if is_in_scope(&normalized, base_domain) && seen.insert(normalized.clone()) {
            links.push(normalized);
        }
    }

    let suffix = format!(".{}", base_domain);
    let mut subdomains: Vec<String> = Vec::new();
    let mut seen_hosts: HashSet<String> = HashSet::new();
    for capture in HOST_RE.captures_iter(html) {
        let host = capture[1].to_lowercase();
        if host.ends_with(&suffix) && host != base_domain && seen_hosts.insert(host.clone()) {
            subdomains.push(host);
        }
    }

    (links, subdomains)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url_strips_fragment_and_trailing_slash() {
        assert_eq!(
            normalize_url("https://example.com/about/#team"),
            "https://example.com/about"
        );
        assert_eq!(normalize_url("https://example.com/"), "https://example.com");
    }

    #[test]
    fn test_normalize_url_drops_default_port_keeps_custom() {
        assert_eq!(
            normalize_url("https://example.com:443/x"),
            "https://example.com/x"
        );
        assert_eq!(
            normalize_url("http://example.com:8080/x"),
            "http://example.com:8080/x"
        );
    }

    #[test]
    fn test_normalize_url_lowercases_host_and_strips_www() {
        assert_eq!(
            normalize_url("HTTPS://WWW.Example.COM/Path"),
            "https://example.com/Path"
        );
    }

    #[test]
    fn test_normalize_url_sorts_query_params() {
        assert_eq!(
            normalize_url("https://example.com/search?z=1&a=2&m=3"),
            "https://example.com/search?a=2&m=3&z=1"
        );
    }

    #[test]
    fn test_normalize_url_is_idempotent() {
        let urls = [
            "https://www.example.com/a/b/?z=9&a=1#frag",
            "http://example.com:8080/x?b=2&a=1",
            "not a url at all",
        ];
        for url in urls {
            let once = normalize_url(url);
            assert_eq!(normalize_url(&once), once);
        }
    }

    #[test]
    fn test_scope_accepts_subdomains_and_path_mentions() {
        assert!(is_in_scope("https://example.com/login", "example.com"));
        assert!(is_in_scope("https://api.example.com/v2", "example.com"));
        assert!(is_in_scope("https://evil.com/example.com", "example.com"));
        assert!(is_in_scope("https://example.com.evil.org/x", "example.com"));
        assert!(!is_in_scope("https://other.org/page", "example.com"));
    }

    #[test]
    fn test_scope_rejects_schemes_and_binaries() {
        assert!(!is_in_scope("ftp://example.com/file", "example.com"));
        assert!(!is_in_scope("mailto:dev@example.com", "example.com"));
        assert!(!is_in_scope("https://example.com/logo.png", "example.com"));
        assert!(!is_in_scope(
            "https://example.com/bundle.tar.gz",
            "example.com"
        ));
    }

    #[test]
    fn test_extract_links_walks_attributes_scripts_and_styles() {
        let html = r##"
            <html>
            <head>
                <link rel="stylesheet" href="/css-theme">
                <style>.hero { background: url('/media-banner') }</style>
            </head>
            <body>
                <a href="/about">About</a>
                <a href="https://other.org/external">Elsewhere</a>
                <img src="https://cdn.example.com/pixel">
                <form action="/login"></form>
                <button onclick="window.location='/dashboard'">Go</button>
                <script>fetch("https://api.example.com/config");</script>
            </body>
            </html>
        "##;

        let (links, subdomains) = extract_links("https://example.com", html, "example.com");

        assert!(links.contains(&"https://example.com/about".to_string()));
        assert!(links.contains(&"https://example.com/css-theme".to_string()));
        assert!(links.contains(&"https://example.com/login".to_string()));
        assert!(links.contains(&"https://example.com/dashboard".to_string()));
        assert!(links.contains(&"https://api.example.com/config".to_string()));
        assert!(!links.iter().any(|l| l.contains("other.org")));

        assert!(subdomains.contains(&"cdn.example.com".to_string()));
        assert!(subdomains.contains(&"api.example.com".to_string()));
    }

    #[test]
    fn test_extract_links_dedupes_equivalent_urls() {
        let html = r#"
            <a href="/docs">one</a>
            <a href="/docs/">two</a>
            <a href="/docs#intro">three</a>
        "#;
        let (links, _) = extract_links("https://example.com", html, "example.com");
        assert_eq!(links, vec!["https://example.com/docs".to_string()]);
    }

    #[test]
    fn test_resolve_url_handles_relative_and_absolute() {
        assert_eq!(
            resolve_url("https://example.com/a/b", "../c"),
            "https://example.com/c"
        );
        assert_eq!(
            resolve_url("https://example.com", "https://api.example.com/x"),
            "https://api.example.com/x"
        );
    }
}
