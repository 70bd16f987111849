// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use serde::{Deserialize, Serialize};

/// Severity assigned to a detected secret
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "CRITICAL"),
            Severity::High => write!(f, "HIGH"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::Low => write!(f, "LOW"),
        }
    }
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

/// Crawl strategy for website scans
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum CrawlMode {
    /// Breadth-only frontier without depth accounting, seeded on both schemes
    Flat,
    /// Depth-tracked crawl from the first reachable seed
    Deep,
}

impl Default for CrawlMode {
    fn default() -> Self {
        CrawlMode::Flat
    }
}

impl std::fmt::Display for CrawlMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CrawlMode::Flat => write!(f, "flat"),
            CrawlMode::Deep => write!(f, "deep"),
        }
    }
}

/// A single detected secret candidate that survived filtering
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    /// Pattern name that matched (e.g. "AWS Access Key")
    pub kind: String,
    /// Full matched text
    pub value: String,
    pub severity: Severity,
    /// Byte offsets into the scanned text
    pub start: usize,
    pub end: usize,
    /// Set when the scan context matched a credential-store path marker,
    /// which escalates severity and bypasses most suppression rules
    pub critical_context: bool,
    pub url: Option<String>,
    pub file: Option<String>,
    pub commit: Option<String>,
    /// Raw diff line the match came from (git history scans only)
    pub line: Option<String>,
}

impl Finding {
    pub fn new(kind: impl Into<String>, value: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
            severity: Severity::Medium,
            start,
            end,
            critical_context: false,
            url: None,
            file: None,
            commit: None,
            line: None,
        }
    }

    /// Source label used for report grouping: URL, then file, then commit
    pub fn source(&self) -> &str {
        self.url
            .as_deref()
            .or(self.file.as_deref())
            .or(self.commit.as_deref())
            .unwrap_or("Unknown Source")
    }

    /// Deduplication identity within a single run
    pub fn identity(&self) -> String {
        let source = self
            .url
            .as_deref()
            .or(self.file.as_deref())
            .or(self.commit.as_deref())
            .unwrap_or("");
        format!("{}:{}:{}", self.kind, self.value, source)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanConfig {
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Concurrency for filesystem scans, separate from crawl workers
    #[serde(default = "default_threads")]
    pub threads: usize,

    #[serde(default)]
    pub crawl_mode: CrawlMode,

    /// Delay between crawl batches in seconds; 0 falls back to a small
    /// per-mode default so targets are never hammered without pause
    #[serde(default)]
    pub rate_limit: f64,

    #[serde(default = "default_autosave_interval")]
    pub autosave_interval: u64,

    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,

    /// Caller-supplied regexes; matching values are dropped before filtering
    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub verbose: bool,
}

fn default_max_pages() -> usize {
    100
}

fn default_max_depth() -> usize {
    3
}

fn default_max_workers() -> usize {
    10
}

fn default_threads() -> usize {
    20
}

fn default_autosave_interval() -> u64 {
    60
}

fn default_max_file_size_mb() -> u64 {
    10
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_pages: 100,
            max_depth: 3,
            max_workers: 10,
            threads: 20,
            crawl_mode: CrawlMode::Flat,
            rate_limit: 0.0,
            autosave_interval: 60,
            max_file_size_mb: 10,
            exclude: Vec::new(),
            verbose: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Critical.to_string(), "CRITICAL");
        assert_eq!(Severity::Low.as_str(), "low");
    }

    #[test]
    fn test_finding_source_precedence() {
        let mut finding = Finding::new("JWT Token", "eyJabc", 0, 6);
        assert_eq!(finding.source(), "Unknown Source");

        finding.commit = Some("abc123".to_string());
        assert_eq!(finding.source(), "abc123");

        finding.file = Some("config/.env".to_string());
        assert_eq!(finding.source(), "config/.env");

        finding.url = Some("https://example.com/app.js".to_string());
        assert_eq!(finding.source(), "https://example.com/app.js");
    }

    #[test]
    fn test_finding_identity_includes_source() {
        let mut a = Finding::new("Email", "a@b.io", 0, 6);
        let mut b = a.clone();
        a.url = Some("https://example.com/x".to_string());
        b.url = Some("https://example.com/y".to_string());
        assert_ne!(a.identity(), b.identity());
    }

    #[test]
    fn test_config_defaults() {
        let config = ScanConfig::default();
        assert_eq!(config.max_pages, 100);
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.max_workers, 10);
        assert_eq!(config.autosave_interval, 60);
        assert_eq!(config.crawl_mode, CrawlMode::Flat);
    }
}
