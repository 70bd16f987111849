// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * HTTP Client - Fetch Layer for URL and Website Scans
 *
 * Thin wrapper around reqwest with retries, per-request timeouts, and
 * a rotating User-Agent pool. Responses are flattened into plain
 * structs so the scanner never touches reqwest types.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use rand::Rng;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::errors::DetectorResult;

/// User-Agents covering browsers, mobile devices, bots, and headless
/// runtimes; one is picked at random per request.
const USER_AGENTS: &[&str] = &[
    // Modern browsers
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 13_4_1) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:124.0) Gecko/20100101 Firefox/124.0",
    // Mobile browsers
    "Mozilla/5.0 (Linux; Android 12; SM-G991B) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Mobile Safari/537.36",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1",
    // Bots and crawlers
    "Googlebot/2.1 (+http://www.google.com/bot.html)",
    "Bingbot/2.0 (+http://www.bing.com/bingbot.htm)",
    "DuckDuckBot/1.0; (+http://duckduckgo.com/duckduckbot.html)",
    "Mozilla/5.0 (compatible; YandexBot/3.0; +http://yandex.com/bots)",
    // Headless
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) HeadlessChrome/123.0.0.0 Safari/537.36",
    // Others
    "Mozilla/5.0 (compatible; Discordbot/2.0; +https://discordapp.com)",
    "TelegramBot (like TwitterBot)",
    "Slackbot-LinkExpanding 1.0 (+https://api.slack.com/robots)",
];

/// Pick a User-Agent at random so repeated requests do not share a
/// fingerprint.
pub fn random_user_agent() -> &'static str {
    let index = rand::thread_rng().gen_range(0..USER_AGENTS.len());
    USER_AGENTS[index]
}

/// Maximum response body size (10MB) to prevent memory exhaustion
const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Connection pool settings shared by every scan
const DEFAULT_POOL_IDLE_PER_HOST: usize = 32;
const DEFAULT_POOL_MAX_IDLE_TIMEOUT: u64 = 90;

/// Content-Type prefixes that mark a response as scannable text
const TEXT_CONTENT_TYPES: &[&str] = &[
    "text/",
    "application/json",
    "application/javascript",
    "application/xml",
];

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
    max_retries: u32,
    max_body_size: usize,
}

impl HttpClient {
    pub fn new(timeout_secs: u64, max_retries: u32) -> DetectorResult<Self> {
        // Scan targets routinely present self-signed or expired
        // certificates; fetching them is the whole point.
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .danger_accept_invalid_certs(true)
            .redirect(reqwest::redirect::Policy::limited(5))
            .cookie_store(true)
            .gzip(true)
            .pool_max_idle_per_host(DEFAULT_POOL_IDLE_PER_HOST)
            .pool_idle_timeout(Duration::from_secs(DEFAULT_POOL_MAX_IDLE_TIMEOUT))
            .tcp_keepalive(Duration::from_secs(60))
            .tcp_nodelay(true)
            .build()
            .map_err(crate::errors::DetectorError::from)?;

        Ok(Self {
            client,
            timeout: Duration::from_secs(timeout_secs),
            max_retries,
            max_body_size: MAX_BODY_SIZE,
        })
    }

    /// Send a GET request with the client default timeout
    pub async fn get(&self, url: &str) -> DetectorResult<HttpResponse> {
        self.execute(url, self.timeout).await
    }

    /// Send a GET request with a per-request deadline, overriding the
    /// client default
    pub async fn get_with_timeout(
        &self,
        url: &str,
        timeout_secs: u64,
    ) -> DetectorResult<HttpResponse> {
        self.execute(url, Duration::from_secs(timeout_secs)).await
    }

    async fn execute(&self, url: &str, timeout: Duration) -> DetectorResult<HttpResponse> {
        let mut attempts = 0;
        let mut last_error = None;

        while attempts <= self.max_retries {
            let started = Instant::now();
            let request = self
                .client
                .get(url)
                .header(USER_AGENT, random_user_agent())
                .timeout(timeout);

            match request.send().await {
                Ok(response) => {
                    let status_code = response.status().as_u16();

                    let headers = {
                        let headers = response.headers();
                        let mut map = HashMap::with_capacity(headers.len());
                        for (k, v) in headers.iter() {
                            if let Ok(value) = v.to_str() {
                                map.insert(k.as_str().to_string(), value.to_string());
                            }
                        }
                        map
                    };

                    // Read body with size limit
                    let body_bytes = response.bytes().await.unwrap_or_default();
                    let body = if body_bytes.len() > self.max_body_size {
                        String::from_utf8_lossy(&body_bytes[..self.max_body_size]).to_string()
                    } else {
                        String::from_utf8_lossy(&body_bytes).to_string()
                    };

                    return Ok(HttpResponse {
                        status_code,
                        body,
                        headers,
                        duration_ms: started.elapsed().as_millis() as u64,
                    });
                }
                Err(e) => {
                    last_error = Some(e);
                    attempts += 1;
                    if attempts <= self.max_retries {
                        tokio::time::sleep(Duration::from_millis(100 * attempts as u64)).await;
                    }
                }
            }
        }

        Err(last_error.unwrap().into())
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status_code: u16,
    pub body: String,
    pub headers: HashMap<String, String>,
    pub duration_ms: u64,
}

impl HttpResponse {
    pub fn contains(&self, pattern: &str) -> bool {
        self.body.contains(pattern)
    }

    pub fn header(&self, name: &str) -> Option<String> {
        self.headers.get(&name.to_lowercase()).cloned()
    }

    /// Whether the Content-Type marks a body worth scanning. A missing
    /// header counts as non-text.
    pub fn is_text(&self) -> bool {
        match self.header("content-type") {
            Some(content_type) => {
                let lower = content_type.to_lowercase();
                TEXT_CONTENT_TYPES.iter().any(|t| lower.starts_with(t))
            }
            None => false,
        }
    }

    /// Whether the body should be parsed for further links
    pub fn is_html(&self) -> bool {
        self.header("content-type")
            .map(|ct| ct.to_lowercase().starts_with("text/html"))
            .unwrap_or(false)
    }
}
