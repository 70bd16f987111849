// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use tracing::{info, warn};

use crate::errors::DetectorResult;
use crate::http_client::HttpClient;
use crate::scanner::SecretScanner;
use crate::types::Finding;

const URL_FETCH_TIMEOUT_SECS: u64 = 15;

/// Fetch a single URL and scan its body. Non-200 responses and
/// non-text bodies yield nothing; network failures propagate so the
/// caller can report them.
pub async fn scan_url(
    target: &str,
    scanner: &SecretScanner,
    client: &HttpClient,
) -> DetectorResult<Vec<Finding>> {
    info!("[Url] Scanning {}", target);
    let response = client.get_with_timeout(target, URL_FETCH_TIMEOUT_SECS).await?;

    if response.status_code != 200 {
        warn!(
            "[Url] Could not access {} (status {})",
            target, response.status_code
        );
        return Ok(Vec::new());
    }
    if !response.is_text() {
        warn!(
            "[Url] Content type {:?} of {} not supported for scanning",
            response.header("content-type"),
            target
        );
        return Ok(Vec::new());
    }

    let mut findings = scanner.scan_text(&response.body, Some(target));
    for finding in &mut findings {
        finding.url = Some(target.to_string());
    }
    Ok(findings)
}
