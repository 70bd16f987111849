// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Detector Error Types
 * Production-ready error handling with thiserror
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::time::Duration;
use thiserror::Error;

/// Main detector error type
#[derive(Error, Debug)]
pub enum DetectorError {
    /// Network-related errors
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// HTTP-related errors
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// Source adapter errors (file, directory, git history)
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Report persistence errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Pattern compilation errors
    #[error("Pattern error: {0}")]
    Pattern(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Timeout errors
    #[error("Operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// General errors
    #[error("Detector error: {0}")]
    General(String),
}

/// Network-specific errors with retryability classification
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Connection timeout after {timeout:?} to {url}")]
    ConnectionTimeout { url: String, timeout: Duration },

    #[error("Connection reset by peer for {url}")]
    ConnectionReset { url: String },

    #[error("Connection refused for {url}")]
    ConnectionRefused { url: String },

    #[error("DNS resolution failed for {host}: {reason}")]
    DnsResolutionFailed { host: String, reason: String },

    #[error("Too many redirects (>{max_redirects}) for {url}")]
    TooManyRedirects { url: String, max_redirects: usize },

    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },

    #[error("Network error: {0}")]
    Other(String),
}

/// HTTP-specific errors with status code classification
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("HTTP {status_code} Client Error for {url}: {message}")]
    ClientError {
        status_code: u16,
        url: String,
        message: String,
    },

    #[error("HTTP {status_code} Server Error for {url}: {message}")]
    ServerError {
        status_code: u16,
        url: String,
        message: String,
    },

    #[error("Unexpected status {status_code} for {url}")]
    UnexpectedStatus { status_code: u16, url: String },

    #[error("Non-text content type {content_type:?} for {url}")]
    NonTextContent {
        url: String,
        content_type: Option<String>,
    },

    #[error("HTTP error: {0}")]
    Other(String),
}

/// Per-source errors from the file, directory and git adapters
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Cannot read file {path}: {reason}")]
    FileUnreadable { path: String, reason: String },

    #[error("Not a directory: {path}")]
    NotADirectory { path: String },

    #[error("Not a git repository: {path}")]
    NotAGitRepository { path: String },

    #[error("git invocation failed: {reason}")]
    GitCommandFailed { reason: String },

    #[error("Source error: {0}")]
    Other(String),
}

/// Errors raised while persisting findings
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Cannot write report to {path}: {reason}")]
    WriteFailed { path: String, reason: String },

    #[error("Report serialization failed: {reason}")]
    SerializationFailed { reason: String },
}

impl NetworkError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            NetworkError::ConnectionTimeout { .. } => true,
            NetworkError::ConnectionReset { .. } => true,
            NetworkError::ConnectionRefused { .. } => false,
            NetworkError::DnsResolutionFailed { .. } => false,
            NetworkError::TooManyRedirects { .. } => false,
            NetworkError::InvalidUrl { .. } => false,
            NetworkError::Other(_) => false,
        }
    }
}

impl HttpError {
    /// Check if HTTP error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            HttpError::ServerError { status_code, .. } => {
                matches!(status_code, 500 | 502 | 503 | 504)
            }
            HttpError::ClientError { status_code, .. } => {
                matches!(status_code, 408 | 429)
            }
            _ => false,
        }
    }
}

impl DetectorError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            DetectorError::Network(e) => e.is_retryable(),
            DetectorError::Http(e) => e.is_retryable(),
            DetectorError::Timeout { .. } => true,
            _ => false,
        }
    }
}

/// Convert reqwest errors to our error types
impl From<reqwest::Error> for DetectorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DetectorError::Network(NetworkError::ConnectionTimeout {
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
                timeout: Duration::from_secs(15),
            })
        } else if err.is_connect() {
            if let Some(url) = err.url() {
                DetectorError::Network(NetworkError::ConnectionRefused {
                    url: url.to_string(),
                })
            } else {
                DetectorError::Network(NetworkError::Other(err.to_string()))
            }
        } else if err.is_redirect() {
            DetectorError::Network(NetworkError::TooManyRedirects {
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
                max_redirects: 5,
            })
        } else if err.is_status() {
            let status = err.status().map(|s| s.as_u16()).unwrap_or(0);
            let url = err.url().map(|u| u.to_string()).unwrap_or_default();

            if (400..500).contains(&status) {
                DetectorError::Http(HttpError::ClientError {
                    status_code: status,
                    url,
                    message: err.to_string(),
                })
            } else {
                DetectorError::Http(HttpError::ServerError {
                    status_code: status,
                    url,
                    message: err.to_string(),
                })
            }
        } else {
            DetectorError::General(err.to_string())
        }
    }
}

/// Result type for detector operations
pub type DetectorResult<T> = Result<T, DetectorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_retryability() {
        let timeout = NetworkError::ConnectionTimeout {
            url: "https://example.com".to_string(),
            timeout: Duration::from_secs(10),
        };
        assert!(timeout.is_retryable());

        let invalid = NetworkError::InvalidUrl {
            url: "not a url".to_string(),
        };
        assert!(!invalid.is_retryable());
    }

    #[test]
    fn test_http_retryability() {
        let unavailable = HttpError::ServerError {
            status_code: 503,
            url: "https://example.com".to_string(),
            message: "service unavailable".to_string(),
        };
        assert!(unavailable.is_retryable());

        let not_found = HttpError::ClientError {
            status_code: 404,
            url: "https://example.com/missing".to_string(),
            message: "not found".to_string(),
        };
        assert!(!not_found.is_retryable());
    }

    #[test]
    fn test_top_level_retryability_delegates() {
        let err: DetectorError = NetworkError::ConnectionReset {
            url: "https://example.com".to_string(),
        }
        .into();
        assert!(err.is_retryable());

        let err: DetectorError = SourceError::NotADirectory {
            path: "/tmp/missing".to_string(),
        }
        .into();
        assert!(!err.is_retryable());
    }
}
