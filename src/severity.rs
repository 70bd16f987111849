// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use crate::types::Severity;

// Substring tables checked in order; first hit wins. Substrings so that
// variants like "AWS Access Key (env)" classify with their base type.
const CRITICAL_TYPES: &[&str] = &[
    "SSH Private Key",
    "DSA Private Key",
    "EC Private Key",
    "PGP Private Key",
    "AWS Access Key",
    "AWS Secret Key",
    "Google Private Key Block",
    "Firebase API Key",
    "Google OAuth Access Token",
    "Google API Key",
];

const HIGH_TYPES: &[&str] = &[
    "JWT Token",
    "Bearer Token",
    "Password/Secret",
    "Hardcoded Secret",
    "Stripe Publishable Key",
    "Twilio Account SID",
    "Twilio Auth Token",
    "GitHub Token",
    "GitLab Token",
    "API Key/Token",
];

const LOW_TYPES: &[&str] = &[
    "Email",
    "URL",
    "IP Address",
    "UUID",
    "Google Analytics ID",
    "Session Cookie",
    "Set-Cookie",
];

/// Classify a finding type into a severity. A critical scan context
/// (credential-store path) overrides the type tables entirely.
pub fn classify(kind: &str, critical_context: bool) -> Severity {
    if critical_context {
        return Severity::Critical;
    }
    if CRITICAL_TYPES.iter().any(|t| kind.contains(t)) {
        return Severity::Critical;
    }
    if HIGH_TYPES.iter().any(|t| kind.contains(t)) {
        return Severity::High;
    }
    if LOW_TYPES.iter().any(|t| kind.contains(t)) {
        return Severity::Low;
    }
    Severity::Medium
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_critical_types() {
        assert_eq!(classify("SSH Private Key", false), Severity::Critical);
        assert_eq!(classify("AWS Access Key", false), Severity::Critical);
        assert_eq!(classify("AWS Access Key (env)", false), Severity::Critical);
        assert_eq!(classify("Google API Key", false), Severity::Critical);
    }

    #[test]
    fn test_high_types() {
        assert_eq!(classify("JWT Token", false), Severity::High);
        assert_eq!(classify("JWT Token (generic)", false), Severity::High);
        assert_eq!(classify("GitHub Token", false), Severity::High);
        assert_eq!(classify("Hardcoded Secret", false), Severity::High);
    }

    #[test]
    fn test_low_types() {
        assert_eq!(classify("Email", false), Severity::Low);
        assert_eq!(classify("IP Address", false), Severity::Low);
        assert_eq!(classify("Session Cookie", false), Severity::Low);
    }

    #[test]
    fn test_default_is_medium() {
        assert_eq!(classify("Telegram Bot Token", false), Severity::Medium);
        assert_eq!(classify("bcrypt Hash", false), Severity::Medium);
    }

    #[test]
    fn test_critical_context_overrides_tables() {
        assert_eq!(classify("Email", true), Severity::Critical);
        assert_eq!(classify("Telegram Bot Token", true), Severity::Critical);
    }
}
