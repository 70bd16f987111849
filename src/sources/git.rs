// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use std::path::Path;
use tokio::process::Command;
use tracing::{info, warn};

use crate::errors::{DetectorResult, SourceError};
use crate::scanner::SecretScanner;
use crate::types::Finding;

/// Scan every commit in a repository's history, oldest first, looking
/// only at added diff lines. Findings tag the commit hash and the line
/// they were introduced on.
pub async fn scan_git_history(
    repo: &Path,
    scanner: &SecretScanner,
) -> DetectorResult<Vec<Finding>> {
    // named `repo_display`, not `display`: a local called `display` is
    // shadowed inside tracing's event macros by `tracing::field::display`
    let repo_display = repo.display().to_string();
    if !repo.join(".git").exists() {
        return Err(SourceError::NotAGitRepository { path: repo_display }.into());
    }

    let output = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(["rev-list", "--reverse", "--all"])
        .output()
        .await
        .map_err(|e| SourceError::GitCommandFailed {
            reason: e.to_string(),
        })?;
    if !output.status.success() {
        return Err(SourceError::GitCommandFailed {
            reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into());
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let commits: Vec<&str> = stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    info!("[Git] {} commits in history of {}", commits.len(), repo_display);

    let mut findings = Vec::new();
    for commit in commits {
        let diff = Command::new("git")
            .arg("-C")
            .arg(repo)
            .args(["show", commit, "--unified=0", "--pretty=format:", "--no-color"])
            .output()
            .await;
        let diff = match diff {
            Ok(out) if out.status.success() => String::from_utf8_lossy(&out.stdout).to_string(),
            Ok(out) => {
                warn!(
                    "[Git] git show {} failed: {}",
                    commit,
                    String::from_utf8_lossy(&out.stderr).trim()
                );
                continue;
            }
            Err(e) => {
                warn!("[Git] git show {} failed: {}", commit, e);
                continue;
            }
        };

        for line in diff.lines() {
            // added lines only, the +++ file header is not content
            if line.starts_with('+') && !line.starts_with("+++") {
                let mut line_findings = scanner.scan_text(line, None);
                for finding in &mut line_findings {
                    finding.commit = Some(commit.to_string());
                    finding.line = Some(line[1..].trim().to_string());
                }
                findings.extend(line_findings);
            }
        }
    }
    info!(
        "[Git] Scanned history, found {} potential secrets",
        findings.len()
    );
    Ok(findings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_non_repository_is_an_error() {
        let scanner = SecretScanner::new(&[]);
        let dir = tempfile::tempdir().unwrap();

        let result = scan_git_history(dir.path(), &scanner).await;
        match result {
            Err(e) => assert!(e.to_string().contains("Not a git repository")),
            Ok(_) => panic!("plain directory must not scan as a repository"),
        }
    }
}
