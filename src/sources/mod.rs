// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Source Adapters - Turning Scan Targets into Text
 *
 * Each adapter produces findings from one kind of target: a single
 * file (or URL-list file), a directory tree, git commit history, or a
 * single URL. Adapters tag findings with their origin so reports can
 * group them; the detection pipeline itself never knows where text
 * came from.
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

pub mod directory;
pub mod files;
pub mod git;
pub mod url;

/// Extensions never worth fetching or reading. One list serves both
/// the directory walker and the crawler's URL filter so the two can
/// never drift apart.
pub const SKIP_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".ico", ".svg", ".mp4", ".webm", ".mp3", ".wav", ".avi",
    ".mov", ".zip", ".tar", ".gz", ".rar", ".7z", ".woff", ".woff2", ".ttf", ".eot", ".exe",
    ".dll", ".so", ".dylib", ".bin", ".dat", ".pyc", ".pyo",
];

/// True when a path or URL path ends in a skipped extension.
pub fn has_skip_extension(path: &str) -> bool {
    let lower = path.to_lowercase();
    SKIP_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_extensions() {
        assert!(has_skip_extension("site/logo.PNG"));
        assert!(has_skip_extension("/var/tmp/archive.tar"));
        assert!(!has_skip_extension("src/config.json"));
        assert!(!has_skip_extension("deploy/.env"));
    }
}
