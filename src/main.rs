// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Vuoto - Secret Detection Scanner
 * Standalone CLI for hunting leaked credentials
 *
 * Scan sources:
 * - Whole domains (flat sweep or depth-limited crawl)
 * - Single URLs
 * - Local files and directory trees
 * - Git commit history
 * - Domain list files
 *
 * (c) 2026 Bountyy Oy
 */

use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn, Level};

use vuoto_scanner::crawler::WebCrawler;
use vuoto_scanner::http_client::HttpClient;
use vuoto_scanner::reporting::{self, OutputFormat};
use vuoto_scanner::scanner::SecretScanner;
use vuoto_scanner::session::ScanSession;
use vuoto_scanner::sources::{directory, files, git, url};
use vuoto_scanner::types::{CrawlMode, ScanConfig};

/// Vuoto - Secret Detection Scanner
#[derive(Parser)]
#[command(name = "vuoto")]
#[command(author = "Bountyy Oy <info@bountyy.fi>")]
#[command(version = "1.0.0")]
#[command(about = "Finds leaked credentials in websites, files, and git history.", long_about = None)]
struct Cli {
    /// Domain to crawl and scan
    #[arg(short, long)]
    domain: Option<String>,

    /// File of domains to scan, one per line (# comments allowed)
    #[arg(short, long)]
    list: Option<PathBuf>,

    /// Use the depth-limited crawler instead of the flat sweep
    #[arg(long)]
    crawler: bool,

    /// Maximum crawl depth (depth-limited crawler only)
    #[arg(long, default_value = "3")]
    depth: usize,

    /// Maximum pages to fetch per domain
    #[arg(long, default_value = "100")]
    max_pages: usize,

    /// Concurrent page fetches per crawl batch
    #[arg(long, default_value = "10")]
    max_workers: usize,

    /// Scan a local file, or a file of URLs to fetch and scan
    #[arg(long)]
    file: Option<PathBuf>,

    /// Recursively scan a directory tree
    #[arg(long)]
    scan_dir: Option<PathBuf>,

    /// Scan every commit in a git repository's history
    #[arg(long)]
    git_history: Option<PathBuf>,

    /// Scan a single URL
    #[arg(short, long)]
    url: Option<String>,

    /// Write the report to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Stream findings as they are discovered
    #[arg(short, long)]
    verbose: bool,

    /// Seconds between autosaves of partial results
    #[arg(long, default_value = "60")]
    autosave_interval: u64,

    /// Regex for finding values to suppress; repeatable
    #[arg(long)]
    exclude: Vec<String>,

    /// Seconds to pause between crawl batches (0 uses the per-mode default)
    #[arg(long, default_value = "0.0")]
    rate_limit: f64,

    /// Concurrent file scans inside a directory tree
    #[arg(long, default_value = "20")]
    threads: usize,

    /// Skip files larger than this many megabytes
    #[arg(long, default_value = "10")]
    max_file_size: u64,
}

impl Cli {
    fn has_target(&self) -> bool {
        self.domain.is_some()
            || self.list.is_some()
            || self.file.is_some()
            || self.scan_dir.is_some()
            || self.git_history.is_some()
            || self.url.is_some()
    }

    fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            max_pages: self.max_pages,
            max_depth: self.depth,
            max_workers: self.max_workers,
            threads: self.threads,
            crawl_mode: if self.crawler {
                CrawlMode::Deep
            } else {
                CrawlMode::Flat
            },
            rate_limit: self.rate_limit,
            autosave_interval: self.autosave_interval,
            max_file_size_mb: self.max_file_size,
            exclude: self.exclude.clone(),
            verbose: self.verbose,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()),
        )
        .with_target(false)
        .init();

    print_banner();

    if !cli.has_target() {
        eprintln!(
            "No scan target given. Use --domain, --list, --file, --scan-dir, --git-history, or --url.\n"
        );
        let _ = Cli::command().print_help();
        std::process::exit(1);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(num_cpus::get())
        .thread_name("vuoto-scanner")
        .thread_stack_size(3 * 1024 * 1024)
        .max_blocking_threads(512)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cli))
}

async fn async_main(cli: Cli) -> Result<()> {
    // Compile-time Send assertions
    fn assert_send<T: Send>() {}
    assert_send::<Arc<SecretScanner>>();
    assert_send::<Arc<HttpClient>>();
    assert_send::<Arc<ScanSession>>();

    let config = cli.scan_config();
    let scanner = Arc::new(SecretScanner::new(&config.exclude));
    let client = Arc::new(HttpClient::new(30, 3)?);
    let session = ScanSession::new(
        cli.output.clone(),
        cli.format,
        config.autosave_interval,
        cli.verbose,
    );

    let autosave = session.spawn_autosave();
    spawn_interrupt_handler(Arc::clone(&session));

    let started = std::time::Instant::now();
    let mut failures = 0usize;

    if let Some(dir) = &cli.scan_dir {
        match directory::scan_directory(dir, Arc::clone(&scanner), Arc::clone(&client), &config)
            .await
        {
            Ok(findings) => {
                session.add_findings(findings);
            }
            Err(error) => {
                error!("[Directory] {}", error);
                failures += 1;
            }
        }
    }

    if let Some(repo) = &cli.git_history {
        match git::scan_git_history(repo, &scanner).await {
            Ok(findings) => {
                session.add_findings(findings);
            }
            Err(error) => {
                error!("[Git] {}", error);
                failures += 1;
            }
        }
    }

    if let Some(file) = &cli.file {
        match files::scan_file(file, &scanner, &client).await {
            Ok(findings) => {
                session.add_findings(findings);
            }
            Err(error) => {
                error!("[Files] {}", error);
                failures += 1;
            }
        }
    }

    if let Some(target) = &cli.url {
        match url::scan_url(target, &scanner, &client).await {
            Ok(findings) => {
                session.add_findings(findings);
            }
            Err(error) => {
                error!("[Url] {}", error);
                failures += 1;
            }
        }
    }

    if let Some(list) = &cli.list {
        if let Err(error) = scan_domain_list(list, &scanner, &client, &config, &session).await {
            error!("[Files] Could not read domain list: {}", error);
            failures += 1;
        }
    }

    if let Some(domain) = &cli.domain {
        let crawler = WebCrawler::new(Arc::clone(&client), Arc::clone(&scanner), config.clone());
        match crawler.crawl(domain, &session).await {
            Ok(summary) => {
                if !summary.subdomains.is_empty() {
                    info!(
                        "Subdomains observed during crawl: {}",
                        summary.subdomains.join(", ")
                    );
                }
            }
            Err(error) => {
                error!("[Crawler] {}", error);
                failures += 1;
            }
        }
    }

    if let Err(error) = session.flush().await {
        error!("{}", error);
        failures += 1;
    }
    autosave.abort();

    let findings = session.snapshot();
    info!(
        "Scan finished in {:.2}s with {} findings",
        started.elapsed().as_secs_f64(),
        findings.len()
    );

    if cli.output.is_none() {
        if cli.verbose {
            // Findings were already streamed as they came in.
            info!("Total findings: {}", findings.len());
        } else {
            reporting::print_console_summary(&findings);
        }
    }

    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Crawls every domain in a list file with the flat sweep. A failed domain
/// is logged and skipped so the rest of the list still runs.
async fn scan_domain_list(
    path: &Path,
    scanner: &Arc<SecretScanner>,
    client: &Arc<HttpClient>,
    config: &ScanConfig,
    session: &Arc<ScanSession>,
) -> Result<()> {
    let content = tokio::fs::read_to_string(path).await?;
    let domains: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();
    info!(
        "[Files] Loaded {} domains from {}",
        domains.len(),
        path.display()
    );

    for domain in domains {
        if session.is_cancelled() {
            warn!("[Files] Stop requested, skipping remaining domains");
            break;
        }
        let mut list_config = config.clone();
        // List scans always use the flat sweep; a deep crawl per listed
        // domain would make large lists unbounded.
        list_config.crawl_mode = CrawlMode::Flat;
        let crawler = WebCrawler::new(Arc::clone(client), Arc::clone(scanner), list_config);
        if let Err(error) = crawler.crawl(domain, session).await {
            error!("[Crawler] {} failed: {}", domain, error);
        }
        session.checkpoint().await;
    }

    Ok(())
}

/// First interrupt saves whatever has been collected and exits cleanly;
/// a second one during the save aborts immediately.
fn spawn_interrupt_handler(session: Arc<ScanSession>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        warn!("Interrupt received, saving partial results");
        session.cancel();
        tokio::select! {
            result = session.flush() => {
                if let Err(error) = result {
                    error!("{}", error);
                }
                std::process::exit(0);
            }
            _ = tokio::signal::ctrl_c() => {
                std::process::exit(130);
            }
        }
    });
}

fn print_banner() {
    // Green (\x1b[92m), Red (\x1b[91m), White (\x1b[97m), Bold (\x1b[1m), Reset (\x1b[0m)
    print!("\x1b[92m");
    println!("__     ___   _  ___ _____ ___");
    println!("\\ \\   / / | | |/ _ \\_   _/ _ \\");
    println!(" \\ \\ / /| | | | | | || || | | |");
    print!("\x1b[91m");
    println!("  \\ V / | |_| | |_| || || |_| |");
    println!("   \\_/   \\___/ \\___/ |_| \\___/");
    print!("\x1b[0m");
    println!();
    print!("\x1b[1m\x1b[97m");
    println!("        Finds what was never meant to ship");
    print!("\x1b[0m\x1b[92m");
    println!("         v1.0 - (c) 2026 Bountyy Oy");
    print!("\x1b[0m");
    println!();
}
