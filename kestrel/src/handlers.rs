use anyhow::{Context, bail};
use clap::ArgMatches;
use colored::Colorize;
use kestrel_core::report::{ReportFormat, render_report};
use kestrel_core::scan::{ScanOptions, ScanProgressCallback, execute_scan};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;
use url::Url;

/// Message shown when no target was supplied.
pub const TARGET_REQUIRED: &str = "target required";

/// Reject empty targets before any scanning happens.
pub fn validate_target(target: &str) -> Result<String, String> {
    let target = target.trim();
    if target.is_empty() {
        Err(TARGET_REQUIRED.to_string())
    } else {
        Ok(target.to_string())
    }
}

/// Load targets from either a file or a single target argument
pub fn load_targets_from_source(
    target: Option<&String>,
    hosts_file: Option<&PathBuf>,
) -> Result<Vec<String>, String> {
    if let Some(hosts_file_path) = hosts_file {
        load_urls_from_file(hosts_file_path)
    } else if let Some(target) = target {
        Ok(vec![validate_target(target)?])
    } else {
        Err(TARGET_REQUIRED.to_string())
    }
}

/// Read one target per line from `path`. Blank lines are skipped and
/// lines that cannot name a host are logged and dropped.
pub fn load_urls_from_file(path: &PathBuf) -> Result<Vec<String>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read hosts file {}: {}", path.display(), e))?;

    let mut targets = Vec::new();
    for line in content.lines().map(str::trim).filter(|line| !line.is_empty()) {
        match parse_url_line(line) {
            Some(target) => targets.push(target),
            None => warn!("Ignoring hosts file entry without a host: {}", line),
        }
    }

    if targets.is_empty() {
        Err(format!("No valid URLs found in {}", path.display()))
    } else {
        Ok(targets)
    }
}

/// Turn a hosts-file entry into a scan target.
///
/// `localhost:8000` parses as a URL with scheme `localhost` and no host, so
/// a line is only taken verbatim when it already names a host. Otherwise
/// it is retried as `http://<line>`.
pub fn parse_url_line(line: &str) -> Option<String> {
    let has_host = |candidate: &str| {
        Url::parse(candidate)
            .map(|url| url.host_str().is_some_and(|host| !host.is_empty()))
            .unwrap_or(false)
    };

    if has_host(line) {
        return Some(line.to_string());
    }
    let prefixed = format!("http://{}", line);
    has_host(&prefixed).then_some(prefixed)
}

pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    // Logs go to stderr; stdout is reserved for the report.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

pub async fn handle_scan(sub_matches: &ArgMatches, quiet: bool) -> anyhow::Result<()> {
    let target = sub_matches.get_one::<String>("TARGET");
    let hosts_file = sub_matches.get_one::<PathBuf>("hosts-file");
    let max_pages = *sub_matches.get_one::<u64>("max-pages").unwrap_or(&10) as usize;
    let timeout_secs = *sub_matches.get_one::<u64>("timeout").unwrap_or(&10);
    let output_dir = sub_matches
        .get_one::<String>("output-dir")
        .map(|dir| PathBuf::from(shellexpand::tilde(dir).as_ref()))
        .unwrap_or_else(|| PathBuf::from("reports"));
    let format = sub_matches
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Json);

    let targets = match load_targets_from_source(target, hosts_file) {
        Ok(targets) => targets,
        Err(e) => bail!(e),
    };

    if !quiet {
        eprintln!("🔎 Scanning {} target(s)", targets.len());
        eprintln!("Max pages: {}", max_pages);
        eprintln!("Timeout: {}s", timeout_secs);
        eprintln!("Reports: {}\n", output_dir.display());
    }

    let options = ScanOptions {
        targets,
        max_pages,
        timeout_secs,
        output_dir,
        show_progress_bars: !quiet,
    };

    let progress_callback: ScanProgressCallback = Arc::new(move |msg: String| {
        if !quiet {
            eprintln!("{}", msg);
        }
    });

    let outcomes = match execute_scan(options, Some(progress_callback)).await {
        Ok(outcomes) => outcomes,
        Err(e) => bail!("Scan failed: {}", e),
    };

    for outcome in &outcomes {
        let rendered = render_report(&outcome.report, format)
            .with_context(|| format!("Failed to render report for {}", outcome.report.target))?;
        println!("{}", rendered);
        if !quiet {
            eprintln!(
                "{} Report saved to {}",
                "✓".green().bold(),
                outcome.report_path.display().to_string().bright_white()
            );
        }
    }

    Ok(())
}
