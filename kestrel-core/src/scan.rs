use indicatif::{ProgressBar, ProgressStyle};
use kestrel_scanner::report::Report;
use kestrel_scanner::{Crawler, ScanConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;
use url::Url;

/// Options for configuring a scan run
pub struct ScanOptions {
    pub targets: Vec<String>,
    pub max_pages: usize,
    pub timeout_secs: u64,
    pub output_dir: PathBuf,
    pub show_progress_bars: bool,
}

impl ScanOptions {
    pub fn for_target(target: impl Into<String>) -> Self {
        let defaults = ScanConfig::default();
        Self {
            targets: vec![target.into()],
            max_pages: defaults.max_pages,
            timeout_secs: defaults.timeout_secs,
            output_dir: defaults.output_dir,
            show_progress_bars: false,
        }
    }

    fn scan_config(&self) -> ScanConfig {
        ScanConfig::new()
            .with_max_pages(self.max_pages)
            .with_timeout(self.timeout_secs)
            .with_output_dir(self.output_dir.clone())
    }
}

/// A finished scan and where its report was written
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub report: Report,
    pub report_path: PathBuf,
}

/// Callback for reporting scan progress messages
pub type ScanProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

/// Scan every target in turn. Each target gets its own HTTP session and its
/// own persisted report.
pub async fn execute_scan(
    options: ScanOptions,
    progress_callback: Option<ScanProgressCallback>,
) -> Result<Vec<ScanOutcome>, String> {
    if options.targets.is_empty() {
        return Err("No targets provided".to_string());
    }
    if options.max_pages == 0 {
        return Err("Page bound must be at least 1".to_string());
    }

    let config = options.scan_config();

    let progress_bar = if options.show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .map_err(|e| format!("Invalid progress template: {}", e))?,
        );
        pb.set_message("Starting scan...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let mut crawler = Crawler::with_config(config);
    if let Some(ref pb) = progress_bar {
        let pb_clone = pb.clone();
        crawler = crawler.with_progress_callback(Arc::new(move |count: usize, url: String| {
            pb_clone.set_message(format!(
                "Scanning page {}: {}",
                count,
                extract_url_path(&url)
            ));
            pb_clone.tick();
        }));
    }

    let total = options.targets.len();
    let mut outcomes = Vec::new();
    for (idx, target) in options.targets.iter().enumerate() {
        if let Some(ref callback) = progress_callback
            && total > 1
        {
            callback(format!("Scanning target {}/{}: {}", idx + 1, total, target));
        }

        match crawler.scan_and_persist(target).await {
            Ok((report, report_path)) => outcomes.push(ScanOutcome {
                report,
                report_path,
            }),
            Err(e) => {
                warn!("Scan of {} failed: {}", target, e);
                if let Some(ref callback) = progress_callback {
                    callback(format!("[!] Failed to scan {}: {}", target, e));
                }
            }
        }
    }

    if let Some(ref pb) = progress_bar {
        let pages: usize = outcomes.iter().map(|o| o.report.scanned.len()).sum();
        pb.finish_with_message(format!("Scan complete! {} pages scanned", pages));
    }

    Ok(outcomes)
}
