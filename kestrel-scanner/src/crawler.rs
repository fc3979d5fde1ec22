use crate::config::ScanConfig;
use crate::context::ScanContext;
use crate::error::{Result, ScanError};
use crate::frontier::Frontier;
use crate::page::Page;
use crate::probe;
use crate::report::Report;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Called with the 1-based page number and URL before each page is fetched.
pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

/// Breadth-first crawl-and-probe loop. Pages are fetched strictly one at a
/// time in FIFO order, so identical sites always produce identical scans.
pub struct Crawler {
    config: ScanConfig,
    progress_callback: Option<ProgressCallback>,
}

impl Crawler {
    pub fn new() -> Self {
        Self::with_config(ScanConfig::default())
    }

    pub fn with_config(config: ScanConfig) -> Self {
        Self {
            config,
            progress_callback: None,
        }
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.config.max_pages = max_pages;
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.config.timeout_secs = timeout_secs;
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = output_dir.into();
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Crawl `target` and probe every page found on its host.
    ///
    /// Per-page and per-probe failures end up in the report. An unparseable
    /// target yields a report with a single error and nothing scanned. Only
    /// a failure to build the HTTP client is returned as `Err`.
    pub async fn scan(&self, target: &str) -> Result<Report> {
        info!(
            "Starting scan of {} (max {} pages)",
            target, self.config.max_pages
        );

        let mut report = Report::new(target);

        let (start_url, target_host) = match Self::parse_target(target) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Cannot scan {}: {}", target, e);
                report.record_error(target, e);
                return Ok(report);
            }
        };

        let ctx = ScanContext::new(self.config.clone())?;
        let mut frontier = Frontier::with_seed(start_url);

        while frontier.visited_count() < self.config.max_pages {
            let Some(url) = frontier.next_unvisited() else {
                break;
            };
            report.record_scanned(url.as_str());

            if let Some(ref callback) = self.progress_callback {
                callback(report.scanned.len(), url.clone());
            }

            let page = match Self::fetch_page(&ctx, &url).await {
                Ok(page) => page,
                Err(e) => {
                    warn!("Fetch error for {}: {}", url, e);
                    report.record_error(url.as_str(), e);
                    continue;
                }
            };

            for form in &page.forms {
                probe::probe_form(&ctx, form, &mut report).await;
            }
            probe::probe_query_params(&ctx, &page, &mut report).await;

            for link in &page.links {
                if Self::is_same_host(link, &target_host) && frontier.enqueue(link.as_str()) {
                    debug!("Queued {}", link);
                }
            }
        }

        info!(
            "Scan of {} complete. {} pages, {} findings, {} errors",
            target,
            report.scanned.len(),
            report.vulns.len(),
            report.errors.len()
        );
        Ok(report)
    }

    /// Scan, then write the report into the configured output directory.
    pub async fn scan_and_persist(&self, target: &str) -> Result<(Report, PathBuf)> {
        let report = self.scan(target).await?;
        let path = report.persist(&self.config.output_dir)?;
        Ok((report, path))
    }

    fn parse_target(target: &str) -> Result<(String, String)> {
        let mut url = Url::parse(target.trim())?;
        url.set_fragment(None);
        let host = url
            .host_str()
            .ok_or_else(|| ScanError::InvalidUrl(format!("{} has no host", target)))?
            .to_string();
        Ok((url.to_string(), host))
    }

    /// Fetch and parse share one failure boundary.
    async fn fetch_page(ctx: &ScanContext, url: &str) -> Result<Page> {
        let body = ctx.fetcher.get(url, &[]).await?;
        Page::analyze(url, body)
    }

    fn is_same_host(url: &str, target_host: &str) -> bool {
        Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(|host| host == target_host))
            .unwrap_or(false)
    }
}

impl Default for Crawler {
    fn default() -> Self {
        Self::new()
    }
}
