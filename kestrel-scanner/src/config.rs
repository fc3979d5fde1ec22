use std::path::PathBuf;

pub const DEFAULT_MAX_PAGES: usize = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_OUTPUT_DIR: &str = "reports";
pub const DEFAULT_REDIRECT_LIMIT: usize = 10;

/// Tunables for a single scan. Every scan builds its own HTTP context from
/// these, so nothing here is shared between scans.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Upper bound on the number of distinct pages fetched by the crawl loop.
    pub max_pages: usize,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Directory the JSON report is written into. Created on demand.
    pub output_dir: PathBuf,
    pub redirect_limit: usize,
}

impl ScanConfig {
    pub fn new() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: format!("Kestrel/{}", env!("CARGO_PKG_VERSION")),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            redirect_limit: DEFAULT_REDIRECT_LIMIT,
        }
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_redirect_limit(mut self, redirect_limit: usize) -> Self {
        self.redirect_limit = redirect_limit;
        self
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new()
    }
}
