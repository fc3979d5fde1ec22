use crate::config::ScanConfig;
use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::signatures::XSS_PAYLOAD;

/// Everything a single scan shares between its components. Built fresh for
/// each scan so cookies never leak from one target to another.
#[derive(Clone)]
pub struct ScanContext {
    pub fetcher: Fetcher,
    pub config: ScanConfig,
    pub payload: &'static str,
}

impl ScanContext {
    pub fn new(config: ScanConfig) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(&config)?,
            config,
            payload: XSS_PAYLOAD,
        })
    }
}
