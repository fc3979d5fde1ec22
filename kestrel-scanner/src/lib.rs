pub mod config;
pub mod context;
pub mod crawler;
pub mod detector;
pub mod error;
pub mod fetcher;
pub mod frontier;
pub mod page;
pub mod probe;
pub mod report;
pub mod signatures;

pub use config::ScanConfig;
pub use context::ScanContext;
pub use crawler::{Crawler, ProgressCallback};
pub use error::ScanError;
pub use report::{FetchFailure, Finding, FindingType, Report};
