pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    load_targets_from_source, load_urls_from_file, parse_url_line, validate_target,
};

// Re-export scan functionality from kestrel-core
pub use kestrel_core::scan::{ScanOptions, ScanOutcome, execute_scan, extract_url_path};
