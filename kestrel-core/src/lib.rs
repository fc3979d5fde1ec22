use colored::Colorize;

pub mod report;
pub mod scan;

pub use kestrel_scanner as scanner;

const BANNER: &str = r#"
  _               _           _
 | | _____  ___  | |_ _ __ ___| |
 | |/ / _ \/ __| | __| '__/ _ \ |
 |   <  __/\__ \ | |_| | |  __/ |
 |_|\_\___||___/  \__|_|  \___|_|
"#;

/// Printed to stderr so stdout stays clean for the report.
pub fn print_banner() {
    eprintln!("{}", BANNER.bright_cyan().bold());
    eprintln!(
        "  {} {}\n",
        "crawl-and-probe web scanner".bright_white(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
    );
    eprintln!("{}\n", "  For authorized security testing only.".yellow());
}
