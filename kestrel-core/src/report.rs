// Rendering of finished scan reports

use crate::scan::extract_url_path;
use colored::Colorize;
use kestrel_scanner::report::{FindingType, Report};
use std::collections::BTreeMap;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Text,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(ReportFormat::Json),
            "text" | "txt" => Some(ReportFormat::Text),
            _ => None,
        }
    }
}

pub fn render_report(report: &Report, format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Json => serde_json::to_string_pretty(report),
        ReportFormat::Text => Ok(generate_text_report(report)),
    }
}

fn colored_type(finding_type: FindingType) -> String {
    match finding_type {
        FindingType::Xss => finding_type.as_str().red().bold().to_string(),
        FindingType::Sqli => finding_type.as_str().red().bold().to_string(),
        FindingType::MissingCsrfToken => finding_type.as_str().yellow().bold().to_string(),
    }
}

pub fn generate_text_report(report: &Report) -> String {
    let rule = "━".repeat(60);
    let mut out = String::new();

    out.push_str(&format!("{}\n", rule));
    out.push_str("                 KESTREL SCAN REPORT\n");
    out.push_str(&format!("{}\n\n", rule));

    out.push_str(&format!("Target:       {}\n", report.target));
    out.push_str(&format!(
        "Generated:    {}\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    out.push_str(&format!("Pages:        {}\n", report.scanned.len()));
    out.push_str(&format!("Findings:     {}\n", report.vulns.len()));
    out.push_str(&format!("Errors:       {}\n\n", report.errors.len()));

    for finding_type in [
        FindingType::Xss,
        FindingType::Sqli,
        FindingType::MissingCsrfToken,
    ] {
        out.push_str(&format!(
            "  {:<20} {}\n",
            finding_type.as_str(),
            report.findings_of(finding_type).count()
        ));
    }
    out.push('\n');

    if !report.vulns.is_empty() {
        out.push_str(&format!("{}\nFINDINGS\n{}\n\n", rule, rule));
        for (idx, finding) in report.vulns.iter().enumerate() {
            out.push_str(&format!(
                "[{}] {} {}\n",
                idx + 1,
                colored_type(finding.finding_type),
                finding.url
            ));
            out.push_str(&format!("    evidence: {}\n", finding.evidence));
        }
        out.push('\n');
    }

    if !report.errors.is_empty() {
        out.push_str(&format!("{}\nERRORS\n{}\n\n", rule, rule));
        for error in &report.errors {
            out.push_str(&format!("  {} {}\n", "✗".red(), error.url));
            out.push_str(&format!("    {}\n", error.error.bright_black()));
        }
        out.push('\n');
    }

    // Group scanned pages by host
    let mut by_host: BTreeMap<String, Vec<&String>> = BTreeMap::new();
    for url in &report.scanned {
        let host = Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| "unknown".to_string());
        by_host.entry(host).or_default().push(url);
    }

    out.push_str(&format!("{}\nSCANNED PAGES\n{}\n\n", rule, rule));
    for (host, urls) in &by_host {
        out.push_str(&format!("## {}\n", host));
        for url in urls {
            let query = Url::parse(url)
                .ok()
                .and_then(|u| u.query().map(|q| format!("?{}", q)))
                .unwrap_or_default();
            out.push_str(&format!("  {}{}\n", extract_url_path(url), query));
        }
        out.push('\n');
    }

    out
}
