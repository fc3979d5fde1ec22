use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FindingType {
    #[serde(rename = "XSS")]
    Xss,
    #[serde(rename = "SQLi")]
    Sqli,
    #[serde(rename = "Missing-CSRF-Token")]
    MissingCsrfToken,
}

impl FindingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingType::Xss => "XSS",
            FindingType::Sqli => "SQLi",
            FindingType::MissingCsrfToken => "Missing-CSRF-Token",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    #[serde(rename = "type")]
    pub finding_type: FindingType,
    pub url: String,
    pub evidence: String,
}

impl Finding {
    pub fn new(finding_type: FindingType, url: impl Into<String>, evidence: impl Into<String>) -> Self {
        Self {
            finding_type,
            url: url.into(),
            evidence: evidence.into(),
        }
    }
}

/// A request that never produced a body: network failure, timeout, or a
/// page that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchFailure {
    pub url: String,
    pub error: String,
}

/// Outcome of one scan. Lists only ever grow, in the order events happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub target: String,
    pub vulns: Vec<Finding>,
    pub errors: Vec<FetchFailure>,
    pub scanned: Vec<String>,
}

impl Report {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            vulns: Vec::new(),
            errors: Vec::new(),
            scanned: Vec::new(),
        }
    }

    pub fn record_finding(&mut self, finding: Finding) {
        self.vulns.push(finding);
    }

    pub fn record_findings(&mut self, findings: impl IntoIterator<Item = Finding>) {
        self.vulns.extend(findings);
    }

    pub fn record_error(&mut self, url: impl Into<String>, error: impl ToString) {
        self.errors.push(FetchFailure {
            url: url.into(),
            error: error.to_string(),
        });
    }

    pub fn record_scanned(&mut self, url: impl Into<String>) {
        self.scanned.push(url.into());
    }

    pub fn findings_of(&self, finding_type: FindingType) -> impl Iterator<Item = &Finding> {
        self.vulns
            .iter()
            .filter(move |f| f.finding_type == finding_type)
    }

    /// Pretty JSON with two-space indentation.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// `report_<host[:port]>.json`, with colons replaced by underscores.
    pub fn file_name(&self) -> String {
        format!("report_{}.json", target_authority(&self.target).replace(':', "_"))
    }

    /// Write the report into `dir`, creating it if needed.
    pub fn persist(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        fs::write(&path, self.to_json()?)?;
        info!("Report written to {}", path.display());
        Ok(path)
    }
}

/// Host plus explicit port of `target`, or an empty string when it has none.
fn target_authority(target: &str) -> String {
    let Ok(url) = Url::parse(target) else {
        return String::new();
    };
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}
