// Tests for report rendering

use kestrel_core::report::{ReportFormat, generate_text_report, render_report};
use kestrel_scanner::report::{Finding, FindingType, Report};
use serde_json::Value;

fn sample_report() -> Report {
    let mut report = Report::new("http://test.local/");
    report.record_scanned("http://test.local/");
    report.record_scanned("http://test.local/item?id=5");
    report.record_finding(Finding::new(
        FindingType::Xss,
        "http://test.local/search",
        "<scRiPt>qwerty_alert()</scRiPt>",
    ));
    report.record_finding(Finding::new(
        FindingType::MissingCsrfToken,
        "http://test.local/search",
        "no-hidden-token",
    ));
    report.record_error("http://test.local/down", "connection refused");
    report
}

// ============================================================================
// Report Format Tests
// ============================================================================

#[test]
fn test_report_format_from_str() {
    assert_eq!(ReportFormat::from_str("json"), Some(ReportFormat::Json));
    assert_eq!(ReportFormat::from_str("text"), Some(ReportFormat::Text));
    assert_eq!(ReportFormat::from_str("txt"), Some(ReportFormat::Text));
}

#[test]
fn test_report_format_from_str_case_insensitive() {
    assert_eq!(ReportFormat::from_str("JSON"), Some(ReportFormat::Json));
    assert_eq!(ReportFormat::from_str("Text"), Some(ReportFormat::Text));
}

#[test]
fn test_report_format_from_str_invalid() {
    assert!(ReportFormat::from_str("pdf").is_none());
    assert!(ReportFormat::from_str("").is_none());
}

// ============================================================================
// Rendering Tests
// ============================================================================

#[test]
fn test_render_json_matches_artifact_shape() {
    let rendered = render_report(&sample_report(), ReportFormat::Json).unwrap();
    let value: Value = serde_json::from_str(&rendered).unwrap();

    assert_eq!(value["target"], "http://test.local/");
    assert_eq!(value["vulns"][0]["type"], "XSS");
    assert_eq!(value["vulns"][1]["type"], "Missing-CSRF-Token");
    assert_eq!(value["vulns"][1]["evidence"], "no-hidden-token");
    assert_eq!(value["errors"][0]["error"], "connection refused");
    assert_eq!(value["scanned"].as_array().unwrap().len(), 2);
    assert_eq!(value.as_object().unwrap().len(), 4);
}

#[test]
fn test_text_report_summary() {
    let text = generate_text_report(&sample_report());

    assert!(text.contains("KESTREL SCAN REPORT"));
    assert!(text.contains("Target:       http://test.local/"));
    assert!(text.contains("Pages:        2"));
    assert!(text.contains("Findings:     2"));
    assert!(text.contains("Errors:       1"));
    assert!(text.contains("http://test.local/search"));
    assert!(text.contains("evidence: no-hidden-token"));
    assert!(text.contains("http://test.local/down"));
    assert!(text.contains("## test.local"));
    assert!(text.contains("/item?id=5"));
}

#[test]
fn test_text_report_empty_sections_omitted() {
    let mut report = Report::new("http://test.local/");
    report.record_scanned("http://test.local/");

    let text = generate_text_report(&report);
    assert!(!text.contains("FINDINGS\n"));
    assert!(!text.contains("ERRORS\n"));
    assert!(text.contains("SCANNED PAGES"));
}
