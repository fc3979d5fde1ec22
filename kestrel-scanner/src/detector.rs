// Pattern-based classification of probe responses and forms

use crate::page::FormDescriptor;
use crate::report::{Finding, FindingType};
use crate::signatures::{
    self, CSRF_TOKEN_MARKERS, MISSING_CSRF_EVIDENCE, SQL_ERROR_EVIDENCE,
};
use tracing::debug;

/// The injected payload appears in `body`, ignoring letter case.
pub fn is_reflected(body: &str, payload: &str) -> bool {
    body.to_lowercase().contains(&payload.to_lowercase())
}

/// Run the response classifiers over a probe response. Both may fire.
pub fn inspect_response(url: &str, body: &str, payload: &str) -> Vec<Finding> {
    let mut findings = Vec::new();

    if is_reflected(body, payload) {
        debug!("Payload reflected at {}", url);
        findings.push(Finding::new(FindingType::Xss, url, payload));
    }

    if let Some(signature) = signatures::find_sql_error(body) {
        debug!("{} error signature at {}", signature.engine, url);
        findings.push(Finding::new(FindingType::Sqli, url, SQL_ERROR_EVIDENCE));
    }

    findings
}

/// A hidden input whose name looks like an anti-forgery token.
pub fn has_csrf_token(form: &FormDescriptor) -> bool {
    form.inputs.iter().any(|input| {
        if input.input_type != "hidden" || input.name.is_empty() {
            return false;
        }
        let name = input.name.to_lowercase();
        CSRF_TOKEN_MARKERS.iter().any(|marker| name.contains(marker))
    })
}

/// Flag `form` when it carries no anti-forgery token. Independent of any
/// probe response.
pub fn check_csrf(form: &FormDescriptor) -> Option<Finding> {
    if has_csrf_token(form) {
        None
    } else {
        Some(Finding::new(
            FindingType::MissingCsrfToken,
            form.action.as_str(),
            MISSING_CSRF_EVIDENCE,
        ))
    }
}
