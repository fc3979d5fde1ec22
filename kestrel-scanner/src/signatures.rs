// Static detection rules: injected payloads and database error signatures

/// Reflected-script probe. The mixed case slips past naive case-sensitive
/// filters on the target; detection compares case-insensitively.
pub const XSS_PAYLOAD: &str = "<scRiPt>qwerty_alert()</scRiPt>";

/// Classic tautology payload. Catalogued but never injected: SQL injection is
/// detected passively from whatever response the XSS probe produces.
pub const SQLI_PAYLOAD: &str = "' OR '1'='1";

/// Placeholder field name for inputs that carry neither `name` nor `id`.
pub const FALLBACK_FIELD_NAME: &str = "payload";

pub const SQL_ERROR_EVIDENCE: &str = "sql_error_pattern";
pub const MISSING_CSRF_EVIDENCE: &str = "no-hidden-token";

/// Input types that are never filled with a payload.
pub const NON_INJECTABLE_TYPES: &[&str] = &["submit", "button", "checkbox", "radio"];

/// Substrings that mark a hidden input as an anti-forgery token.
pub const CSRF_TOKEN_MARKERS: &[&str] = &["csrf", "token"];

/// A database error message fragment, matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlErrorSignature {
    pub engine: &'static str,
    pub fragment: &'static str,
}

impl SqlErrorSignature {
    /// `haystack` must already be lower-cased.
    pub fn matches_lowercase(&self, haystack: &str) -> bool {
        haystack.contains(&self.fragment.to_lowercase())
    }
}

/// Checked in order; the first hit is enough to flag a response.
pub const SQL_ERROR_SIGNATURES: &[SqlErrorSignature] = &[
    SqlErrorSignature {
        engine: "mysql",
        fragment: "You have an error in your SQL syntax",
    },
    SqlErrorSignature {
        engine: "mysql",
        fragment: "Warning: mysql",
    },
    SqlErrorSignature {
        engine: "mssql",
        fragment: "Unclosed quotation mark after the character string",
    },
    SqlErrorSignature {
        engine: "sqlite",
        fragment: "sqlite3.OperationalError",
    },
    SqlErrorSignature {
        engine: "generic",
        fragment: "syntax error",
    },
];

/// Returns the first signature found in `body`, if any.
pub fn find_sql_error(body: &str) -> Option<&'static SqlErrorSignature> {
    let lowered = body.to_lowercase();
    SQL_ERROR_SIGNATURES
        .iter()
        .find(|signature| signature.matches_lowercase(&lowered))
}
