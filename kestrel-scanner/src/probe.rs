use crate::context::ScanContext;
use crate::detector;
use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::page::{FormDescriptor, Page};
use crate::report::Report;
use crate::signatures::{FALLBACK_FIELD_NAME, NON_INJECTABLE_TYPES};
use tracing::{debug, warn};
use url::{Url, form_urlencoded};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeMethod {
    Get,
    Post,
}

/// A request carrying the payload into a form or a query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    pub url: String,
    pub method: ProbeMethod,
    /// Sent as the query string for GET, as the form body for POST.
    pub fields: Vec<(String, String)>,
}

impl Probe {
    pub async fn send(&self, fetcher: &Fetcher) -> Result<String> {
        match self.method {
            ProbeMethod::Get => fetcher.get(&self.url, &self.fields).await,
            ProbeMethod::Post => fetcher.post(&self.url, &self.fields).await,
        }
    }
}

/// One probe for `form`: every fillable input gets `payload`. Inputs with no
/// name share the `payload` key, so they collapse into a single field.
pub fn build_form_probe(form: &FormDescriptor, payload: &str) -> Probe {
    let mut fields: Vec<(String, String)> = Vec::new();

    for input in &form.inputs {
        if NON_INJECTABLE_TYPES.contains(&input.input_type.as_str()) {
            continue;
        }
        let key = if input.name.is_empty() {
            FALLBACK_FIELD_NAME
        } else {
            input.name.as_str()
        };
        match fields.iter_mut().find(|field| field.0 == key) {
            Some(field) => field.1 = payload.to_string(),
            None => fields.push((key.to_string(), payload.to_string())),
        }
    }

    Probe {
        url: form.action.clone(),
        method: if form.is_post() {
            ProbeMethod::Post
        } else {
            ProbeMethod::Get
        },
        fields,
    }
}

/// One GET probe per query key of `url`, each replacing only that key's
/// first value. Every other segment of the raw query is kept byte for byte.
pub fn build_param_probes(url: &Url, params: &[(String, String)], payload: &str) -> Vec<Probe> {
    let query = url.query().unwrap_or_default();
    let encoded_payload: String = form_urlencoded::byte_serialize(payload.as_bytes()).collect();

    params
        .iter()
        .map(|(target_key, _)| {
            let mut replaced = false;
            let segments: Vec<String> = query
                .split('&')
                .map(|segment| {
                    let raw_key = segment.split('=').next().unwrap_or_default();
                    if !replaced && segment_key(segment) == *target_key {
                        replaced = true;
                        format!("{}={}", raw_key, encoded_payload)
                    } else {
                        segment.to_string()
                    }
                })
                .collect();

            let mut probe_url = url.clone();
            probe_url.set_query(Some(&segments.join("&")));
            Probe {
                url: probe_url.to_string(),
                method: ProbeMethod::Get,
                fields: Vec::new(),
            }
        })
        .collect()
}

/// Decoded key of a raw `key=value` query segment.
fn segment_key(segment: &str) -> String {
    form_urlencoded::parse(segment.as_bytes())
        .next()
        .map(|(key, _)| key.into_owned())
        .unwrap_or_default()
}

/// Probe a form, classify the response, then check it for an anti-forgery
/// token. A failed request is recorded and the token check still runs.
pub async fn probe_form(ctx: &ScanContext, form: &FormDescriptor, report: &mut Report) {
    let probe = build_form_probe(form, ctx.payload);
    debug!(
        "Probing form {} {:?} with {} fields",
        probe.url,
        probe.method,
        probe.fields.len()
    );

    match probe.send(&ctx.fetcher).await {
        Ok(body) => report.record_findings(detector::inspect_response(&probe.url, &body, ctx.payload)),
        Err(e) => {
            warn!("Form probe failed for {}: {}", probe.url, e);
            report.record_error(probe.url.as_str(), e);
        }
    }

    if let Some(finding) = detector::check_csrf(form) {
        report.record_finding(finding);
    }
}

/// Probe each query parameter of the page's own URL. Does nothing when the
/// URL has no query string.
pub async fn probe_query_params(ctx: &ScanContext, page: &Page, report: &mut Report) {
    if !page.has_query() || page.params.is_empty() {
        return;
    }
    let Ok(url) = Url::parse(&page.url) else {
        return;
    };

    for probe in build_param_probes(&url, &page.params, ctx.payload) {
        debug!("Probing parameter via {}", probe.url);
        match probe.send(&ctx.fetcher).await {
            Ok(body) => report.record_findings(detector::inspect_response(&probe.url, &body, ctx.payload)),
            Err(e) => {
                warn!("Parameter probe failed for {}: {}", probe.url, e);
                report.record_error(probe.url.as_str(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScanConfig;
    use crate::page::{self, InputDescriptor};
    use crate::report::FindingType;
    use crate::signatures::XSS_PAYLOAD;
    use wiremock::{
        matchers::{body_string_contains, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    fn input(name: &str, input_type: &str) -> InputDescriptor {
        InputDescriptor {
            name: name.to_string(),
            input_type: input_type.to_string(),
        }
    }

    fn context() -> ScanContext {
        ScanContext::new(ScanConfig::default().with_timeout(2)).unwrap()
    }

    #[test]
    fn test_form_probe_skips_buttons_and_choices() {
        let form = FormDescriptor {
            action: "http://test.local/login".to_string(),
            method: "post".to_string(),
            inputs: vec![
                input("user", "text"),
                input("pass", "password"),
                input("remember", "checkbox"),
                input("plan", "radio"),
                input("go", "submit"),
                input("reset", "button"),
                input("csrf", "hidden"),
            ],
        };

        let probe = build_form_probe(&form, XSS_PAYLOAD);
        assert_eq!(probe.method, ProbeMethod::Post);
        assert_eq!(probe.url, "http://test.local/login");
        let keys: Vec<&str> = probe.fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["user", "pass", "csrf"]);
        assert!(probe.fields.iter().all(|(_, v)| v == XSS_PAYLOAD));
    }

    #[test]
    fn test_unnamed_inputs_use_fallback_key() {
        let form = FormDescriptor {
            action: "http://test.local/".to_string(),
            method: "get".to_string(),
            inputs: vec![input("", "text"), input("", "text"), input("q", "search")],
        };

        let probe = build_form_probe(&form, XSS_PAYLOAD);
        assert_eq!(probe.method, ProbeMethod::Get);
        assert_eq!(
            probe.fields,
            vec![
                ("payload".to_string(), XSS_PAYLOAD.to_string()),
                ("q".to_string(), XSS_PAYLOAD.to_string()),
            ]
        );
    }

    #[test]
    fn test_unknown_method_probes_with_get() {
        let form = FormDescriptor {
            action: "http://test.local/".to_string(),
            method: "put".to_string(),
            inputs: vec![input("q", "text")],
        };
        assert_eq!(build_form_probe(&form, XSS_PAYLOAD).method, ProbeMethod::Get);
    }

    #[test]
    fn test_param_probes_replace_one_key_each() {
        let url = Url::parse("http://test.local/item?id=5&name=bob").unwrap();
        let params = vec![
            ("id".to_string(), "5".to_string()),
            ("name".to_string(), "bob".to_string()),
        ];

        let probes = build_param_probes(&url, &params, "PAYLOAD");
        assert_eq!(probes.len(), 2);
        assert_eq!(probes[0].url, "http://test.local/item?id=PAYLOAD&name=bob");
        assert_eq!(probes[1].url, "http://test.local/item?id=5&name=PAYLOAD");
        assert!(probes.iter().all(|p| p.method == ProbeMethod::Get));
    }

    #[test]
    fn test_param_injection_leaves_other_values_verbatim() {
        let url = Url::parse("http://test.local/r?next=/home&q=a%20b&id=5").unwrap();
        let params = page::query_params(&url);

        let probes = build_param_probes(&url, &params, "PAYLOAD");
        assert_eq!(probes.len(), 3);
        assert_eq!(probes[0].url, "http://test.local/r?next=PAYLOAD&q=a%20b&id=5");
        assert_eq!(probes[1].url, "http://test.local/r?next=/home&q=PAYLOAD&id=5");
        assert_eq!(probes[2].url, "http://test.local/r?next=/home&q=a%20b&id=PAYLOAD");
    }

    #[test]
    fn test_param_injection_encodes_only_the_payload() {
        let url = Url::parse("http://test.local/r?next=/home&id=5&id=7").unwrap();
        let params = page::query_params(&url);

        let probes = build_param_probes(&url, &params, XSS_PAYLOAD);
        assert_eq!(probes.len(), 2);
        assert_eq!(
            probes[1].url,
            "http://test.local/r?next=/home&id=%3CscRiPt%3Eqwerty_alert%28%29%3C%2FscRiPt%3E&id=7"
        );
    }

    #[tokio::test]
    async fn test_query_string_yields_two_probe_requests() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/item"))
            .respond_with(ResponseTemplate::new(200).set_body_string("nothing to see"))
            .mount(&mock_server)
            .await;

        let ctx = context();
        let page = Page::analyze(
            &format!("{}/item?id=5&name=bob", mock_server.uri()),
            String::new(),
        )
        .unwrap();
        let mut report = Report::new(mock_server.uri());

        probe_query_params(&ctx, &page, &mut report).await;

        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);

        let first: Vec<(String, String)> = requests[0]
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            first,
            vec![
                ("id".to_string(), XSS_PAYLOAD.to_string()),
                ("name".to_string(), "bob".to_string()),
            ]
        );

        let second: Vec<(String, String)> = requests[1]
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            second,
            vec![
                ("id".to_string(), "5".to_string()),
                ("name".to_string(), XSS_PAYLOAD.to_string()),
            ]
        );
        assert!(report.vulns.is_empty());
    }

    #[tokio::test]
    async fn test_no_query_means_no_probes() {
        let mock_server = MockServer::start().await;

        let ctx = context();
        let page = Page::analyze(&format!("{}/plain", mock_server.uri()), String::new()).unwrap();
        let mut report = Report::new(mock_server.uri());

        probe_query_params(&ctx, &page, &mut report).await;

        assert!(mock_server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reflected_param_is_reported_with_probe_url() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/greet"))
            .and(query_param("name", XSS_PAYLOAD))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(format!("Hello {}", XSS_PAYLOAD)),
            )
            .mount(&mock_server)
            .await;

        let ctx = context();
        let page = Page::analyze(&format!("{}/greet?name=bob", mock_server.uri()), String::new())
            .unwrap();
        let mut report = Report::new(mock_server.uri());

        probe_query_params(&ctx, &page, &mut report).await;

        assert_eq!(report.vulns.len(), 1);
        assert_eq!(report.vulns[0].finding_type, FindingType::Xss);
        assert!(report.vulns[0].url.starts_with(&format!("{}/greet?name=", mock_server.uri())));
        assert_eq!(report.vulns[0].evidence, XSS_PAYLOAD);
    }

    #[tokio::test]
    async fn test_post_form_with_sql_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/login"))
            .and(body_string_contains("user="))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_string("Unclosed quotation mark after the character string ''"),
            )
            .mount(&mock_server)
            .await;

        let ctx = context();
        let form = FormDescriptor {
            action: format!("{}/login", mock_server.uri()),
            method: "post".to_string(),
            inputs: vec![input("user", "text"), input("csrf_token", "hidden")],
        };
        let mut report = Report::new(mock_server.uri());

        probe_form(&ctx, &form, &mut report).await;

        assert_eq!(report.vulns.len(), 1);
        assert_eq!(report.vulns[0].finding_type, FindingType::Sqli);
        assert_eq!(report.vulns[0].url, form.action);
        assert_eq!(report.vulns[0].evidence, "sql_error_pattern");
    }

    #[tokio::test]
    async fn test_failed_form_probe_still_checks_csrf() {
        let ctx = context();
        let form = FormDescriptor {
            action: "http://127.0.0.1:1/submit".to_string(),
            method: "get".to_string(),
            inputs: vec![input("q", "text")],
        };
        let mut report = Report::new("http://127.0.0.1:1/");

        probe_form(&ctx, &form, &mut report).await;

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].url, "http://127.0.0.1:1/submit");
        assert_eq!(report.vulns.len(), 1);
        assert_eq!(report.vulns[0].finding_type, FindingType::MissingCsrfToken);
    }
}
