use crate::error::{Result, ScanError};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

/// A single form control (`input`, `textarea` or `select`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDescriptor {
    /// The `name` attribute, else `id`, else empty.
    pub name: String,
    /// Lower-cased `type` attribute, `"text"` when absent.
    pub input_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDescriptor {
    /// Absolute action URL. Falls back to the page URL when unset.
    pub action: String,
    /// Lower-cased method, `"get"` when absent.
    pub method: String,
    pub inputs: Vec<InputDescriptor>,
}

impl FormDescriptor {
    pub fn is_post(&self) -> bool {
        self.method == "post"
    }
}

/// A fetched page and everything derived from its body.
#[derive(Debug, Clone)]
pub struct Page {
    pub url: String,
    pub body: String,
    pub forms: Vec<FormDescriptor>,
    pub links: Vec<String>,
    /// Query parameters of `url`, first value per key, in order of appearance.
    pub params: Vec<(String, String)>,
}

impl Page {
    /// Parse `body` fetched from `url`.
    pub fn analyze(url: &str, body: String) -> Result<Self> {
        let base = Url::parse(url)?;

        let (forms, links) = {
            let document = Html::parse_document(&body);
            (
                extract_forms(&document, &base)?,
                extract_links(&document, &base)?,
            )
        };

        debug!(
            "Analyzed {}: {} forms, {} links",
            url,
            forms.len(),
            links.len()
        );

        Ok(Self {
            url: url.to_string(),
            params: query_params(&base),
            body,
            forms,
            links,
        })
    }

    pub fn has_query(&self) -> bool {
        Url::parse(&self.url)
            .ok()
            .and_then(|u| u.query().map(|q| !q.is_empty()))
            .unwrap_or(false)
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScanError::ParseError(format!("bad selector '{}': {}", css, e)))
}

pub fn extract_forms(document: &Html, base: &Url) -> Result<Vec<FormDescriptor>> {
    let form_selector = selector("form")?;
    let input_selector = selector("input, textarea, select")?;

    let mut forms = Vec::new();
    for form in document.select(&form_selector) {
        let action = match resolve_action(base, form.value().attr("action")) {
            Some(action) => action,
            None => {
                warn!("Skipping form with unresolvable action on {}", base);
                continue;
            }
        };

        let method = form
            .value()
            .attr("method")
            .map(|m| m.trim().to_lowercase())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "get".to_string());

        let inputs = form
            .select(&input_selector)
            .map(describe_input)
            .collect();

        forms.push(FormDescriptor {
            action,
            method,
            inputs,
        });
    }

    Ok(forms)
}

fn describe_input(element: ElementRef<'_>) -> InputDescriptor {
    let attrs = element.value();
    let name = attrs
        .attr("name")
        .filter(|n| !n.is_empty())
        .or_else(|| attrs.attr("id").filter(|id| !id.is_empty()))
        .unwrap_or("")
        .to_string();
    let input_type = attrs
        .attr("type")
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "text".to_string());

    InputDescriptor { name, input_type }
}

fn resolve_action(base: &Url, action: Option<&str>) -> Option<String> {
    match action.map(str::trim) {
        None | Some("") => Some(base.to_string()),
        Some(action) => base.join(action).ok().map(|u| u.to_string()),
    }
}

/// Every `a[href]` on the page as an absolute URL, in document order.
pub fn extract_links(document: &Html, base: &Url) -> Result<Vec<String>> {
    let link_selector = selector("a[href]")?;

    Ok(document
        .select(&link_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_url(base, href))
        .collect())
}

fn resolve_url(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    // Skip empty, javascript:, mailto:, tel:, and same-page anchors
    if href.is_empty()
        || href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with('#')
    {
        return None;
    }

    let mut url = base.join(href).ok()?;
    url.set_fragment(None);
    Some(url.to_string())
}

/// Decoded query parameters of `url`. Repeated keys keep their first value.
pub fn query_params(url: &Url) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = Vec::new();
    for (key, value) in url.query_pairs() {
        if !params.iter().any(|(k, _)| *k == key) {
            params.push((key.into_owned(), value.into_owned()));
        }
    }
    params
}
