use crate::config::ScanConfig;
use crate::error::Result;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// HTTP access for one scan. Cookies set by the target persist across every
/// crawl and probe request made through the same `Fetcher`.
///
/// Status codes are not interpreted: any response with a readable body is
/// returned as-is.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(config: &ScanConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::limited(config.redirect_limit))
            .build()?;

        Ok(Self { client })
    }

    /// GET `url`, appending `params` to its query string.
    pub async fn get(&self, url: &str, params: &[(String, String)]) -> Result<String> {
        debug!("GET {} ({} params)", url, params.len());
        let response = self.client.get(url).query(params).send().await?;
        debug!("GET {} -> {}", url, response.status());
        Ok(response.text().await?)
    }

    /// POST `body` to `url` as `application/x-www-form-urlencoded`.
    pub async fn post(&self, url: &str, body: &[(String, String)]) -> Result<String> {
        debug!("POST {} ({} fields)", url, body.len());
        let response = self.client.post(url).form(body).send().await?;
        debug!("POST {} -> {}", url, response.status());
        Ok(response.text().await?)
    }
}
