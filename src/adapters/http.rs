use crate::config::PortalConfig;
use crate::domain::model::{RawPortalResponse, TrackingCode};
use crate::domain::ports::PortalClient;
use crate::utils::error::{Result, TransportError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, COOKIE, REFERER};
use reqwest::Client;

const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,\
image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";

/// Portal client over a single explicitly constructed `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpPortalClient {
    client: Client,
    endpoint: String,
    language: String,
    cookie: Option<String>,
}

impl HttpPortalClient {
    pub fn new(config: &PortalConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(Self::default_headers(config))
            .timeout(config.timeout())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        let cookie = (!config.cookies.is_empty()).then(|| {
            config
                .cookies
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect::<Vec<_>>()
                .join("; ")
        });

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            language: config.language.clone(),
            cookie,
        })
    }

    fn default_headers(config: &PortalConfig) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert("upgrade-insecure-requests", HeaderValue::from_static("1"));
        headers.insert("sec-fetch-site", HeaderValue::from_static("same-origin"));
        headers.insert("sec-fetch-mode", HeaderValue::from_static("navigate"));
        headers.insert("sec-fetch-user", HeaderValue::from_static("?1"));
        headers.insert("sec-fetch-dest", HeaderValue::from_static("document"));

        for (name, value) in &config.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => tracing::warn!("Skipping invalid portal header '{}'", name),
            }
        }
        headers
    }

    fn query<'a>(&'a self, code: &'a TrackingCode) -> [(&'static str, &'a str); 4] {
        [
            ("lang", self.language.as_str()),
            ("mime", ""),
            ("pratica", code.as_str()),
            ("invia", "Invia"),
        ]
    }

    /// The portal expects the referer to echo the form submission itself.
    fn referer(&self, code: &TrackingCode) -> String {
        match reqwest::Url::parse_with_params(&self.endpoint, self.query(code)) {
            Ok(url) => url.to_string(),
            Err(_) => self.endpoint.clone(),
        }
    }
}

#[async_trait]
impl PortalClient for HttpPortalClient {
    async fn fetch(
        &self,
        code: &TrackingCode,
    ) -> std::result::Result<RawPortalResponse, TransportError> {
        tracing::debug!("Querying portal {} for {}", self.endpoint, code);

        let mut request = self
            .client
            .get(&self.endpoint)
            .query(&self.query(code)[..])
            .header(REFERER, self.referer(code));
        if let Some(cookie) = &self.cookie {
            request = request.header(COOKIE, cookie.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Portal returned HTTP {} for {}", status, code);
        }

        let body = response.text().await?;
        Ok(RawPortalResponse::new(status.as_u16(), body))
    }
}
