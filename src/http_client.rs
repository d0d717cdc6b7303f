use crate::config::Config;
use crate::error::{NetworkError, SourceResult};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use reqwest::Client;

pub const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// Something that can turn a URL into HTML
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str) -> SourceResult<String>;
}

/// Single-shot GET client that presents itself as a regular browser.
///
/// No retries and no timeout of its own: a failed request is reported as is.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    headers: HeaderMap,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = Client::builder().gzip(true).build()?;
        Ok(Self::with_client(client, config))
    }

    /// Reuse a client the host already owns
    pub fn with_client(client: Client, config: &Config) -> Self {
        Self {
            client,
            headers: Self::browser_headers(config),
        }
    }

    /// The fixed header set attached to every request
    pub fn browser_headers(config: &Config) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let pairs = [
            (USER_AGENT, config.user_agent.as_str()),
            (ACCEPT, ACCEPT_HTML),
            (ACCEPT_LANGUAGE, config.accept_language.as_str()),
            (REFERER, config.base_url.as_str()),
        ];
        for (name, value) in pairs {
            match HeaderValue::from_str(value) {
                Ok(v) => {
                    headers.insert(name, v);
                }
                Err(_) => log::warn!("Dropping invalid {} header value {:?}", name, value),
            }
        }
        headers
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> SourceResult<String> {
        let result = async {
            let response = self
                .client
                .get(url)
                .headers(self.headers.clone())
                .send()
                .await
                .map_err(|source| NetworkError::Transport { url: url.to_string(), source })?;

            let status = response.status();
            if !status.is_success() {
                return Err(NetworkError::Status { url: url.to_string(), status });
            }

            response
                .text()
                .await
                .map_err(|source| NetworkError::Transport { url: url.to_string(), source })
        }
        .await;

        if let Err(e) = &result {
            log::error!("Request failed for {}: {}", url, e);
        }
        result
    }
}
