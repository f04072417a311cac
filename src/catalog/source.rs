use reqwest::header::CACHE_CONTROL;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered {status}")]
    Status { url: String, status: StatusCode },
    #[error("{url} did not return valid JSON: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Where catalog JSON and icon probes come from.
#[async_trait::async_trait]
pub trait JsonSource: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError>;

    /// Sends a HEAD request; `Ok(true)` when the resource answers with success.
    async fn probe(&self, url: &str) -> Result<bool, FetchError>;
}

pub const USER_AGENT: &str = concat!("polycatalog/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl JsonSource for HttpSource {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }
        response.json().await.map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }

    async fn probe(&self, url: &str) -> Result<bool, FetchError> {
        debug!("HEAD {}", url);
        let response =
            self.client
                .head(url)
                .send()
                .await
                .map_err(|source| FetchError::Transport {
                    url: url.to_string(),
                    source,
                })?;
        Ok(response.status().is_success())
    }
}
