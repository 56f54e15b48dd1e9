use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{FailureKind, FetchError, PipelineStatus};

/// Transport configuration. The backend location is injected here rather
/// than baked into the client.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Source of pipeline status snapshots.
#[async_trait::async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self) -> Result<PipelineStatus, FetchError>;
}

/// The watchlist CRUD endpoints.
#[async_trait::async_trait]
pub trait TickerDirectory: Send + Sync {
    async fn list_tickers(&self) -> Result<Vec<String>, FetchError>;
    async fn add_ticker(&self, symbol: &str) -> Result<(), FetchError>;
    async fn remove_ticker(&self, symbol: &str) -> Result<(), FetchError>;
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base: Url,
}

#[derive(Debug, Deserialize)]
struct TickerListBody {
    tickers: Vec<String>,
}

#[derive(Debug, Serialize)]
struct AddTickerBody<'a> {
    symbol: &'a str,
}

impl HttpClient {
    pub fn new(settings: ClientSettings) -> Result<Self, FetchError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { client, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        self.base
            .join(path)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))
    }
}

fn check_http_status(response: &reqwest::Response) -> Result<(), FetchError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(FetchError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ))
    }
}

#[async_trait::async_trait]
impl StatusSource for HttpClient {
    async fn fetch_status(&self) -> Result<PipelineStatus, FetchError> {
        let url = self.endpoint("pipeline/status")?;
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        check_http_status(&response)?;

        let status: PipelineStatus = response.json().await.map_err(map_reqwest_error)?;
        status
            .validate()
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;
        Ok(status)
    }
}

#[async_trait::async_trait]
impl TickerDirectory for HttpClient {
    async fn list_tickers(&self) -> Result<Vec<String>, FetchError> {
        let url = self.endpoint("tickers")?;
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        check_http_status(&response)?;

        let body: TickerListBody = response.json().await.map_err(map_reqwest_error)?;
        Ok(body.tickers)
    }

    async fn add_ticker(&self, symbol: &str) -> Result<(), FetchError> {
        let url = self.endpoint("tickers")?;
        let response = self
            .client
            .post(url)
            .json(&AddTickerBody { symbol })
            .send()
            .await
            .map_err(map_reqwest_error)?;
        check_http_status(&response)
    }

    async fn remove_ticker(&self, symbol: &str) -> Result<(), FetchError> {
        let url = self.endpoint(&format!("tickers/{symbol}"))?;
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        check_http_status(&response)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return FetchError::new(FailureKind::Decode, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
