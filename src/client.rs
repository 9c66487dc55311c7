//! Transport client for the courier tracking endpoint
//!
//! One form-encoded POST per voucher. The endpoint rejects unadorned requests,
//! so the client pins browser-mimicking XHR headers on every call. Transient
//! failures (connect errors, timeouts, HTTP 429/5xx) are retried with
//! exponential backoff; other 4xx statuses surface immediately.

use crate::config::{Config, RetryConfig};
use crate::error::{Error, Result};
use crate::retry::fetch_with_retry;
use crate::types::Voucher;
use reqwest::header::{
    ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, ORIGIN, REFERER, USER_AGENT,
};

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";
const DEFAULT_ACCEPT: &str = "application/json, text/javascript, */*; q=0.01";
const DEFAULT_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";
const DEFAULT_ORIGIN: &str = "https://www.elta-courier.gr";
const DEFAULT_REFERER: &str = "https://www.elta-courier.gr/";

/// HTTP client for the courier tracking endpoint
///
/// Holds one connection-pooled [`reqwest::Client`] for the whole run. No
/// caching: every [`fetch`](TrackingClient::fetch) hits the network.
pub struct TrackingClient {
    http: reqwest::Client,
    track_url: String,
    retry: RetryConfig,
}

impl TrackingClient {
    /// Build a client from the run configuration
    ///
    /// The per-request timeout and the browser-mimicking header set are fixed
    /// on the underlying HTTP client at construction.
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static(DEFAULT_ACCEPT));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
        headers.insert(
            "X-Requested-With",
            HeaderValue::from_static("XMLHttpRequest"),
        );
        headers.insert(ORIGIN, HeaderValue::from_static(DEFAULT_ORIGIN));
        headers.insert(REFERER, HeaderValue::from_static(DEFAULT_REFERER));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.endpoint.request_timeout)
            .build()?;

        Ok(Self {
            http,
            track_url: config.endpoint.track_url.clone(),
            retry: config.retry.clone(),
        })
    }

    /// Fetch the raw tracking response bytes for one voucher
    ///
    /// Applies the configured retry policy, then returns the response body of
    /// the first 2xx response. Non-2xx after exhausted retries surfaces as
    /// [`Error::HttpStatus`]; connection and timeout failures as
    /// [`Error::Network`].
    pub async fn fetch(&self, voucher: &Voucher) -> Result<Vec<u8>> {
        fetch_with_retry(&self.retry, || self.request_once(voucher)).await
    }

    async fn request_once(&self, voucher: &Voucher) -> Result<Vec<u8>> {
        let form = [("number", voucher.as_str()), ("s", "0")];
        let response = self
            .http
            .post(&self.track_url)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
