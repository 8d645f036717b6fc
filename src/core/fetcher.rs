use crate::core::assets::ApiRequest;
use crate::core::credentials::Credentials;
use crate::core::errors::{Error, Result};
use log::{error, info};
use serde_json::Value;

/*-------------------------------------------------------------------------------------------------
  API Fetcher
-------------------------------------------------------------------------------------------------*/

/// Performs one inventory API request and returns the decoded JSON payload.
///
/// Implementations must not retry; a failure is returned to the caller as-is.
pub trait ApiFetcher {
    fn fetch(&self, request: &ApiRequest, credentials: &Credentials) -> Result<Value>;
}

/*-------------------------------------------------------------------------------------------------
  HTTP Fetcher
-------------------------------------------------------------------------------------------------*/

/// Blocking HTTP implementation of [ApiFetcher].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    url: String,
    http: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            http: reqwest::blocking::Client::new(),
        }
    }

    /// Base URL requests are made against, without a trailing slash.
    ///
    /// ```
    /// let fetcher = chinventory::HttpFetcher::new("https://chapi.cloudhealthtech.com/");
    /// assert_eq!(fetcher.url(), "https://chapi.cloudhealthtech.com");
    /// ```
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ApiFetcher for HttpFetcher {
    fn fetch(&self, request: &ApiRequest, credentials: &Credentials) -> Result<Value> {
        let url = format!("{}/{}", self.url, request.path());
        info!("GET {} ({})", url, request.cache_key());

        let mut params = vec![("api_key", credentials.api_key())];
        params.extend(request.params());

        self.http
            .get(&url)
            .query(&params)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.json::<Value>())
            .map_err(Error::from)
            .inspect_err(|error| error!("GET {} FAILED: {}", url, error))
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
