//! HTTP request helper shared by the values endpoints

use std::time::Duration;

use log::{debug, trace};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::types::ApiErrorBody;
use crate::{Result, SheetsError};

/// Builder for a single request against the spreadsheet API
pub struct FetchBuilder<'a> {
    client: &'a Client,
    url: Url,
    method: Method,
    headers: HeaderMap,
    query_params: Vec<(String, String)>,
    body: Option<Vec<u8>>,
    timeout: Option<Duration>,
}

impl<'a> FetchBuilder<'a> {
    /// Create a new FetchBuilder
    pub fn new(client: &'a Client, url: Url, method: Method) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        Self {
            client,
            url,
            method,
            headers,
            query_params: Vec::new(),
            body: None,
            timeout: None,
        }
    }

    /// Add a header to the request
    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Add bearer token authentication to the request
    pub fn bearer_auth(self, token: &str) -> Self {
        self.header("Authorization", &format!("Bearer {}", token))
    }

    /// Append a query parameter, keeping insertion order
    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query_params.push((key.to_string(), value.to_string()));
        self
    }

    /// Add a JSON body to the request
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        let json = serde_json::to_vec(body)?;
        self.body = Some(json);
        Ok(self)
    }

    /// Per-request timeout; `None` leaves it to the client
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn build(&self) -> RequestBuilder {
        let mut url = self.url.clone();
        if !self.query_params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query_params {
                pairs.append_pair(key, value);
            }
        }

        let mut req = self
            .client
            .request(self.method.clone(), url.as_str())
            .headers(self.headers.clone());

        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }
        if let Some(body) = &self.body {
            req = req.body(body.clone());
        }
        req
    }

    /// Execute the request and parse a successful response as JSON
    pub async fn execute<T: DeserializeOwned>(&self) -> Result<T> {
        let response = self.execute_raw().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &text));
        }

        let bytes = response.bytes().await?;
        trace!("{} {} -> {} bytes", self.method, self.url.path(), bytes.len());
        if bytes.is_empty() {
            // Clear and some append calls may answer with an empty body
            return Ok(serde_json::from_slice(b"{}")?);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Execute the request and return the raw response
    pub async fn execute_raw(&self) -> Result<Response> {
        debug!("{} {}", self.method, self.url.path());
        let response = self.build().send().await?;
        Ok(response)
    }
}

/// Turn a non-success body into an `ApiError`, preferring the API's own message
pub(crate) fn api_error(status: u16, body: &str) -> SheetsError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error.message)
        .unwrap_or_else(|| body.to_string());
    SheetsError::ApiError { status, message }
}
