//! HTTP transport abstraction for the remote-API clients.
//!
//! Every remote call in the crate goes through this trait rather than a
//! concrete `reqwest::Client`, so tests can substitute a mock transport
//! and exercise the call wrappers without a network. The transport makes
//! exactly one attempt per invocation: no retry, no timeout, no backoff.
//! Non-2xx responses are returned as bodies, not errors, because the
//! remote API encodes failure in its response envelope.

use async_trait::async_trait;
use std::collections::HashMap;
use crate::Error;

/// A generic trait for making HTTP requests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn get(
        &self,
        url: String,
        headers: HashMap<String, String>,
    ) -> Result<String, Self::Error>;

    async fn post(
        &self,
        url: String,
        headers: HashMap<String, String>,
        body: String,
    ) -> Result<String, Self::Error>;

    async fn put(
        &self,
        url: String,
        headers: HashMap<String, String>,
        body: String,
    ) -> Result<String, Self::Error>;
}

#[derive(Clone)]
pub struct DefaultHttpClient {
    client: reqwest::Client,
}

impl DefaultHttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for DefaultHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for DefaultHttpClient {
    type Error = Error;

    async fn get(
        &self,
        url: String,
        headers: HashMap<String, String>,
    ) -> Result<String, Self::Error> {
        let mut request = self.client.get(&url);
        for (key, value) in headers {
            request = request.header(&key, value);
        }
        let response = request.send().await?.text().await?;
        Ok(response)
    }

    async fn post(
        &self,
        url: String,
        headers: HashMap<String, String>,
        body: String,
    ) -> Result<String, Self::Error> {
        let mut request = self.client.post(&url).body(body);
        for (key, value) in headers {
            request = request.header(&key, value);
        }
        let response = request.send().await?.text().await?;
        Ok(response)
    }

    async fn put(
        &self,
        url: String,
        headers: HashMap<String, String>,
        body: String,
    ) -> Result<String, Self::Error> {
        let mut request = self.client.put(&url).body(body);
        for (key, value) in headers {
            request = request.header(&key, value);
        }
        let response = request.send().await?.text().await?;
        Ok(response)
    }
}
