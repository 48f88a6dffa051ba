use anyhow::{Context, Result};
use std::time::Duration;

/// Minimal HTTP response as seen by the Vault client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// HTTP client trait for testing
pub trait HttpClient: Send + Sync {
    /// Issue a GET request with the given headers
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse>;
}

/// Real HTTP client using reqwest
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Create a client whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request
            .send()
            .with_context(|| format!("Failed to fetch URL: {}", url))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .with_context(|| format!("Failed to read response body from: {}", url))?;

        Ok(HttpResponse { status, body })
    }
}

/// Mock HTTP client for testing (single canned response, records requests)
#[cfg(test)]
pub struct MockHttpClient {
    response: std::sync::Mutex<Option<HttpResponse>>,
    failure: Option<String>,
    requests: std::sync::Mutex<Vec<MockRequest>>,
}

#[cfg(test)]
#[derive(Clone, Debug)]
pub struct MockRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn responding(status: u16, body: &str) -> Self {
        Self {
            response: std::sync::Mutex::new(Some(HttpResponse {
                status,
                body: body.to_string(),
            })),
            failure: None,
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: std::sync::Mutex::new(None),
            failure: Some(message.to_string()),
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl HttpClient for MockHttpClient {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(MockRequest {
            url: url.to_string(),
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });

        if let Some(message) = &self.failure {
            anyhow::bail!("{}", message);
        }

        self.response
            .lock()
            .unwrap()
            .clone()
            .context("No mock response configured")
    }
}
