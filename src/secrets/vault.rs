//! HashiCorp Vault implementation of the secret store boundary.
//!
//! Reads go through the logical API (`GET /v1/<path>`), which serves both
//! KV v1 mounts and any other engine returning a flat `data` object.

use super::error::{FetchErrorKind, SecretError, SecretResult};
use super::http::{HttpClient, ReqwestClient};
use super::store::{RawSecret, SecretFields, SecretStore};
use crate::config::ProviderConfig;
use anyhow::Result;
use serde::Deserialize;
use serde_json::{Map, Value};
use url::Url;

const TOKEN_HEADER: &str = "X-Vault-Token";
const NAMESPACE_HEADER: &str = "X-Vault-Namespace";

#[derive(Debug, Deserialize)]
struct SecretResponse {
    #[serde(default)]
    data: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    errors: Vec<String>,
}

/// Vault logical-API reader.
///
/// The token is sent on every request and never logged.
pub struct VaultClient<H: HttpClient> {
    address: Url,
    token: Option<String>,
    namespace: Option<String>,
    http_client: H,
}

impl VaultClient<ReqwestClient> {
    /// Create a Vault client with a timeout-bounded reqwest client
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let http_client = ReqwestClient::new(config.timeout())?;
        Self::with_client(config, http_client)
    }
}

impl<H: HttpClient> VaultClient<H> {
    /// Create a Vault client with a custom HTTP client (for testing)
    pub fn with_client(config: &ProviderConfig, http_client: H) -> Result<Self> {
        Ok(Self {
            address: config.address_url()?,
            token: config.token.clone().filter(|t| !t.is_empty()),
            namespace: config.namespace.clone().filter(|n| !n.is_empty()),
            http_client,
        })
    }

    /// Logical API URL for `path`, one percent-encoded segment per path element
    fn secret_url(&self, path: &str) -> String {
        let mut url = self.address.clone();
        url.set_query(None);
        url.set_fragment(None);

        // http(s) addresses always have a path to extend
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("v1");
            for segment in path.split('/') {
                segments.push(segment);
            }
        }

        url.into()
    }

    #[cfg(test)]
    fn http_client(&self) -> &H {
        &self.http_client
    }
}

impl<H: HttpClient> SecretStore for VaultClient<H> {
    fn fetch(&self, path: &str) -> SecretResult<RawSecret> {
        let url = self.secret_url(path);

        let mut headers = Vec::new();
        if let Some(token) = &self.token {
            headers.push((TOKEN_HEADER, token.as_str()));
        }
        if let Some(namespace) = &self.namespace {
            headers.push((NAMESPACE_HEADER, namespace.as_str()));
        }

        let response = self
            .http_client
            .get(&url, &headers)
            .map_err(|e| SecretError::fetch(path, FetchErrorKind::Transport, format!("{:#}", e)))?;

        tracing::debug!(url = %url, status = response.status, "vault responded");

        match response.status {
            200 => parse_secret(path, &response.body),
            204 => Ok(RawSecret::NotFound),
            404 if response.body.trim().is_empty() => Ok(RawSecret::NotFound),
            // Vault may still attach data to a 404; the body must parse either way
            404 => match parse_secret(path, &response.body)? {
                RawSecret::Found(fields) if !fields.is_empty() => Ok(RawSecret::Found(fields)),
                _ => Ok(RawSecret::NotFound),
            },
            status => Err(status_error(path, status, &response.body)),
        }
    }
}

fn parse_secret(path: &str, body: &str) -> SecretResult<RawSecret> {
    let response: SecretResponse = serde_json::from_str(body).map_err(|e| {
        SecretError::fetch(
            path,
            FetchErrorKind::MalformedResponse,
            format!("Failed to parse Vault response: {}", e),
        )
    })?;

    let mut fields = SecretFields::new();
    for (field, value) in response.data.unwrap_or_default() {
        match value {
            Value::String(s) => {
                fields.insert(field, s);
            }
            other => return Err(SecretError::field_type(path, field, json_type_name(&other))),
        }
    }

    Ok(RawSecret::Found(fields))
}

fn status_error(path: &str, status: u16, body: &str) -> SecretError {
    let kind = match status {
        401 | 403 => FetchErrorKind::Unauthorized,
        500..=599 => FetchErrorKind::Server,
        _ => FetchErrorKind::Request,
    };

    let details = match serde_json::from_str::<ErrorResponse>(body) {
        Ok(parsed) if !parsed.errors.is_empty() => parsed.errors.join("; "),
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => "no error details returned".to_string(),
    };

    SecretError::fetch(path, kind, format!("Vault returned status {}: {}", status, details))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
