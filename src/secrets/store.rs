//! Fetch contract between the materializer and an external secret store.

use super::error::SecretResult;
use std::collections::BTreeMap;

/// Raw field values keyed by field name
pub type SecretFields = BTreeMap<String, String>;

/// Outcome of a successful store read.
///
/// A missing secret is a valid result, distinct from a failed read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawSecret {
    Found(SecretFields),
    NotFound,
}

impl RawSecret {
    /// Field values, or an empty mapping when nothing is stored at the path
    pub fn into_fields(self) -> SecretFields {
        match self {
            RawSecret::Found(fields) => fields,
            RawSecret::NotFound => SecretFields::new(),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, RawSecret::Found(_))
    }
}

/// Read capability of a key-value secret store.
///
/// Implementations receive an already normalized path and must hand back
/// string-valued fields only; anything else is reported as
/// [`SecretError::FieldType`](super::error::SecretError::FieldType).
pub trait SecretStore: Send + Sync {
    fn fetch(&self, path: &str) -> SecretResult<RawSecret>;
}

/// Mock store for testing (canned responses per path, records calls)
#[cfg(test)]
pub struct MockSecretStore {
    responses: std::sync::Mutex<std::collections::HashMap<String, SecretResult<RawSecret>>>,
    calls: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockSecretStore {
    pub fn new() -> Self {
        Self {
            responses: std::sync::Mutex::new(std::collections::HashMap::new()),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn with_secret(self, path: &str, fields: &[(&str, &str)]) -> Self {
        let fields = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.with_response(path, Ok(RawSecret::Found(fields)))
    }

    pub fn with_response(self, path: &str, response: SecretResult<RawSecret>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(path.to_string(), response);
        self
    }

    /// Paths passed to `fetch`, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl SecretStore for MockSecretStore {
    fn fetch(&self, path: &str) -> SecretResult<RawSecret> {
        self.calls.lock().unwrap().push(path.to_string());

        // Unknown paths behave like an empty store
        self.responses
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .unwrap_or(Ok(RawSecret::NotFound))
    }
}
