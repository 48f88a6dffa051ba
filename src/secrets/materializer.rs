//! Secret materialization: normalize, fetch, decode.

use super::decode::decode_field;
use super::error::SecretResult;
use super::store::{SecretFields, SecretStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Prefix of the identifier derived from a normalized path
pub const ID_PREFIX: &str = "path:";

/// Strip every leading `/` from a store path.
///
/// Internal and trailing separators are kept as-is.
pub fn normalize_path(path: &str) -> &str {
    path.trim_start_matches('/')
}

/// Identifier exposed for a secret read from `path` (already normalized)
pub fn secret_id(normalized: &str) -> String {
    format!("{}{}", ID_PREFIX, normalized)
}

/// A secret's decoded fields, ready to be exposed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterializedSecret {
    pub id: String,
    pub path: String,
    pub data: SecretFields,
}

/// Reads secrets from a store and decodes their fields.
///
/// Holds no state besides the injected store; every call fetches afresh.
#[derive(Clone)]
pub struct SecretMaterializer {
    store: Arc<dyn SecretStore>,
}

impl SecretMaterializer {
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self { store }
    }

    /// Materialize the secret stored at `path`.
    ///
    /// A path with nothing stored yields an empty mapping. Store failures
    /// abort the call and are returned unchanged.
    pub fn materialize(&self, path: &str) -> SecretResult<MaterializedSecret> {
        let normalized = normalize_path(path);
        let id = secret_id(normalized);

        tracing::debug!(path = %normalized, "fetching secret");
        let raw = self.store.fetch(normalized)?;
        let found = raw.is_found();

        let mut data = SecretFields::new();
        for (field, value) in raw.into_fields() {
            let decoded = decode_field(&value);
            if decoded.is_malformed() {
                // Kept lenient until product decides whether this is an error
                tracing::warn!(
                    path = %normalized,
                    field = %field,
                    "field has malformed base64 payload, exposing partial decode"
                );
            }
            data.insert(field, decoded.into_value());
        }

        tracing::debug!(path = %normalized, found, fields = data.len(), "secret materialized");

        Ok(MaterializedSecret {
            id,
            path: normalized.to_string(),
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::error::{FetchErrorKind, SecretError};
    use crate::secrets::store::{MockSecretStore, RawSecret};

    fn materializer(store: MockSecretStore) -> (SecretMaterializer, Arc<MockSecretStore>) {
        let store = Arc::new(store);
        (SecretMaterializer::new(store.clone()), store)
    }

    #[test]
    fn test_normalize_strips_all_leading_separators() {
        assert_eq!(normalize_path("/foo"), "foo");
        assert_eq!(normalize_path("///foo/bar"), "foo/bar");
        assert_eq!(normalize_path("foo/bar/"), "foo/bar/");
        assert_eq!(normalize_path("foo//bar"), "foo//bar");
        assert_eq!(normalize_path(""), "");
        assert_eq!(normalize_path("///"), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for path in ["", "/", "//a", "a/b/", "/a//b", "a"] {
            let once = normalize_path(path);
            assert_eq!(normalize_path(once), once);
        }
    }

    #[test]
    fn test_leading_separators_share_identity() {
        let (m, store) = materializer(MockSecretStore::new().with_secret("foo", &[("k", "v")]));

        let with_slash = m.materialize("/foo").unwrap();
        let without = m.materialize("foo").unwrap();

        assert_eq!(with_slash.id, "path:foo");
        assert_eq!(with_slash, without);
        assert_eq!(store.calls(), vec!["foo".to_string(), "foo".to_string()]);
    }

    #[test]
    fn test_not_found_is_empty_mapping() {
        let (m, _) = materializer(MockSecretStore::new());

        let secret = m.materialize("/missing").unwrap();
        assert_eq!(secret.id, "path:missing");
        assert_eq!(secret.path, "missing");
        assert!(secret.data.is_empty());
    }

    #[test]
    fn test_decodes_encoded_fields() {
        let (m, _) = materializer(
            MockSecretStore::new()
                .with_secret("creds/db", &[("user", "alice"), ("password", "base64:c2VjcmV0")]),
        );

        let secret = m.materialize("/creds/db").unwrap();
        assert_eq!(secret.id, "path:creds/db");
        assert_eq!(secret.data.len(), 2);
        assert_eq!(secret.data["user"], "alice");
        assert_eq!(secret.data["password"], "secret");
    }

    #[test]
    fn test_malformed_field_does_not_fail() {
        let (m, _) = materializer(
            MockSecretStore::new().with_secret("app", &[("token", "base64:not-valid-base64!!")]),
        );

        let secret = m.materialize("app").unwrap();
        assert_eq!(secret.data["token"], "");
    }

    #[test]
    fn test_fetch_error_propagates() {
        let err = SecretError::fetch("creds/db", FetchErrorKind::Unauthorized, "unauthorized");
        let (m, _) = materializer(MockSecretStore::new().with_response("creds/db", Err(err.clone())));

        let result = m.materialize("/creds/db");
        assert_eq!(result, Err(err));
    }

    #[test]
    fn test_field_type_error_propagates() {
        let err = SecretError::field_type("cfg", "port", "number");
        let (m, _) = materializer(MockSecretStore::new().with_response("cfg", Err(err.clone())));

        assert_eq!(m.materialize("cfg"), Err(err));
    }

    #[test]
    fn test_trailing_separator_is_distinct_path() {
        let (m, store) = materializer(
            MockSecretStore::new().with_response("foo/", Ok(RawSecret::Found(SecretFields::new()))),
        );

        let secret = m.materialize("/foo/").unwrap();
        assert_eq!(secret.id, "path:foo/");
        assert_eq!(store.calls(), vec!["foo/".to_string()]);
    }

    #[test]
    fn test_concurrent_materialization() {
        let (m, store) = materializer(
            MockSecretStore::new()
                .with_secret("a", &[("v", "base64:YQ==")])
                .with_secret("b", &[("v", "base64:Yg==")]),
        );

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let m = m.clone();
                    scope.spawn(move || {
                        let path = if i % 2 == 0 { "/a" } else { "b" };
                        m.materialize(path).unwrap()
                    })
                })
                .collect();

            for (i, handle) in handles.into_iter().enumerate() {
                let secret = handle.join().unwrap();
                let expected = if i % 2 == 0 { "a" } else { "b" };
                assert_eq!(secret.data["v"], expected);
            }
        });

        assert_eq!(store.calls().len(), 8);
    }
}
