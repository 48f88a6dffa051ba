use std::fmt;

/// Classification of a failed store call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The request never produced a response (connection refused, timeout, TLS)
    Transport,

    /// The store rejected the credentials (401/403)
    Unauthorized,

    /// The store reported an internal failure (5xx)
    Server,

    /// The store rejected the request for any other reason
    Request,

    /// The response body could not be interpreted
    MalformedResponse,
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FetchErrorKind::Transport => "transport",
            FetchErrorKind::Unauthorized => "unauthorized",
            FetchErrorKind::Server => "server",
            FetchErrorKind::Request => "request",
            FetchErrorKind::MalformedResponse => "malformed response",
        };
        f.write_str(name)
    }
}

/// Error types for secret materialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretError {
    /// The external store call failed
    Fetch {
        path: String,
        kind: FetchErrorKind,
        message: String,
    },

    /// A fetched field value was not a string
    FieldType {
        path: String,
        field: String,
        found: String,
    },
}

impl SecretError {
    pub fn fetch(path: impl Into<String>, kind: FetchErrorKind, message: impl Into<String>) -> Self {
        SecretError::Fetch {
            path: path.into(),
            kind,
            message: message.into(),
        }
    }

    pub fn field_type(
        path: impl Into<String>,
        field: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        SecretError::FieldType {
            path: path.into(),
            field: field.into(),
            found: found.into(),
        }
    }

    /// Fetch error kind, if this is a fetch failure
    #[allow(dead_code)]
    pub fn fetch_kind(&self) -> Option<FetchErrorKind> {
        match self {
            SecretError::Fetch { kind, .. } => Some(*kind),
            SecretError::FieldType { .. } => None,
        }
    }
}

impl fmt::Display for SecretError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretError::Fetch {
                path,
                kind,
                message,
            } => {
                write!(f, "Failed to read secret at '{}' ({}): {}", path, kind, message)
            }
            SecretError::FieldType { path, field, found } => {
                write!(
                    f,
                    "Field '{}' of secret at '{}' is a {}, expected a string",
                    field, path, found
                )
            }
        }
    }
}

impl std::error::Error for SecretError {}

/// Result type for secret operations
pub type SecretResult<T> = Result<T, SecretError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err = SecretError::fetch("creds/db", FetchErrorKind::Unauthorized, "permission denied");
        assert_eq!(
            err.to_string(),
            "Failed to read secret at 'creds/db' (unauthorized): permission denied"
        );
        assert_eq!(err.fetch_kind(), Some(FetchErrorKind::Unauthorized));
    }

    #[test]
    fn test_field_type_display() {
        let err = SecretError::field_type("creds/db", "port", "number");
        assert!(err.to_string().contains("'port'"));
        assert!(err.to_string().contains("number"));
        assert_eq!(err.fetch_kind(), None);
    }
}
