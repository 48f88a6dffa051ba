//! Read-only access to secrets held in a remote key-value store.
//!
//! The materializer normalizes a store path, fetches the secret through a
//! [`SecretStore`] and decodes `base64:`-prefixed field values. [`VaultClient`]
//! is the HashiCorp Vault implementation of the store boundary.

pub mod decode;
pub mod error;
mod http;
pub mod materializer;
pub mod store;
mod vault;

pub use decode::decode_field;
pub use error::SecretResult;
pub use materializer::SecretMaterializer;
pub use store::{SecretFields, SecretStore};
pub use vault::VaultClient;

#[cfg(test)]
pub use error::{FetchErrorKind, SecretError};
#[cfg(test)]
pub use store::MockSecretStore;
