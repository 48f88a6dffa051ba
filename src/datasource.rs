//! Read-only data source exposing a Vault secret to IaC tooling.
//!
//! Create and Update are plain reads because the store is never written to;
//! Delete only forgets the local state.

use crate::secrets::{SecretFields, SecretMaterializer, SecretResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type of a schema attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
    Map,
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeType::String => f.write_str("string"),
            AttributeType::Map => f.write_str("map"),
        }
    }
}

/// One attribute in the data source schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    pub description: &'static str,
    pub required: bool,
    pub computed: bool,
}

/// Attributes of the secret data source: `path` in, `data` out
pub fn schema() -> Vec<Attribute> {
    vec![
        Attribute {
            name: "path",
            attr_type: AttributeType::String,
            description: "path to the secret store",
            required: true,
            computed: false,
        },
        Attribute {
            name: "data",
            attr_type: AttributeType::Map,
            description: "contents of the secret storage at 'path'",
            required: false,
            computed: true,
        },
    ]
}

/// State of one data source instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceData {
    /// Empty until the first successful read
    pub id: String,
    pub path: String,
    pub data: SecretFields,
}

impl ResourceData {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

pub struct SecretDataSource {
    materializer: SecretMaterializer,
}

impl SecretDataSource {
    pub fn new(materializer: SecretMaterializer) -> Self {
        Self { materializer }
    }

    #[allow(dead_code)]
    pub fn create(&self, state: &mut ResourceData) -> SecretResult<()> {
        self.read(state)
    }

    /// Refresh `id` and `data` from the store.
    ///
    /// On failure the state is left exactly as it was.
    pub fn read(&self, state: &mut ResourceData) -> SecretResult<()> {
        let secret = self.materializer.materialize(&state.path)?;
        state.id = secret.id;
        state.data = secret.data;
        Ok(())
    }

    #[allow(dead_code)]
    pub fn update(&self, state: &mut ResourceData) -> SecretResult<()> {
        self.read(state)
    }

    #[allow(dead_code)]
    pub fn delete(&self, state: &mut ResourceData) {
        state.id.clear();
        state.data.clear();
    }
}
