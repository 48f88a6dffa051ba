//! Connection settings for the Vault data source.
//!
//! Values are layered: command-line flags and `VAULT_*` environment variables
//! (resolved by clap) override the YAML config file, which overrides defaults.

use crate::traits::FileSystem;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

const CONFIG_DIR: &str = ".vault-data";
const CONFIG_FILE: &str = "config.yaml";
const API_VERSION: &str = "vault-data.io/v1";
const KIND: &str = "ProviderConfig";

pub const DEFAULT_ADDRESS: &str = "http://127.0.0.1:8200";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Resolved provider configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            token: None,
            namespace: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Config file resource
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfigResource {
    pub api_version: String,
    pub kind: String,
    #[serde(default)]
    pub spec: ProviderConfigSpec,
}

/// Every field is optional in the file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfigSpec {
    pub address: Option<String>,
    pub token: Option<String>,
    pub namespace: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub address: Option<String>,
    pub token: Option<String>,
    pub namespace: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ProviderConfig {
    /// Load configuration from `config_path` (or the default location) and
    /// apply overrides on top.
    ///
    /// A missing default file is fine; a missing explicit file is an error.
    pub fn load(
        fs: &dyn FileSystem,
        config_path: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Self> {
        let spec = match config_path {
            Some(path) => {
                if !fs.exists(path) {
                    bail!("Config file not found: {:?}", path);
                }
                Some(Self::read_spec(fs, path)?)
            }
            None => match Self::default_path() {
                Some(path) if fs.exists(&path) => Some(Self::read_spec(fs, &path)?),
                _ => None,
            },
        };

        let mut config = Self::default();
        if let Some(spec) = spec {
            config.merge_spec(spec);
        }
        config.apply_overrides(overrides);
        config.validate()?;

        Ok(config)
    }

    /// `~/.vault-data/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    fn read_spec(fs: &dyn FileSystem, path: &Path) -> Result<ProviderConfigSpec> {
        let content = fs.read_to_string(path)?;
        let resource: ProviderConfigResource = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        if resource.api_version != API_VERSION || resource.kind != KIND {
            bail!(
                "Unsupported config resource '{}/{}' in {:?}, expected '{}/{}'",
                resource.api_version,
                resource.kind,
                path,
                API_VERSION,
                KIND
            );
        }

        Ok(resource.spec)
    }

    fn merge_spec(&mut self, spec: ProviderConfigSpec) {
        if let Some(address) = spec.address {
            self.address = address;
        }
        if spec.token.is_some() {
            self.token = spec.token;
        }
        if spec.namespace.is_some() {
            self.namespace = spec.namespace;
        }
        if let Some(timeout) = spec.timeout_secs {
            self.timeout_secs = timeout;
        }
    }

    fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(address) = &overrides.address {
            self.address = address.clone();
        }
        if overrides.token.is_some() {
            self.token = overrides.token.clone();
        }
        if overrides.namespace.is_some() {
            self.namespace = overrides.namespace.clone();
        }
        if let Some(timeout) = overrides.timeout_secs {
            self.timeout_secs = timeout;
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.address_url()?;

        if self.timeout_secs == 0 {
            bail!("Timeout must be at least 1 second");
        }

        Ok(())
    }

    /// Parsed Vault address (http or https only)
    pub fn address_url(&self) -> Result<Url> {
        let url = Url::parse(&self.address)
            .with_context(|| format!("Invalid Vault address: {}", self.address))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            bail!(
                "Vault address must use http or https, got '{}'",
                url.scheme()
            );
        }

        Ok(url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
