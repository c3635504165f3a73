//! Configuration (layered: defaults < TOML file < environment).

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::error::{RelayError, Result};
use crate::models::ProviderKey;

/// Default relay listen address.
pub const DEFAULT_BIND: &str = "127.0.0.1:3001";

/// Environment variable overriding the listen address.
pub const BIND_ENV_VAR: &str = "GTM_RELAY_BIND";

const PLACEHOLDER_SECRET: &str = "your_api_key_here";

/// Immutable process configuration: provider secrets, endpoint overrides,
/// and the listen address. Built once at startup and shared by reference.
#[derive(Clone, Default)]
pub struct RelayConfig {
    bind: Option<String>,
    api_keys: HashMap<ProviderKey, String>,
    base_urls: HashMap<ProviderKey, String>,
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut configured: Vec<_> = self.api_keys.keys().map(|k| k.as_str()).collect();
        configured.sort_unstable();
        f.debug_struct("RelayConfig")
            .field("bind", &self.bind_address())
            .field("api_keys", &configured)
            .field("base_urls", &self.base_urls)
            .finish()
    }
}

/// On-disk TOML shape.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    server: ServerSection,
    #[serde(default)]
    providers: BTreeMap<String, ProviderSection>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSection {
    bind: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ProviderSection {
    api_key: Option<String>,
    base_url: Option<String>,
}

/// Empty and placeholder secrets count as unset.
fn usable_secret(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty() && trimmed != PLACEHOLDER_SECRET).then(|| trimmed.to_string())
}

/// Blank base URLs count as unset; the vendor default endpoint applies.
fn usable_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl RelayConfig {
    /// Empty config: no secrets, default endpoints, default bind address.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from the process environment (loading `.env` first if present).
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // .env is optional
        Self::new().with_env()
    }

    /// Parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Parse TOML config text.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let file: FileConfig = toml::from_str(raw)
            .map_err(|e| RelayError::Configuration(format!("invalid config: {e}")))?;

        let mut config = Self::new();
        config.bind = file.server.bind;
        for (name, section) in file.providers {
            let key = ProviderKey::parse(&name).ok_or_else(|| {
                RelayError::Configuration(format!("unknown provider '{name}' in config"))
            })?;
            if let Some(secret) = section.api_key.as_deref().and_then(usable_secret) {
                config.api_keys.insert(key, secret);
            }
            if let Some(url) = section.base_url.as_deref().and_then(usable_url) {
                config.base_urls.insert(key, url);
            }
        }
        Ok(config)
    }

    /// Overlay values from the process environment.
    pub fn with_env(self) -> Self {
        self.with_lookup(|name| std::env::var(name).ok())
    }

    /// Overlay values from an arbitrary variable lookup.
    pub fn with_lookup(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        for key in ProviderKey::ALL {
            let secret = key
                .api_key_env_vars()
                .iter()
                .find_map(|var| lookup(var).as_deref().and_then(usable_secret));
            if let Some(secret) = secret {
                self.api_keys.insert(key, secret);
            }
            if let Some(url) = lookup(key.base_url_env_var()).as_deref().and_then(usable_url) {
                self.base_urls.insert(key, url);
            }
        }
        if let Some(bind) = lookup(BIND_ENV_VAR) {
            self.bind = Some(bind);
        }
        self
    }

    pub fn with_api_key(mut self, provider: ProviderKey, secret: impl Into<String>) -> Self {
        if let Some(secret) = usable_secret(&secret.into()) {
            self.api_keys.insert(provider, secret);
        }
        self
    }

    pub fn with_base_url(mut self, provider: ProviderKey, url: impl Into<String>) -> Self {
        if let Some(url) = usable_url(&url.into()) {
            self.base_urls.insert(provider, url);
        }
        self
    }

    pub fn with_bind(mut self, bind: impl Into<String>) -> Self {
        self.bind = Some(bind.into());
        self
    }

    pub fn api_key(&self, provider: ProviderKey) -> Option<&str> {
        self.api_keys.get(&provider).map(String::as_str)
    }

    pub fn base_url(&self, provider: ProviderKey) -> Option<&str> {
        self.base_urls.get(&provider).map(String::as_str)
    }

    /// Absolute chat-completions URL for a provider.
    pub fn endpoint(&self, provider: ProviderKey) -> String {
        provider.endpoint(self.base_url(provider))
    }

    pub fn bind_address(&self) -> &str {
        self.bind.as_deref().unwrap_or(DEFAULT_BIND)
    }

    pub fn has_credentials(&self, provider: ProviderKey) -> bool {
        self.api_keys.contains_key(&provider)
    }

    /// Providers with a usable secret, in catalog order.
    pub fn configured_providers(&self) -> Vec<ProviderKey> {
        ProviderKey::ALL
            .into_iter()
            .filter(|k| self.has_credentials(*k))
            .collect()
    }
}
