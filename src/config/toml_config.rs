use crate::core::cart_manager::{CartOptions, Messages, DEFAULT_STORAGE_KEY};
use crate::utils::error::{CartError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:3333";
pub const DEFAULT_STORE_DIR: &str = "./.cart-sync";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub inventory: InventoryConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    pub messages: Option<Messages>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryConfig {
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub directory: String,
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            directory: DEFAULT_STORE_DIR.to_string(),
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// Configuration with defaults everywhere except the endpoint.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            inventory: InventoryConfig {
                endpoint: endpoint.into(),
                timeout_seconds: None,
            },
            storage: StorageConfig::default(),
            messages: None,
            logging: None,
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CartError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| CartError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("inventory.endpoint", &self.inventory.endpoint)?;

        if let Some(timeout) = self.inventory.timeout_seconds {
            validate_range("inventory.timeout_seconds", timeout, 1, 300)?;
        }

        validate_path("storage.directory", &self.storage.directory)?;
        validate_non_empty_string("storage.key", &self.storage.key)?;

        if let Some(messages) = &self.messages {
            validate_non_empty_string("messages.out_of_stock", &messages.out_of_stock)?;
            validate_non_empty_string("messages.add_failed", &messages.add_failed)?;
            validate_non_empty_string("messages.remove_failed", &messages.remove_failed)?;
            validate_non_empty_string("messages.update_failed", &messages.update_failed)?;
        }

        Ok(())
    }

    pub fn endpoint(&self) -> &str {
        &self.inventory.endpoint
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.inventory.timeout_seconds.map(Duration::from_secs)
    }

    pub fn cart_options(&self) -> CartOptions {
        CartOptions {
            storage_key: self.storage.key.clone(),
            messages: self.messages.clone().unwrap_or_default(),
        }
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
