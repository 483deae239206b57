#[cfg(feature = "cli")]
pub mod cli;
pub mod env_file;
pub mod toml_config;

use crate::core::payload::{MockupTemplate, SUPPORTED_FORMATS};
use crate::utils::error::{RelayError, Result};
use crate::utils::validation::{
    validate_api_base_url, validate_non_empty_string, validate_one_of, validate_static_dir,
    validate_timeout_seconds, Validate,
};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STATIC_DIR: &str = "public";
pub const DEFAULT_PRINTFUL_BASE_URL: &str = "https://api.printful.com";

/// 整個程序共用、啟動後不再變動的設定
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub server: ServerSettings,
    pub printful: PrintfulSettings,
    pub mockup: MockupTemplate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub static_dir: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            static_dir: DEFAULT_STATIC_DIR.to_string(),
        }
    }
}

impl ServerSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintfulSettings {
    pub base_url: String,
    pub api_key: String,
    /// Unset means no local timeout beyond the transport default.
    pub timeout_seconds: Option<u64>,
}

impl Default for PrintfulSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PRINTFUL_BASE_URL.to_string(),
            api_key: String::new(),
            timeout_seconds: None,
        }
    }
}

// API key 不可出現在日誌裡
impl fmt::Debug for PrintfulSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrintfulSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &if self.api_key.is_empty() { "" } else { "***" })
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl Validate for RelayConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("server.host", &self.server.host)?;
        validate_static_dir("server.static_dir", &self.server.static_dir)?;

        validate_api_base_url("printful.base_url", &self.printful.base_url)?;
        if self.printful.api_key.is_empty() {
            return Err(RelayError::MissingConfigError {
                field: "printful.api_key (PRINTFUL_API_KEY)".to_string(),
            });
        }
        validate_non_empty_string("printful.api_key", &self.printful.api_key)?;
        if let Some(timeout) = self.printful.timeout_seconds {
            validate_timeout_seconds("printful.timeout_seconds", timeout)?;
        }

        if self.mockup.variant_ids.is_empty() {
            return Err(RelayError::InvalidConfigValueError {
                field: "mockup.variant_ids".to_string(),
                value: "[]".to_string(),
                reason: "At least one variant ID is required".to_string(),
            });
        }
        validate_one_of("mockup.format", &self.mockup.format, &SUPPORTED_FORMATS)?;

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }
}
