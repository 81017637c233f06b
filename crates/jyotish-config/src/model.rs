use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_ASTROLOGY_API_URL: &str = "https://json.astrologyapi.com/v1";
pub const DEFAULT_ASTROLOGY_USER_ID: &str = "default";
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Model used when none is configured, and the target of the 404 fallback.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Top-level configuration, built once at startup and handed to each client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub astrology: AstrologyConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Credentials and endpoint for the Kundali data provider.
#[derive(Clone, Serialize, Deserialize)]
pub struct AstrologyConfig {
    pub api_key: Option<String>,
    pub user_id: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl AstrologyConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for AstrologyConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            user_id: DEFAULT_ASTROLOGY_USER_ID.to_string(),
            base_url: DEFAULT_ASTROLOGY_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for AstrologyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AstrologyConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("user_id", &self.user_id)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_API_URL.to_string(),
        }
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

impl GatewayConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}
