use jyotish_common::{Error, Result};
use tracing::{debug, info};

use crate::model::{AppConfig, AstrologyConfig, GatewayConfig, GeminiConfig};

/// Builds an [`AppConfig`] from environment variables.
///
/// | variable                 | default                             |
/// |--------------------------|-------------------------------------|
/// | `ASTROLOGY_API_KEY`      | unset                               |
/// | `ASTROLOGY_USER_ID`      | `default`                           |
/// | `ASTROLOGY_API_URL`      | `https://json.astrologyapi.com/v1`  |
/// | `ASTROLOGY_TIMEOUT_SECS` | `30`                                |
/// | `GEMINI_API_KEY`         | unset                               |
/// | `GEMINI_MODEL`           | `gemini-2.5-flash`                  |
/// | `GEMINI_API_URL`         | Generative Language `v1beta/models` |
/// | `JYOTISH_HOST`           | `127.0.0.1`                         |
/// | `JYOTISH_PORT`           | `3000`                              |
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load `.env` (if present) and then read the process environment.
    pub fn from_env() -> Result<AppConfig> {
        match dotenvy::dotenv() {
            Ok(path) => info!("loaded environment from {}", path.display()),
            Err(e) if e.not_found() => debug!("no .env file found"),
            Err(e) => return Err(Error::Config(format!("failed to read .env: {e}"))),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<AppConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let astrology_defaults = AstrologyConfig::default();
        let astrology = AstrologyConfig {
            api_key: get("ASTROLOGY_API_KEY"),
            user_id: get("ASTROLOGY_USER_ID").unwrap_or(astrology_defaults.user_id),
            base_url: get("ASTROLOGY_API_URL")
                .map(trim_trailing_slash)
                .unwrap_or(astrology_defaults.base_url),
            timeout_secs: match get("ASTROLOGY_TIMEOUT_SECS") {
                Some(raw) => parse_timeout(&raw)?,
                None => astrology_defaults.timeout_secs,
            },
        };

        let gemini_defaults = GeminiConfig::default();
        let gemini = GeminiConfig {
            api_key: get("GEMINI_API_KEY"),
            model: get("GEMINI_MODEL").unwrap_or(gemini_defaults.model),
            base_url: get("GEMINI_API_URL")
                .map(trim_trailing_slash)
                .unwrap_or(gemini_defaults.base_url),
        };

        let gateway_defaults = GatewayConfig::default();
        let gateway = GatewayConfig {
            host: get("JYOTISH_HOST").unwrap_or(gateway_defaults.host),
            port: match get("JYOTISH_PORT") {
                Some(raw) => parse_number("JYOTISH_PORT", &raw)?,
                None => gateway_defaults.port,
            },
        };

        Ok(AppConfig {
            astrology,
            gemini,
            gateway,
        })
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| Error::Config(format!("{key} must be a number, got '{raw}'")))
}

fn parse_timeout(raw: &str) -> Result<u64> {
    match parse_number("ASTROLOGY_TIMEOUT_SECS", raw)? {
        0 => Err(Error::Config(
            "ASTROLOGY_TIMEOUT_SECS must be at least 1 second".to_string(),
        )),
        secs => Ok(secs),
    }
}

fn trim_trailing_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DEFAULT_ASTROLOGY_API_URL, DEFAULT_GEMINI_MODEL};
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ConfigLoader::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.astrology.api_key, None);
        assert_eq!(config.astrology.user_id, "default");
        assert_eq!(config.astrology.base_url, DEFAULT_ASTROLOGY_API_URL);
        assert_eq!(config.astrology.timeout_secs, 30);
        assert_eq!(config.gemini.api_key, None);
        assert_eq!(config.gemini.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.gateway.port, 3000);
    }

    #[test]
    fn reads_all_known_variables() {
        let config = load(&[
            ("ASTROLOGY_API_KEY", "astro-key"),
            ("ASTROLOGY_USER_ID", "12345"),
            ("ASTROLOGY_API_URL", "http://localhost:9000/v1/"),
            ("ASTROLOGY_TIMEOUT_SECS", "5"),
            ("GEMINI_API_KEY", "gem-key"),
            ("GEMINI_MODEL", "gemini-1.5-pro"),
            ("GEMINI_API_URL", "http://localhost:9001/models"),
            ("JYOTISH_HOST", "0.0.0.0"),
            ("JYOTISH_PORT", "8080"),
        ])
        .unwrap();

        assert_eq!(config.astrology.api_key.as_deref(), Some("astro-key"));
        assert_eq!(config.astrology.user_id, "12345");
        assert_eq!(config.astrology.base_url, "http://localhost:9000/v1");
        assert_eq!(config.astrology.timeout_secs, 5);
        assert_eq!(config.gemini.api_key.as_deref(), Some("gem-key"));
        assert_eq!(config.gemini.model, "gemini-1.5-pro");
        assert_eq!(config.gemini.base_url, "http://localhost:9001/models");
        assert_eq!(config.gateway.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn blank_values_are_treated_as_unset() {
        let config = load(&[("GEMINI_API_KEY", "   "), ("GEMINI_MODEL", "")]).unwrap();
        assert_eq!(config.gemini.api_key, None);
        assert_eq!(config.gemini.model, DEFAULT_GEMINI_MODEL);
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = load(&[("ASTROLOGY_TIMEOUT_SECS", "0")]).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("at least 1 second"));

        let config = load(&[("ASTROLOGY_TIMEOUT_SECS", "1")]).unwrap();
        assert_eq!(config.astrology.timeout_secs, 1);
    }

    #[test]
    fn rejects_non_numeric_port() {
        let err = load(&[("JYOTISH_PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("JYOTISH_PORT"));
    }
}
