//! Service configuration.

use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;

use lucky_draw_core::{DrawError, PrizeTable, DEFAULT_KEY_LENGTH, DEFAULT_MAX_USES};

use crate::engine::KeyPolicy;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:5000").
    pub listen_addr: String,

    /// Path to `RocksDB` data directory (default: "/data/lucky-draw").
    pub data_dir: String,

    /// Shared token for webhook signatures. Unset means every webhook
    /// request fails verification.
    pub wechat_token: Option<String>,

    /// Base URL of the public pages linked from message replies.
    pub public_base_url: String,

    /// API key guarding `/clear_keys` (optional).
    pub admin_api_key: Option<String>,

    /// Largest usage count a key may be issued with.
    pub max_uses: u32,

    /// Digits per generated key code.
    pub key_length: usize,

    /// Fresh codes tried before a collision is reported.
    pub key_issue_attempts: u32,

    /// Fixed generator seed. Unset seeds from OS entropy.
    pub rng_seed: Option<u64>,

    /// JSON prize table to use instead of the built-in one.
    pub prize_table_path: Option<String>,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,
}

/// WeChat secrets file structure.
#[derive(Debug, Deserialize)]
struct WechatSecrets {
    token: String,
}

impl ServiceConfig {
    /// Load configuration from environment variables and secrets files.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            data_dir: std::env::var("DATA_DIR").unwrap_or(defaults.data_dir),
            wechat_token: load_wechat_token(),
            public_base_url: std::env::var("PUBLIC_BASE_URL").unwrap_or(defaults.public_base_url),
            admin_api_key: std::env::var("ADMIN_API_KEY").ok(),
            max_uses: env_parse("MAX_USES").unwrap_or(defaults.max_uses),
            key_length: env_parse("KEY_LENGTH").unwrap_or(defaults.key_length),
            key_issue_attempts: env_parse("KEY_ISSUE_ATTEMPTS")
                .unwrap_or(defaults.key_issue_attempts),
            rng_seed: env_parse("RNG_SEED"),
            prize_table_path: std::env::var("PRIZE_TABLE_PATH").ok(),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|o| o.trim().to_string()).collect())
                .unwrap_or(defaults.cors_origins),
            max_body_bytes: env_parse("MAX_BODY_BYTES").unwrap_or(defaults.max_body_bytes),
            request_timeout_seconds: env_parse("REQUEST_TIMEOUT_SECONDS")
                .unwrap_or(defaults.request_timeout_seconds),
        }
    }

    /// Issuance limits for the engine.
    #[must_use]
    pub fn key_policy(&self) -> KeyPolicy {
        KeyPolicy {
            max_uses: self.max_uses,
            key_length: self.key_length,
            issue_attempts: self.key_issue_attempts,
        }
    }

    /// The prize table: loaded from `prize_table_path` if set, built-in otherwise.
    ///
    /// # Errors
    ///
    /// Returns `DrawError::Configuration` if the file cannot be read or parsed.
    pub fn prize_table(&self) -> Result<PrizeTable, DrawError> {
        let Some(path) = &self.prize_table_path else {
            return Ok(PrizeTable::default());
        };

        let json = std::fs::read_to_string(path).map_err(|e| {
            DrawError::Configuration(format!("cannot read prize table {path}: {e}"))
        })?;
        let table = PrizeTable::from_json(&json)?;
        tracing::info!(path = %path, prizes = table.entries().len(), "Loaded prize table");
        Ok(table)
    }

    /// A generator seeded from `rng_seed`, or from OS entropy.
    #[must_use]
    pub fn rng(&self) -> StdRng {
        match self.rng_seed {
            Some(seed) => {
                tracing::warn!(seed, "Using a fixed RNG seed; draws are reproducible");
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.parse().ok())
}

/// Load the webhook token from file or environment.
fn load_wechat_token() -> Option<String> {
    let secret_paths = [".secrets/wechat.json", "../.secrets/wechat.json"];

    for path in &secret_paths {
        if let Ok(secrets) = load_secrets_file::<WechatSecrets>(path) {
            tracing::info!(path = %path, "Loaded WeChat secrets from file");
            return Some(secrets.token);
        }
    }

    tracing::debug!("WeChat secrets file not found, using environment variables");
    std::env::var("WECHAT_TOKEN").ok()
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, std::io::Error> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:5000".into(),
            data_dir: "/data/lucky-draw".into(),
            wechat_token: None,
            public_base_url: "https://zoro.work".into(),
            admin_api_key: None,
            max_uses: DEFAULT_MAX_USES,
            key_length: DEFAULT_KEY_LENGTH,
            key_issue_attempts: 8,
            rng_seed: None,
            prize_table_path: None,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use std::io::Write;

    #[test]
    fn defaults_match_engine_policy() {
        let config = ServiceConfig::default();
        assert_eq!(config.key_policy(), KeyPolicy::default());
        assert_eq!(config.public_base_url, "https://zoro.work");
    }

    #[test]
    fn builtin_prize_table_without_path() {
        let config = ServiceConfig::default();
        let table = config.prize_table().unwrap();
        assert_eq!(table.entries().len(), PrizeTable::default().entries().len());
    }

    #[test]
    fn prize_table_loaded_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"entries": [{{"name": "A", "probability": 0.5}}], "fallback": "none"}}"#
        )
        .unwrap();

        let config = ServiceConfig {
            prize_table_path: Some(file.path().to_string_lossy().into_owned()),
            ..ServiceConfig::default()
        };
        let table = config.prize_table().unwrap();
        assert_eq!(table.entries().len(), 1);
        assert_eq!(table.fallback(), "none");
    }

    #[test]
    fn missing_prize_table_is_configuration_error() {
        let config = ServiceConfig {
            prize_table_path: Some("/nonexistent/prizes.json".into()),
            ..ServiceConfig::default()
        };
        assert!(matches!(
            config.prize_table(),
            Err(DrawError::Configuration(_))
        ));
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let config = ServiceConfig {
            rng_seed: Some(7),
            ..ServiceConfig::default()
        };
        let a: u64 = config.rng().gen();
        let b: u64 = config.rng().gen();
        assert_eq!(a, b);
    }
}
