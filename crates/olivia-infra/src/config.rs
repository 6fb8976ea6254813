//! Configuration loading for Olivia.
//!
//! Reads `config.toml` from the data directory (`~/.olivia/` in production)
//! into [`AppConfig`], falling back to defaults when the file is missing or
//! malformed, and resolves the completion API key from the environment.

use std::path::Path;

use secrecy::SecretString;

use olivia_types::config::AppConfig;
use olivia_types::error::ConfigError;

/// Environment variables checked for the API key, in priority order.
pub const API_KEY_VARS: [&str; 2] = ["OLIVIA_API_KEY", "OPENAI_API_KEY"];

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_app_config(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}

/// Resolve the completion API key from the process environment.
///
/// Called once at startup; a missing key is fatal.
pub fn resolve_api_key() -> Result<SecretString, ConfigError> {
    resolve_api_key_with(|name| std::env::var(name).ok())
}

/// Resolve the API key through `lookup`, taking the first non-blank value
/// among [`API_KEY_VARS`].
pub fn resolve_api_key_with(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    API_KEY_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .map(SecretString::from)
        .ok_or_else(|| ConfigError::MissingApiKey(API_KEY_VARS.join(" or ")))
}
