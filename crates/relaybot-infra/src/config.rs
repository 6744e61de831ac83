//! Runtime configuration loading.
//!
//! Two sources feed the service:
//!
//! - [`ServiceEnv`]: credentials and deployment knobs read from environment
//!   variables. Secrets are wrapped in [`SecretString`].
//! - [`RelayConfig`]: behavior settings from an optional `relaybot.toml`,
//!   falling back to defaults when the file is missing or malformed, then
//!   patched by a few environment overrides.

use std::path::{Path, PathBuf};

use relaybot_types::config::RelayConfig;
use relaybot_types::error::ConfigError;
use secrecy::{ExposeSecret, SecretString};

use crate::history::HistoryBackendChoice;

pub const ENV_LINE_ACCESS_TOKEN: &str = "LINE_CHANNEL_ACCESS_TOKEN";
pub const ENV_LINE_CHANNEL_SECRET: &str = "LINE_CHANNEL_SECRET";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_UPSTASH_URL: &str = "UPSTASH_REDIS_REST_URL";
pub const ENV_UPSTASH_TOKEN: &str = "UPSTASH_REDIS_REST_TOKEN";
pub const ENV_DATABASE_URL: &str = "RELAYBOT_DATABASE_URL";
pub const ENV_CONFIG_PATH: &str = "RELAYBOT_CONFIG";
pub const ENV_MAX_TURNS: &str = "RELAYBOT_MAX_TURNS";
pub const ENV_MODEL: &str = "RELAYBOT_MODEL";
pub const ENV_PORT: &str = "PORT";

/// Default listen port when neither `--port` nor `PORT` is given.
pub const DEFAULT_PORT: u16 = 3000;

/// Default relay config file, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "relaybot.toml";

/// Deployment settings gathered from the environment.
///
/// Empty values count as unset.
#[derive(Debug)]
pub struct ServiceEnv {
    pub line_access_token: Option<SecretString>,
    pub line_channel_secret: Option<SecretString>,
    pub openai_api_key: Option<SecretString>,
    pub openai_base_url: Option<String>,
    pub upstash_url: Option<String>,
    pub upstash_token: Option<SecretString>,
    pub database_url: Option<String>,
    pub port: Option<u16>,
    pub config_path: PathBuf,
}

impl ServiceEnv {
    /// Read from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read through an arbitrary lookup function.
    ///
    /// An unparsable `PORT` is logged and ignored, so the default port applies.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let secret = |key: &str| get(key).map(SecretString::from);

        let port = get(ENV_PORT).and_then(|raw| match parse_value::<u16>(ENV_PORT, &raw) {
            Ok(port) => Some(port),
            Err(err) => {
                tracing::warn!(error = %err, default = DEFAULT_PORT, "ignoring invalid port");
                None
            }
        });

        Self {
            line_access_token: secret(ENV_LINE_ACCESS_TOKEN),
            line_channel_secret: secret(ENV_LINE_CHANNEL_SECRET),
            openai_api_key: secret(ENV_OPENAI_API_KEY),
            openai_base_url: get(ENV_OPENAI_BASE_URL),
            upstash_url: get(ENV_UPSTASH_URL),
            upstash_token: secret(ENV_UPSTASH_TOKEN),
            database_url: get(ENV_DATABASE_URL),
            port,
            config_path: get(ENV_CONFIG_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)),
        }
    }

    /// Names of required variables that are unset.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.line_access_token.is_none() {
            missing.push(ENV_LINE_ACCESS_TOKEN);
        }
        if self.line_channel_secret.is_none() {
            missing.push(ENV_LINE_CHANNEL_SECRET);
        }
        if self.openai_api_key.is_none() {
            missing.push(ENV_OPENAI_API_KEY);
        }
        missing
    }

    /// Log one warning per missing required variable. Startup continues.
    pub fn warn_missing(&self) {
        for key in self.missing_required() {
            tracing::warn!(variable = key, "required environment variable is not set");
        }
    }

    /// Redis when both Upstash values are present, else SQLite when a
    /// database URL is present, else memory.
    pub fn history_backend(&self) -> HistoryBackendChoice {
        match (&self.upstash_url, &self.upstash_token, &self.database_url) {
            (Some(url), Some(token), _) => HistoryBackendChoice::Redis {
                url: url.clone(),
                token: SecretString::from(token.expose_secret().to_owned()),
            },
            (_, _, Some(database_url)) => HistoryBackendChoice::Sqlite {
                database_url: database_url.clone(),
            },
            _ => HistoryBackendChoice::Memory,
        }
    }

    /// Listen port: explicit flag, then `PORT`, then 3000.
    pub fn resolve_port(&self, flag: Option<u16>) -> u16 {
        flag.or(self.port).unwrap_or(DEFAULT_PORT)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Load relay configuration from a TOML file.
///
/// - If the file does not exist, returns [`RelayConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and returns the default.
pub async fn load_relay_config(path: &Path) -> RelayConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file found at {}, using defaults", path.display());
            return RelayConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return RelayConfig::default();
        }
    };

    match toml::from_str::<RelayConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            RelayConfig::default()
        }
    }
}

/// Apply `RELAYBOT_MAX_TURNS` and `RELAYBOT_MODEL` on top of a loaded config.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if `RELAYBOT_MAX_TURNS` is not a
/// non-negative integer.
pub fn apply_env_overrides(
    mut config: RelayConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<RelayConfig, ConfigError> {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(raw) = get(ENV_MAX_TURNS) {
        config.max_turns = parse_value(ENV_MAX_TURNS, &raw)?;
    }
    if let Some(model) = get(ENV_MODEL) {
        config.model = model.trim().to_string();
    }

    Ok(config)
}

/// File config plus environment overrides, from the process environment.
pub async fn resolve_relay_config(env: &ServiceEnv) -> Result<RelayConfig, ConfigError> {
    let config = load_relay_config(&env.config_path).await;
    apply_env_overrides(config, |key| std::env::var(key).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn service_env_empty_environment() {
        let env = ServiceEnv::from_lookup(lookup(&[]));
        assert_eq!(
            env.missing_required(),
            vec![ENV_LINE_ACCESS_TOKEN, ENV_LINE_CHANNEL_SECRET, ENV_OPENAI_API_KEY]
        );
        assert!(matches!(env.history_backend(), HistoryBackendChoice::Memory));
        assert_eq!(env.resolve_port(None), DEFAULT_PORT);
        assert_eq!(env.config_path, PathBuf::from(DEFAULT_CONFIG_FILE));
    }

    #[test]
    fn service_env_empty_strings_count_as_missing() {
        let env = ServiceEnv::from_lookup(lookup(&[
            (ENV_OPENAI_API_KEY, ""),
            (ENV_UPSTASH_URL, "  "),
            (ENV_PORT, ""),
        ]));
        assert!(env.openai_api_key.is_none());
        assert!(env.upstash_url.is_none());
        assert!(env.port.is_none());
    }

    #[test]
    fn service_env_reads_secrets() {
        let env = ServiceEnv::from_lookup(lookup(&[
            (ENV_LINE_ACCESS_TOKEN, "access"),
            (ENV_LINE_CHANNEL_SECRET, "secret"),
            (ENV_OPENAI_API_KEY, "sk-test"),
        ]));
        assert!(env.missing_required().is_empty());
        assert_eq!(
            env.line_channel_secret.as_ref().unwrap().expose_secret(),
            "secret"
        );
    }

    #[test]
    fn history_backend_prefers_redis() {
        let env = ServiceEnv::from_lookup(lookup(&[
            (ENV_UPSTASH_URL, "https://x.upstash.io"),
            (ENV_UPSTASH_TOKEN, "tok"),
            (ENV_DATABASE_URL, "sqlite://h.db"),
        ]));
        match env.history_backend() {
            HistoryBackendChoice::Redis { url, token } => {
                assert_eq!(url, "https://x.upstash.io");
                assert_eq!(token.expose_secret(), "tok");
            }
            other => panic!("expected redis, got {other:?}"),
        }
    }

    #[test]
    fn history_backend_needs_both_upstash_values() {
        let env = ServiceEnv::from_lookup(lookup(&[
            (ENV_UPSTASH_URL, "https://x.upstash.io"),
            (ENV_DATABASE_URL, "sqlite://h.db"),
        ]));
        assert!(matches!(
            env.history_backend(),
            HistoryBackendChoice::Sqlite { .. }
        ));

        let env = ServiceEnv::from_lookup(lookup(&[(ENV_UPSTASH_TOKEN, "tok")]));
        assert!(matches!(env.history_backend(), HistoryBackendChoice::Memory));
    }

    #[test]
    fn port_resolution_order() {
        let env = ServiceEnv::from_lookup(lookup(&[(ENV_PORT, "8080")]));
        assert_eq!(env.resolve_port(None), 8080);
        assert_eq!(env.resolve_port(Some(9000)), 9000);
    }

    #[test]
    fn invalid_port_falls_back_to_default() {
        let env = ServiceEnv::from_lookup(lookup(&[(ENV_PORT, "eighty")]));
        assert!(env.port.is_none());
        assert_eq!(env.resolve_port(None), DEFAULT_PORT);

        let env = ServiceEnv::from_lookup(lookup(&[(ENV_PORT, "70000")]));
        assert_eq!(env.resolve_port(None), DEFAULT_PORT);
        assert_eq!(env.resolve_port(Some(8080)), 8080);
    }

    #[test]
    fn env_overrides_apply() {
        let config = apply_env_overrides(
            RelayConfig::default(),
            lookup(&[(ENV_MAX_TURNS, "0"), (ENV_MODEL, "gpt-4o")]),
        )
        .unwrap();
        assert_eq!(config.max_turns, 0);
        assert_eq!(config.model, "gpt-4o");
    }

    #[test]
    fn env_override_rejects_negative_turns() {
        let err =
            apply_env_overrides(RelayConfig::default(), lookup(&[(ENV_MAX_TURNS, "-1")]))
                .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[tokio::test]
    async fn load_relay_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_relay_config(&tmp.path().join("relaybot.toml")).await;
        assert_eq!(config, RelayConfig::default());
    }

    #[tokio::test]
    async fn load_relay_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("relaybot.toml");
        tokio::fs::write(
            &path,
            r#"
max_turns = 3
model = "gpt-4.1-mini"
reset_keywords = ["/clear"]
"#,
        )
        .await
        .unwrap();

        let config = load_relay_config(&path).await;
        assert_eq!(config.max_turns, 3);
        assert_eq!(config.model, "gpt-4.1-mini");
        assert_eq!(config.reset_keywords, vec!["/clear".to_string()]);
        assert_eq!(config.max_reply_chars, RelayConfig::default().max_reply_chars);
    }

    #[tokio::test]
    async fn load_relay_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("relaybot.toml");
        tokio::fs::write(&path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_relay_config(&path).await;
        assert_eq!(config, RelayConfig::default());
    }
}
