//! Redis-over-HTTP history repository (Upstash REST protocol).
//!
//! Each command is a POST of a JSON array (`["GET","history:U1"]`) to the
//! database URL with a bearer token. Replies are `{"result": ...}` on success
//! or `{"error": "..."}` on failure. History is stored under
//! [`history_key`] as a JSON string and written with `EX` so every save
//! refreshes the expiration.

use std::time::Duration;

use relaybot_core::history::repository::{HistoryRepository, history_key};
use relaybot_types::error::RepositoryError;
use relaybot_types::history::Turn;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;

/// Upstash-compatible Redis REST implementation of `HistoryRepository`.
///
/// The token is held as a [`SecretString`] and only exposed when building the
/// `Authorization` header.
pub struct RedisRestHistoryRepository {
    client: reqwest::Client,
    url: String,
    token: SecretString,
    ttl_secs: u64,
}

/// Raw command reply envelope.
#[derive(Debug, Deserialize)]
struct CommandReply {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

impl RedisRestHistoryRepository {
    /// Build a repository for the database at `url`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Connection` if the HTTP client cannot be built.
    pub fn new(
        url: impl Into<String>,
        token: SecretString,
        ttl_secs: u64,
        timeout: Duration,
    ) -> Result<Self, RepositoryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RepositoryError::Connection(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.into().trim_end_matches('/').to_string(),
            token,
            ttl_secs,
        })
    }

    /// Execute one command and return its `result` value.
    async fn command(&self, args: Vec<String>) -> Result<Value, RepositoryError> {
        let command_name = args.first().cloned().unwrap_or_default();

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(self.token.expose_secret())
            .json(&args)
            .send()
            .await
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;

        tracing::debug!(command = %command_name, status = status.as_u16(), "redis REST command");
        parse_command_reply(status.as_u16(), &body)
    }
}

/// Interpret a REST reply body. Errors in the envelope win over the status.
fn parse_command_reply(status: u16, body: &str) -> Result<Value, RepositoryError> {
    match serde_json::from_str::<CommandReply>(body) {
        Ok(CommandReply {
            error: Some(message),
            ..
        }) => Err(RepositoryError::Query(message)),
        Ok(reply) if (200..300).contains(&status) => Ok(reply.result.unwrap_or(Value::Null)),
        Ok(_) => Err(RepositoryError::Query(format!("HTTP {status}"))),
        Err(_) if (200..300).contains(&status) => Err(RepositoryError::Serialization(format!(
            "unexpected reply body: {body}"
        ))),
        Err(_) => Err(RepositoryError::Connection(format!("HTTP {status}: {body}"))),
    }
}

/// Decode a `GET` result into turns.
///
/// `null` means no record. A string holds the JSON-encoded array; an array is
/// accepted as-is for proxies that decode JSON values server-side.
fn decode_history(result: Value) -> Result<Option<Vec<Turn>>, RepositoryError> {
    let turns: Vec<Turn> = match result {
        Value::Null => return Ok(None),
        Value::String(raw) => serde_json::from_str(&raw),
        other @ Value::Array(_) => serde_json::from_value(other),
        other => {
            return Err(RepositoryError::Serialization(format!(
                "unexpected history value: {other}"
            )));
        }
    }
    .map_err(|e| RepositoryError::Serialization(format!("invalid history JSON: {e}")))?;

    Ok(Some(turns))
}

fn set_command(key: String, payload: String, ttl_secs: u64) -> Vec<String> {
    vec![
        "SET".to_string(),
        key,
        payload,
        "EX".to_string(),
        ttl_secs.max(1).to_string(),
    ]
}

impl HistoryRepository for RedisRestHistoryRepository {
    fn backend(&self) -> &str {
        "redis"
    }

    async fn read(&self, user_id: &str) -> Result<Option<Vec<Turn>>, RepositoryError> {
        let result = self
            .command(vec!["GET".to_string(), history_key(user_id)])
            .await?;
        decode_history(result)
    }

    async fn write(&self, user_id: &str, turns: &[Turn]) -> Result<(), RepositoryError> {
        let payload = serde_json::to_string(turns).map_err(|e| {
            RepositoryError::Serialization(format!("failed to serialize history: {e}"))
        })?;
        self.command(set_command(history_key(user_id), payload, self.ttl_secs))
            .await?;
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> Result<(), RepositoryError> {
        self.command(vec!["DEL".to_string(), history_key(user_id)])
            .await?;
        Ok(())
    }
}
