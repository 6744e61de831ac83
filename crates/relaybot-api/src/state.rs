//! Application state wiring the relay together.
//!
//! The relay service is generic over its ports; AppState pins it to the
//! concrete infra implementations chosen from the environment.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use relaybot_core::history::box_repository::BoxHistoryRepository;
use relaybot_core::history::repository::HistoryRepository;
use relaybot_core::messaging::client::MessagingClient;
use relaybot_core::relay::service::RelayService;
use relaybot_infra::config::ServiceEnv;
use relaybot_infra::history::build_history_repository;
use relaybot_infra::line::client::LineMessagingClient;
use relaybot_infra::llm::openai::OpenAiChatProvider;
use relaybot_infra::llm::openai::config::openai_defaults;
use relaybot_types::config::RelayConfig;

/// Concrete relay pinned to infra implementations.
pub type ConcreteRelayService =
    RelayService<BoxHistoryRepository, OpenAiChatProvider, LineMessagingClient>;

/// Shared state for the webhook server.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<ConcreteRelayService>,
    /// Channel secret for webhook signatures. `None` rejects every callback.
    pub channel_secret: Option<Arc<SecretString>>,
}

impl AppState {
    pub fn new(relay: ConcreteRelayService, channel_secret: Option<SecretString>) -> Self {
        Self {
            relay: Arc::new(relay),
            channel_secret: channel_secret.map(Arc::new),
        }
    }

    /// Build the history backend, completion provider, and reply client from
    /// the environment and relay configuration.
    pub async fn init(env: ServiceEnv, config: RelayConfig) -> anyhow::Result<Self> {
        let repository = build_history_repository(env.history_backend(), &config).await?;

        // A missing key still builds a provider; every call then fails into
        // the fallback reply.
        let api_key = env
            .openai_api_key
            .unwrap_or_else(|| SecretString::from(String::new()));
        let llm = OpenAiChatProvider::new(openai_defaults(
            api_key,
            &config.model,
            env.openai_base_url.as_deref(),
            config.request_timeout_secs,
        ))?;

        let messaging = LineMessagingClient::new(
            env.line_access_token,
            Duration::from_secs(config.request_timeout_secs),
        )?;

        tracing::info!(
            backend = repository.backend(),
            model = llm.model(),
            platform = messaging.platform(),
            max_turns = config.max_turns,
            "relay initialized"
        );

        let relay = RelayService::new(repository, llm, messaging, config);
        Ok(Self::new(relay, env.line_channel_secret))
    }
}
