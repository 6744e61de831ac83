//! Inbound text classification.

use relaybot_types::config::RelayConfig;

/// What an inbound text asks the relay to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// Clear the sender's history and acknowledge.
    Reset,
    /// Relay the (trimmed) text to the completion service.
    Chat(&'a str),
}

impl<'a> Command<'a> {
    /// Classify a raw message body. Surrounding whitespace is ignored and the
    /// reset vocabulary is matched exactly.
    pub fn parse(text: &'a str, config: &RelayConfig) -> Self {
        let text = text.trim();
        if config.is_reset_keyword(text) {
            Command::Reset
        } else {
            Command::Chat(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_keywords_are_recognized() {
        let config = RelayConfig::default();
        assert_eq!(Command::parse("/reset", &config), Command::Reset);
        assert_eq!(Command::parse("  リセット\n", &config), Command::Reset);
    }

    #[test]
    fn other_text_is_chat_and_trimmed() {
        let config = RelayConfig::default();
        assert_eq!(Command::parse(" hello ", &config), Command::Chat("hello"));
        assert_eq!(
            Command::parse("/reset now", &config),
            Command::Chat("/reset now")
        );
    }

    #[test]
    fn custom_vocabulary() {
        let config = RelayConfig {
            reset_keywords: vec!["/clear".to_string()],
            ..Default::default()
        };
        assert_eq!(Command::parse("/clear", &config), Command::Reset);
        assert_eq!(Command::parse("/reset", &config), Command::Chat("/reset"));
    }
}
