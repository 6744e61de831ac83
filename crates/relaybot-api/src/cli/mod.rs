//! CLI command definitions for the `relaybot` binary.
//!
//! Uses clap derive macros for argument parsing. The CLI follows a verb-noun
//! pattern (e.g., `relaybot serve`, `relaybot history show <user>`).

pub mod history;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use history::HistoryCommand;

/// Relay LINE messages to an OpenAI-compatible model with per-user history.
#[derive(Parser)]
#[command(name = "relaybot", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the webhook server.
    Serve {
        /// Port to listen on (defaults to $PORT, then 3000).
        #[arg(long)]
        port: Option<u16>,

        /// Address to bind.
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
    },

    /// Inspect or clear stored conversation history.
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

impl Cli {
    /// Log filter derived from `-v`/`--quiet`. The server logs at info by
    /// default; one-shot commands stay quiet unless asked.
    pub fn log_filter(&self) -> &'static str {
        let serving = matches!(self.command, Commands::Serve { .. });
        match self.verbose {
            0 if self.quiet => "error",
            0 if serving => "info",
            0 => "warn",
            1 => "info,relaybot_api=debug,relaybot_core=debug,relaybot_infra=debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_serve_with_port() {
        let cli = Cli::try_parse_from(["relaybot", "serve", "--port", "8080"]).unwrap();
        match cli.command {
            Commands::Serve { port, host } => {
                assert_eq!(port, Some(8080));
                assert_eq!(host, "0.0.0.0");
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn parse_history_show_json() {
        let cli =
            Cli::try_parse_from(["relaybot", "history", "show", "U123", "--json"]).unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::History {
                command: HistoryCommand::Show { user_id },
            } => assert_eq!(user_id, "U123"),
            _ => panic!("expected history show"),
        }
    }

    #[test]
    fn log_filter_levels() {
        let serve = Cli::try_parse_from(["relaybot", "serve"]).unwrap();
        assert_eq!(serve.log_filter(), "info");

        let quiet = Cli::try_parse_from(["relaybot", "--quiet", "history", "clear", "U1"]).unwrap();
        assert_eq!(quiet.log_filter(), "error");

        let oneshot = Cli::try_parse_from(["relaybot", "history", "clear", "U1"]).unwrap();
        assert_eq!(oneshot.log_filter(), "warn");

        let trace = Cli::try_parse_from(["relaybot", "-vv", "serve"]).unwrap();
        assert_eq!(trace.log_filter(), "trace");
    }
}
