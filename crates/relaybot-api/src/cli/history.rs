//! History CLI subcommands.
//!
//! Operates directly on the configured backend (the same one `serve` would
//! use), so operators can inspect or wipe a user's conversation. Unlike the
//! relay path, backend errors are reported instead of swallowed.

use anyhow::{Context, Result};
use clap::Subcommand;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use relaybot_core::history::repository::HistoryRepository;
use relaybot_types::history::{Turn, TurnRole};

/// History subcommands.
#[derive(Subcommand)]
pub enum HistoryCommand {
    /// Print the stored turns for a user, oldest first.
    Show {
        /// Platform user id (e.g., U4af4980629...).
        user_id: String,
    },

    /// Delete everything stored for a user.
    Clear {
        /// Platform user id.
        user_id: String,
    },
}

/// Handle a history subcommand against `repository`.
pub async fn handle_history_command<R: HistoryRepository>(
    cmd: HistoryCommand,
    repository: &R,
    json: bool,
) -> Result<()> {
    match cmd {
        HistoryCommand::Show { user_id } => show_history(repository, &user_id, json).await,
        HistoryCommand::Clear { user_id } => clear_history(repository, &user_id, json).await,
    }
}

async fn show_history<R: HistoryRepository>(repository: &R, user_id: &str, json: bool) -> Result<()> {
    let turns = repository
        .read(user_id)
        .await
        .with_context(|| format!("Failed to read history for '{user_id}' from {}", repository.backend()))?
        .unwrap_or_default();

    if json {
        println!("{}", serde_json::to_string_pretty(&history_json(user_id, &turns))?);
        return Ok(());
    }

    println!();
    if turns.is_empty() {
        println!(
            "  {} No history stored for '{}' ({})",
            style("i").blue().bold(),
            style(user_id).cyan(),
            repository.backend(),
        );
    } else {
        println!(
            "  {} turns for '{}' ({})",
            style(turns.len()).bold(),
            style(user_id).cyan(),
            repository.backend(),
        );
        println!();
        println!("{}", history_table(&turns));
    }
    println!();

    Ok(())
}

async fn clear_history<R: HistoryRepository>(repository: &R, user_id: &str, json: bool) -> Result<()> {
    repository
        .delete(user_id)
        .await
        .with_context(|| format!("Failed to clear history for '{user_id}' in {}", repository.backend()))?;

    if json {
        let result = serde_json::json!({
            "cleared": user_id,
            "backend": repository.backend(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        println!(
            "  {} Cleared history for '{}'",
            style("ok").green(),
            style(user_id).cyan(),
        );
        println!();
    }

    Ok(())
}

fn history_json(user_id: &str, turns: &[Turn]) -> serde_json::Value {
    serde_json::json!({
        "user_id": user_id,
        "turns": turns,
    })
}

fn history_table(turns: &[Turn]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Role", "Content"]);

    for (i, turn) in turns.iter().enumerate() {
        let role_color = match turn.role {
            TurnRole::User => Color::Cyan,
            TurnRole::Assistant => Color::Magenta,
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(turn.role).fg(role_color),
            Cell::new(&turn.content),
        ]);
    }

    table
}
