use super::types::{AdminCommand, CommandResult};
use crate::moderation::ModerationEngine;

/// Run an admin command. The host decides whether the sender is an admin.
pub fn handle_command(
    engine: &ModerationEngine,
    command: &AdminCommand,
    is_admin: bool,
) -> CommandResult {
    if !is_admin {
        return CommandResult::ephemeral(t!("admin.denied"));
    }

    match command {
        AdminCommand::Reload => handle_reload(engine),
        AdminCommand::Stats => handle_stats(engine),
        AdminCommand::Help => handle_help(),
        AdminCommand::Unknown { sub } => handle_unknown(sub),
    }
}

fn handle_reload(engine: &ModerationEngine) -> CommandResult {
    match engine.reload() {
        Ok(()) => CommandResult::visible(t!("admin.reload_ok")),
        Err(error) => {
            tracing::warn!(%error, "admin reload failed");
            CommandResult::ephemeral(t!("admin.reload_failed", error = format!("{error:#}")))
        }
    }
}

fn handle_stats(engine: &ModerationEngine) -> CommandResult {
    let stats = engine.stats();
    CommandResult::visible(t!(
        "admin.stats",
        actors = stats.actors_with_warnings,
        cached = stats.cache_entries
    ))
}

fn handle_help() -> CommandResult {
    CommandResult::visible(t!("admin.usage"))
}

fn handle_unknown(sub: &str) -> CommandResult {
    CommandResult::ephemeral(format!(
        "{}\n{}",
        t!("admin.unknown", sub = sub),
        t!("admin.usage")
    ))
}
