use super::types::AdminCommand;

/// Parse a chat line as an admin command. Lines that are not `/newlife`
/// (or `/minl`) return `None` and should be moderated as ordinary chat.
pub fn parse_command(input: &str) -> Option<AdminCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let mut parts = trimmed.split_whitespace();
    let cmd = parts.next()?.to_lowercase();
    if !matches!(cmd.as_str(), "/newlife" | "/minl") {
        return None;
    }

    let sub = parts.next().unwrap_or("").to_lowercase();
    match sub.as_str() {
        "reload" => Some(AdminCommand::Reload),
        "stats" => Some(AdminCommand::Stats),
        "" | "help" | "?" => Some(AdminCommand::Help),
        _ => Some(AdminCommand::Unknown { sub }),
    }
}
