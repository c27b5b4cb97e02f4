use std::borrow::Cow;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::commands::{handle_command, parse_command};
use crate::moderation::{ConsequencePlan, EscalationOutcome, HostFuture, ModerationEngine, ModerationHost};

/// Console host: every host action is printed to stdout.
pub struct ConsoleHost;

impl ConsoleHost {
    pub fn new() -> Self {
        Self
    }
}

impl ModerationHost for ConsoleHost {
    fn suppress<'a>(&'a self, actor_id: &'a str, message_id: Uuid) -> HostFuture<'a> {
        Box::pin(async move {
            println!("[suppressed] {actor_id} ({message_id})");
            Ok(())
        })
    }

    fn warn<'a>(&'a self, actor_id: &'a str, text: &'a str) -> HostFuture<'a> {
        Box::pin(async move {
            println!("[to {actor_id}] {text}");
            Ok(())
        })
    }

    fn apply_consequence<'a>(
        &'a self,
        actor_id: &'a str,
        plan: &'a ConsequencePlan,
    ) -> HostFuture<'a> {
        Box::pin(async move {
            println!("[removed] {actor_id}");
            if let Some(effects) = &plan.effects {
                if effects.lightning.enabled {
                    println!("  lightning x{}", effects.lightning.strike_count);
                }
                if effects.particles.enabled {
                    println!("  particles x{}", effects.particles.count);
                }
                if effects.sounds.enabled {
                    println!(
                        "  sound {} (volume {}, pitch {})",
                        effects.sounds.sound, effects.sounds.volume, effects.sounds.pitch
                    );
                }
            }
            Ok(())
        })
    }

    fn broadcast<'a>(&'a self, text: &'a str) -> HostFuture<'a> {
        Box::pin(async move {
            println!("[all] {text}");
            Ok(())
        })
    }
}

/// One line of console input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleLine {
    /// `actor: text`
    Chat { actor: String, text: String },
    /// `/join actor`
    Join { actor: String },
    /// `/quit` or `/exit`
    Quit,
}

pub fn parse_line(line: &str) -> Option<ConsoleLine> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if line == "/quit" || line == "/exit" {
        return Some(ConsoleLine::Quit);
    }
    if let Some(actor) = line.strip_prefix("/join ") {
        let actor = actor.trim();
        return (!actor.is_empty()).then(|| ConsoleLine::Join {
            actor: actor.to_string(),
        });
    }

    let (actor, text) = line.split_once(':')?;
    let (actor, text) = (actor.trim(), text.trim());
    if actor.is_empty() || text.is_empty() || actor.contains(char::is_whitespace) {
        return None;
    }
    Some(ConsoleLine::Chat {
        actor: actor.to_string(),
        text: text.to_string(),
    })
}

/// Feed console lines into `engine` until EOF or `/quit`, then wait for
/// outstanding decisions. Returns the number of chat messages submitted.
///
/// Invalid UTF-8 is replaced, and read errors end the loop after a warning,
/// so a single bad line never drops the messages around it.
pub async fn serve<R>(engine: Arc<ModerationEngine>, mut reader: R) -> anyhow::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let mut pending: Vec<JoinHandle<Option<EscalationOutcome>>> = Vec::new();
    let mut submitted = 0;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(error) => {
                tracing::warn!(%error, "console read failed; closing input");
                break;
            }
        }
        let decoded = String::from_utf8_lossy(&buf);
        if matches!(decoded, Cow::Owned(_)) {
            tracing::debug!("console line was not valid UTF-8; decoded lossily");
        }
        let line = decoded.trim_end_matches(['\r', '\n']);

        let Some(parsed) = parse_line(line) else {
            if !line.trim().is_empty() {
                eprintln!("expected `actor: message`, `/join actor` or `/quit`");
            }
            continue;
        };

        match parsed {
            ConsoleLine::Quit => break,
            ConsoleLine::Join { actor } => {
                if let Some(notice) = engine.on_join(&actor) {
                    println!("[to {actor}] {notice}");
                }
            }
            ConsoleLine::Chat { actor, text } => {
                if let Some(command) = parse_command(&text) {
                    let is_admin = engine.config().load().is_admin(&actor);
                    let result = handle_command(&engine, &command, is_admin);
                    if result.ephemeral {
                        println!("[to {actor}] {}", result.text);
                    } else {
                        println!("{}", result.text);
                    }
                    continue;
                }

                println!("<{actor}> {text}");
                pending.retain(|handle| !handle.is_finished());
                pending.push(engine.on_message(&actor, &text));
                submitted += 1;
            }
        }
    }

    for handle in pending {
        if let Err(error) = handle.await {
            tracing::warn!(%error, "moderation task failed");
        }
    }
    Ok(submitted)
}
