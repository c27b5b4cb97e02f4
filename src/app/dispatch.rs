use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use newlife::config::{Config, ConfigHandle};
use newlife::moderation::{Classifier, HttpClassifier, ModerationEngine, WarningStore};
use newlife::transport::{ConsoleHost, serve};

use crate::app::status::{persisted_warned_actors, render_status};
use crate::cli::commands::{Cli, Commands};

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Run => run_console(config).await,
        Commands::Check { text } => check(&config, &text).await,
        Commands::Stats => {
            print_stats(&config)?;
            Ok(())
        }
        Commands::Status => {
            let warned = persisted_warned_actors(&config);
            println!("{}", render_status(&config, warned));
            Ok(())
        }
    }
}

async fn run_console(config: Config) -> Result<()> {
    let engine = Arc::new(ModerationEngine::new(
        ConfigHandle::new(config),
        Arc::new(ConsoleHost::new()),
        Handle::current(),
    )?);

    let cancel = CancellationToken::new();
    let maintenance = engine.spawn_maintenance(cancel.clone());

    info!("reading `actor: message` lines from stdin; /quit to stop");
    let stdin = BufReader::new(tokio::io::stdin());
    let outcome = tokio::select! {
        result = serve(Arc::clone(&engine), stdin) => result.map(|submitted| {
            info!(submitted, "console input closed");
        }),
        signal = tokio::signal::ctrl_c() => {
            info!("interrupted");
            signal.context("failed to listen for ctrl-c")
        }
    };

    cancel.cancel();
    maintenance
        .await
        .context("maintenance task did not shut down cleanly")?;
    outcome
}

async fn check(config: &Config, text: &str) -> Result<()> {
    let classifier = HttpClassifier::new(&config.api.endpoint, config.api.timeout());
    let verdict = classifier
        .classify(text)
        .await
        .with_context(|| format!("oracle at {} did not answer", classifier.endpoint()))?;
    println!("{verdict}");
    Ok(())
}

fn print_stats(config: &Config) -> Result<()> {
    let store = WarningStore::new(config.warnings_path());
    let warnings = store.load()?;
    let mut warned: Vec<(&String, &u32)> = warnings.iter().filter(|(_, count)| **count > 0).collect();
    warned.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    println!(
        "{} {} ({})",
        t!("status.persisted"),
        warned.len(),
        store.path().display()
    );
    for (actor, count) in warned {
        println!("  {actor}: {count}/{}", config.max_warnings);
    }
    Ok(())
}
