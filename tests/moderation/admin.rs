use wiremock::MockServer;

use newlife::{AdminCommand, handle_command, parse_command};

use super::moderation_harness::{fixture, flag_text};

#[tokio::test]
async fn stats_then_reload_resets_cache_only() {
    let server = MockServer::start().await;
    flag_text(&server, "bad", 2).await;
    let fx = fixture(&server, "admins = [\"op\"]");

    fx.engine.on_message("quinn", "bad").await.unwrap();

    let command = parse_command("/newlife stats").unwrap();
    let stats = handle_command(&fx.engine, &command, true);
    assert_eq!(stats.text, "Actors with warnings: 1, cached decisions: 1");

    let reload = handle_command(&fx.engine, &parse_command("/minl reload").unwrap(), true);
    assert_eq!(reload.text, "Configuration reloaded.");
    assert_eq!(fx.engine.stats().cache_entries, 0);

    // Cache is empty again, so the oracle is asked a second time.
    fx.engine.on_message("quinn", "bad").await.unwrap();
    assert_eq!(fx.engine.warnings_for("quinn"), 2);
    server.verify().await;
}

#[tokio::test]
async fn reload_applies_new_limits() {
    let server = MockServer::start().await;
    flag_text(&server, "bad", 1).await;
    let fx = fixture(&server, "max-warnings = 5");
    fx.engine.on_message("rita", "bad").await.unwrap();

    fx.rewrite_config(&server, "max-warnings = 2");
    handle_command(&fx.engine, &AdminCommand::Reload, true);

    assert_eq!(fx.engine.config().load().max_warnings, 2);
}

#[tokio::test]
async fn non_admin_cannot_reload() {
    let server = MockServer::start().await;
    let fx = fixture(&server, "max-warnings = 5");
    fx.rewrite_config(&server, "max-warnings = 2");

    let result = handle_command(&fx.engine, &AdminCommand::Reload, false);

    assert!(result.ephemeral);
    assert_eq!(fx.engine.config().load().max_warnings, 5);
}
