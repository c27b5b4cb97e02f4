use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use wiremock::MockServer;

use newlife::moderation::{EscalationOutcome, WarningStore};

use super::moderation_harness::{CapturingHost, engine_at, fixture, flag_text};

#[tokio::test]
async fn warnings_carry_over_to_a_new_engine() {
    let server = MockServer::start().await;
    flag_text(&server, "bad", 1).await;
    let fx = fixture(&server, "max-warnings = 3");

    fx.engine.on_message("mia", "bad").await.unwrap();
    fx.engine.on_message("mia", "bad").await.unwrap();
    fx.engine.shutdown().await;

    let restarted = engine_at(fx.dir.path(), Arc::new(CapturingHost::default()));
    assert_eq!(restarted.warnings_for("mia"), 2);
    assert_eq!(
        restarted.on_join("mia").as_deref(),
        Some("[NewLife] You have 2/3 warnings for inappropriate behavior.")
    );
}

#[tokio::test]
async fn persisted_file_is_a_plain_json_object() {
    let server = MockServer::start().await;
    flag_text(&server, "bad", 1).await;
    let fx = fixture(&server, "");

    fx.engine.on_message("noah", "bad").await.unwrap();
    fx.engine.save_warnings().await.unwrap();

    let raw = std::fs::read_to_string(fx.dir.path().join("warnings.json")).unwrap();
    let parsed: BTreeMap<String, u32> = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed, BTreeMap::from([("noah".to_string(), 1)]));
}

#[tokio::test]
async fn seeded_counts_continue_escalating() {
    let server = MockServer::start().await;
    flag_text(&server, "bad", 1).await;
    let fx = fixture(&server, "");
    WarningStore::new(fx.dir.path().join("warnings.json"))
        .save(&BTreeMap::from([("olga".to_string(), 2)]))
        .await
        .unwrap();

    let engine = engine_at(fx.dir.path(), Arc::new(CapturingHost::default()));
    assert_eq!(
        engine.on_message("olga", "bad").await.unwrap(),
        Some(EscalationOutcome::Consequence)
    );
}

#[tokio::test]
async fn maintenance_task_writes_on_cancel() {
    let server = MockServer::start().await;
    flag_text(&server, "bad", 1).await;
    let fx = fixture(&server, "");
    fx.engine.on_message("pat", "bad").await.unwrap();

    let cancel = CancellationToken::new();
    let task = fx.engine.spawn_maintenance(cancel.clone());
    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .unwrap()
        .unwrap();

    let saved = WarningStore::new(fx.dir.path().join("warnings.json"))
        .load()
        .unwrap();
    assert_eq!(saved.get("pat"), Some(&1));
}

#[tokio::test]
async fn maintenance_task_saves_on_its_interval() {
    let server = MockServer::start().await;
    flag_text(&server, "bad", 1).await;
    let fx = fixture(&server, "[persistence]\nautosave-secs = 1");
    fx.engine.on_message("quinn", "bad").await.unwrap();

    let cancel = CancellationToken::new();
    let task = fx.engine.spawn_maintenance(cancel.clone());

    let path = fx.dir.path().join("warnings.json");
    let mut written = false;
    for _ in 0..50 {
        if path.is_file() {
            written = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(written);
    assert!(!task.is_finished());

    let saved = WarningStore::new(&path).load().unwrap();
    assert_eq!(saved.get("quinn"), Some(&1));

    cancel.cancel();
    task.await.unwrap();
}
