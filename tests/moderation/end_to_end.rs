use wiremock::MockServer;

use newlife::moderation::EscalationOutcome;

use super::moderation_harness::{HostEvent, clean_by_default, fixture, flag_text};

#[tokio::test]
async fn repeat_offender_is_warned_then_removed() {
    let server = MockServer::start().await;
    // "bad1" is asked once; the second occurrence is served from the cache.
    flag_text(&server, "bad1", 1).await;
    flag_text(&server, "bad2", 1).await;
    clean_by_default(&server).await;
    let fx = fixture(&server, "max-warnings = 3");

    let first = fx.engine.on_message("steve", "bad1").await.unwrap();
    let second = fx.engine.on_message("steve", "bad1").await.unwrap();
    let third = fx.engine.on_message("steve", "bad2").await.unwrap();

    assert_eq!(first, Some(EscalationOutcome::Warn { current: 1, max: 3 }));
    assert_eq!(second, Some(EscalationOutcome::Warn { current: 2, max: 3 }));
    assert_eq!(third, Some(EscalationOutcome::Consequence));

    let log = fx.violation_log();
    assert_eq!(log.lines().count(), 3);
    assert!(log.contains("VIOLATION - steve: bad2"));

    let events = fx.host.events();
    assert!(events.contains(&HostEvent::Warned(
        "steve".into(),
        "[NewLife] Please keep the chat friendly. Warning 2/3.".into()
    )));
    assert!(events.contains(&HostEvent::Broadcast(
        "[NewLife] steve was removed for inappropriate language.".into()
    )));
    server.verify().await;
}

#[tokio::test]
async fn clean_chat_reaches_nobody() {
    let server = MockServer::start().await;
    clean_by_default(&server).await;
    let fx = fixture(&server, "");

    assert_eq!(fx.engine.on_message("alex", "good morning").await.unwrap(), None);
    assert!(fx.host.events().is_empty());
    assert!(fx.violation_log().is_empty());
}

#[tokio::test]
async fn consequence_repeats_after_escalation() {
    let server = MockServer::start().await;
    flag_text(&server, "bad", 1).await;
    let fx = fixture(&server, "max-warnings = 1");

    for _ in 0..3 {
        assert_eq!(
            fx.engine.on_message("sam", "bad").await.unwrap(),
            Some(EscalationOutcome::Consequence)
        );
    }
    let removals = fx
        .host
        .events()
        .into_iter()
        .filter(|event| matches!(event, HostEvent::Removed(..)))
        .count();
    assert_eq!(removals, 3);
    assert_eq!(fx.engine.warnings_for("sam"), 3);
}

#[tokio::test]
async fn throttled_duplicate_is_treated_as_clean() {
    let server = MockServer::start().await;
    flag_text(&server, "spam", 1).await;
    let fx = fixture(&server, "check-interval = 60000");

    let first = fx.engine.on_message("kim", "spam");
    let second = fx.engine.on_message("lee", "SPAM");

    assert_eq!(second.await.unwrap(), None);
    assert_eq!(
        first.await.unwrap(),
        Some(EscalationOutcome::Warn { current: 1, max: 3 })
    );
    assert_eq!(fx.engine.warnings_for("lee"), 0);
}

#[tokio::test]
async fn concurrent_violations_from_one_actor_all_count() {
    let server = MockServer::start().await;
    flag_text(&server, "bad", 1).await;
    let fx = fixture(&server, "max-warnings = 100");
    fx.engine.on_message("zed", "bad").await.unwrap();

    let handles: Vec<_> = (0..20).map(|_| fx.engine.on_message("zed", "bad")).collect();
    let mut currents = Vec::new();
    for handle in handles {
        match handle.await.unwrap() {
            Some(EscalationOutcome::Warn { current, .. }) => currents.push(current),
            other => panic!("expected a warning, got {other:?}"),
        }
    }

    currents.sort_unstable();
    assert_eq!(currents, (2..=21).collect::<Vec<u32>>());
    assert_eq!(fx.engine.warnings_for("zed"), 21);
}
