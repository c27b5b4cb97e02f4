#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;
use tokio::runtime::Handle;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use newlife::config::{Config, ConfigHandle};
use newlife::moderation::{ConsequencePlan, HostFuture, ModerationEngine, ModerationHost};

pub const ORACLE_PATH: &str = "/service/containsprofanity";

#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Suppressed(String),
    Warned(String, String),
    Removed(String, ConsequencePlan),
    Broadcast(String),
}

#[derive(Default)]
pub struct CapturingHost {
    events: Mutex<Vec<HostEvent>>,
}

impl CapturingHost {
    pub fn events(&self) -> Vec<HostEvent> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: HostEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl ModerationHost for CapturingHost {
    fn suppress<'a>(&'a self, actor_id: &'a str, _message_id: Uuid) -> HostFuture<'a> {
        Box::pin(async move {
            self.push(HostEvent::Suppressed(actor_id.to_string()));
            Ok(())
        })
    }

    fn warn<'a>(&'a self, actor_id: &'a str, text: &'a str) -> HostFuture<'a> {
        Box::pin(async move {
            self.push(HostEvent::Warned(actor_id.to_string(), text.to_string()));
            Ok(())
        })
    }

    fn apply_consequence<'a>(
        &'a self,
        actor_id: &'a str,
        plan: &'a ConsequencePlan,
    ) -> HostFuture<'a> {
        Box::pin(async move {
            self.push(HostEvent::Removed(actor_id.to_string(), plan.clone()));
            Ok(())
        })
    }

    fn broadcast<'a>(&'a self, text: &'a str) -> HostFuture<'a> {
        Box::pin(async move {
            self.push(HostEvent::Broadcast(text.to_string()));
            Ok(())
        })
    }
}

/// Host whose every callback fails.
pub struct BrokenHost;

impl ModerationHost for BrokenHost {
    fn warn<'a>(&'a self, _actor_id: &'a str, _text: &'a str) -> HostFuture<'a> {
        Box::pin(async move { anyhow::bail!("player offline") })
    }

    fn apply_consequence<'a>(
        &'a self,
        _actor_id: &'a str,
        _plan: &'a ConsequencePlan,
    ) -> HostFuture<'a> {
        Box::pin(async move { anyhow::bail!("player offline") })
    }

    fn broadcast<'a>(&'a self, _text: &'a str) -> HostFuture<'a> {
        Box::pin(async move { anyhow::bail!("chat closed") })
    }
}

/// Mount an oracle answering `true` for `text` exactly `calls` times.
pub async fn flag_text(server: &MockServer, text: &str, calls: u64) {
    Mock::given(method("GET"))
        .and(path(ORACLE_PATH))
        .and(query_param("text", text))
        .respond_with(ResponseTemplate::new(200).set_body_string("true"))
        .expect(calls)
        .mount(server)
        .await;
}

/// Fallback: everything not flagged is clean.
pub async fn clean_by_default(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(ORACLE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("false"))
        .with_priority(u8::MAX)
        .mount(server)
        .await;
}

pub struct ModerationFixture {
    pub dir: TempDir,
    pub host: Arc<CapturingHost>,
    pub engine: Arc<ModerationEngine>,
}

impl ModerationFixture {
    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    pub fn violation_log(&self) -> String {
        std::fs::read_to_string(self.dir.path().join("violations.log")).unwrap_or_default()
    }

    pub fn rewrite_config(&self, server: &MockServer, extra: &str) {
        write_config(self.dir.path(), server, extra);
    }
}

pub fn write_config(dir: &Path, server: &MockServer, extra: &str) -> PathBuf {
    let path = dir.join("config.toml");
    // Throttling is off unless a test asks for a window.
    let interval = if extra.contains("check-interval") {
        ""
    } else {
        "check-interval = 0\n"
    };
    let contents = format!(
        "{interval}{extra}\n[api]\nendpoint = \"{}{ORACLE_PATH}\"\ntimeout = 2000\n",
        server.uri()
    );
    std::fs::write(&path, contents).unwrap();
    path
}

pub fn engine_at(dir: &Path, host: Arc<dyn ModerationHost>) -> Arc<ModerationEngine> {
    let config = Config::load_from_path(&dir.join("config.toml")).unwrap();
    Arc::new(ModerationEngine::new(ConfigHandle::new(config), host, Handle::current()).unwrap())
}

pub fn fixture(server: &MockServer, extra: &str) -> ModerationFixture {
    let dir = TempDir::new().unwrap();
    write_config(dir.path(), server, extra);
    let host = Arc::new(CapturingHost::default());
    let engine = engine_at(dir.path(), host.clone());
    ModerationFixture { dir, host, engine }
}
