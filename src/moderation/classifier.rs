use reqwest::{Client, StatusCode};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use super::message::Verdict;
use crate::error::ClassifierError;

const BODY_PREVIEW_CHARS: usize = 64;

pub type ClassifyFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Verdict, ClassifierError>> + Send + 'a>>;

/// External text-classification oracle.
pub trait Classifier: Send + Sync {
    /// Human-readable classifier name, used in logs.
    fn name(&self) -> &str;

    /// Judge `text`. Implementations may be slow or fail; the pipeline
    /// bounds every call with its own timeout.
    fn classify<'a>(&'a self, text: &'a str) -> ClassifyFuture<'a>;
}

/// Oracle reached over HTTP: `GET <endpoint>?text=<url-encoded>` answering
/// a plaintext `true` / `false` body with status 200.
pub struct HttpClassifier {
    endpoint: String,
    timeout: Duration,
    client: Client,
}

impl HttpClassifier {
    pub fn new(endpoint: &str, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.trim().to_string(),
            timeout,
            client: Client::builder()
                .timeout(timeout)
                .connect_timeout(timeout.min(Duration::from_secs(10)))
                .pool_max_idle_per_host(10)
                .pool_idle_timeout(Duration::from_secs(90))
                .tcp_keepalive(Duration::from_secs(60))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn call_oracle(&self, text: &str) -> Result<Verdict, ClassifierError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("text", text)])
            .send()
            .await
            .map_err(|e| self.map_transport_error(&e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ClassifierError::OracleUnavailable(format!(
                "unexpected status {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(&e))?;
        parse_verdict(&body)
    }

    fn map_transport_error(&self, error: &reqwest::Error) -> ClassifierError {
        if error.is_timeout() {
            ClassifierError::OracleTimeout(self.timeout)
        } else {
            ClassifierError::OracleUnavailable(error.to_string())
        }
    }
}

impl Classifier for HttpClassifier {
    fn name(&self) -> &str {
        "http"
    }

    fn classify<'a>(&'a self, text: &'a str) -> ClassifyFuture<'a> {
        Box::pin(self.call_oracle(text))
    }
}

/// Parse the oracle's plaintext body.
pub fn parse_verdict(body: &str) -> Result<Verdict, ClassifierError> {
    let trimmed = body.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Ok(Verdict::Violates)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Ok(Verdict::Clean)
    } else {
        Err(ClassifierError::OracleMalformedResponse(body_preview(trimmed)))
    }
}

fn body_preview(body: &str) -> String {
    match body.char_indices().nth(BODY_PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", body[..idx].trim_end()),
        None => body.to_string(),
    }
}
