//! Client for the summarizer service.
//!
//! One interaction shape: POST the lesson form-encoded to the service root,
//! read the body as HTML text whatever the status. 2xx is a summary, any
//! other status is the service's error page; only failing to obtain a
//! response at all is an error here. No retries and no request timeout; the
//! app gates re-entrant triggers instead.

use reqwest::StatusCode;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::oneshot;

/// Outcome of one summarize round-trip. The body is opaque HTML either way.
#[derive(Debug, Clone)]
pub enum SummaryOutcome {
    /// 2xx, the summary to display
    Success { html: String },
    /// Any other status, displayed and echoed in a notification
    ServerError { status: StatusCode, html: String },
}

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("Failed to build the HTTP client: {0}")]
    Client(reqwest::Error),
    #[error("Failed to connect to the server: {0}")]
    Transport(reqwest::Error),
    #[error("Failed to connect to the server: the request task ended unexpectedly")]
    TaskGone,
}

#[derive(Debug, Clone)]
pub struct SummaryClient {
    http: reqwest::Client,
    server_url: String,
}

impl SummaryClient {
    pub fn new(server_url: impl Into<String>) -> Result<Self, SummarizeError> {
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(concat!("matome/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(SummarizeError::Client)?;

        Ok(Self {
            http,
            server_url: server_url.into(),
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Exactly one request, one response. `.form` produces the
    /// `lesson_text=<percent-encoded>` body and the urlencoded content type
    /// the service expects.
    pub async fn summarize(&self, lesson_text: &str) -> Result<SummaryOutcome, SummarizeError> {
        let response = self
            .http
            .post(&self.server_url)
            .form(&[("lesson_text", lesson_text)])
            .send()
            .await
            .map_err(SummarizeError::Transport)?;

        let status = response.status();
        let html = response.text().await.map_err(SummarizeError::Transport)?;

        Ok(classify(status, html))
    }
}

fn classify(status: StatusCode, html: String) -> SummaryOutcome {
    if status.is_success() {
        SummaryOutcome::Success { html }
    } else {
        SummaryOutcome::ServerError { status, html }
    }
}

/// An in-flight round-trip, polled from the UI tick.
pub struct SummaryTask {
    rx: oneshot::Receiver<Result<SummaryOutcome, SummarizeError>>,
    started: Instant,
}

impl SummaryTask {
    /// Run the round-trip on the runtime. Dropping the task does not cancel
    /// the request; the result is simply discarded.
    pub fn spawn(client: SummaryClient, lesson_text: String) -> Self {
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let result = client.summarize(&lesson_text).await;
            // A dropped receiver just means the app moved on
            let _ = tx.send(result);
        });
        Self {
            rx,
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Non-blocking; yields the result exactly once when the response landed.
    pub fn try_finish(&mut self) -> Option<Result<SummaryOutcome, SummarizeError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(SummarizeError::TaskGone)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_hundreds_are_summaries() {
        let outcome = classify(StatusCode::OK, "<h1>Summary</h1>".into());
        match outcome {
            SummaryOutcome::Success { html } => assert_eq!(html, "<h1>Summary</h1>"),
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn everything_else_keeps_the_body_as_an_error_page() {
        for code in [
            StatusCode::BAD_REQUEST,
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::BAD_GATEWAY,
        ] {
            let outcome = classify(code, "<p>Validation Error</p>".into());
            match outcome {
                SummaryOutcome::ServerError { status, html } => {
                    assert_eq!(status, code);
                    assert_eq!(html, "<p>Validation Error</p>");
                }
                other => panic!("expected server error, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn transport_failures_surface_with_the_local_message() {
        // Port 1 on loopback, where nothing listens
        let client = SummaryClient::new("http://127.0.0.1:1/").unwrap();
        let mut task = SummaryTask::spawn(client, "Photosynthesis basics".into());

        let mut result = None;
        for _ in 0..100 {
            if let Some(r) = task.try_finish() {
                result = Some(r);
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        let err = result
            .expect("connection to a closed port should fail promptly")
            .expect_err("no server is listening");
        assert!(err
            .to_string()
            .starts_with("Failed to connect to the server:"));
    }
}
