//! Outbound quiz-activation webhook.
//!
//! Each activation is announced with a single `POST {"quizId": ...}` to the
//! configured URL. Delivery is fire-and-forget: failures are reported to the
//! caller and never retried here.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::dto::request::QuizActivationRequest;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("webhook request failed: {0}")]
    Request(String),

    #[error("webhook timed out after {0:?}")]
    Timeout(Duration),

    #[error("webhook returned {status}: {body}")]
    Status { status: u16, body: String },
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizActivationNotifier: Send + Sync {
    async fn notify_quiz_activated(&self, quiz_id: &str) -> Result<(), NotificationError>;
}

pub struct HttpWebhookNotifier {
    http: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpWebhookNotifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, NotificationError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotificationError::Request(e.to_string()))?;

        Ok(Self {
            http,
            url: url.into(),
            timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl QuizActivationNotifier for HttpWebhookNotifier {
    async fn notify_quiz_activated(&self, quiz_id: &str) -> Result<(), NotificationError> {
        let body = QuizActivationRequest {
            quiz_id: quiz_id.to_string(),
        };

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NotificationError::Timeout(self.timeout)
                } else {
                    NotificationError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            log::debug!("Webhook accepted activation of quiz '{}'", quiz_id);
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(NotificationError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
