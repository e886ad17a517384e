use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::audit::Audit;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttemptStatus {
    #[default]
    NotStarted,
    Started,
    Completed,
}

/// A user's participation in one quiz; unique per (user, quiz).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizAttempt {
    pub id: String,
    pub user_id: String,
    pub quiz_id: String,
    pub status: AttemptStatus,
    pub score: Option<i32>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub audit: Audit,
}

impl QuizAttempt {
    pub fn new(user_id: &str, quiz_id: &str, actor: &str, now: DateTime<Utc>) -> Self {
        QuizAttempt {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            quiz_id: quiz_id.to_string(),
            status: AttemptStatus::NotStarted,
            score: None,
            started_at: None,
            completed_at: None,
            audit: Audit::new(actor, now),
        }
    }

    pub fn start(&mut self, actor: &str, now: DateTime<Utc>) {
        self.status = AttemptStatus::Started;
        self.started_at = Some(now);
        self.audit.touch(actor, now);
    }

    pub fn complete(&mut self, actor: &str, now: DateTime<Utc>) {
        self.status = AttemptStatus::Completed;
        self.completed_at = Some(now);
        self.audit.touch(actor, now);
    }
}
