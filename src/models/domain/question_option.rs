use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::audit::{Audit, SoftDeletable};

/// One selectable choice of a question.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionOption {
    pub id: String,
    pub question_id: String,
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
    pub is_active: bool,
    pub audit: Audit,
}

impl QuestionOption {
    pub fn new(
        question_id: &str,
        text: &str,
        is_correct: bool,
        actor: &str,
        now: DateTime<Utc>,
    ) -> Self {
        QuestionOption {
            id: Uuid::new_v4().to_string(),
            question_id: question_id.to_string(),
            text: text.to_string(),
            is_correct,
            is_active: true,
            audit: Audit::new(actor, now),
        }
    }
}

impl SoftDeletable for QuestionOption {
    fn is_active(&self) -> bool {
        self.is_active
    }

    fn deactivate(&mut self, actor: &str, now: DateTime<Utc>) {
        self.is_active = false;
        self.audit.touch(actor, now);
    }
}
