use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::audit::{Audit, SoftDeletable};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Answer {
    pub id: String,
    pub user_id: String,
    pub question_id: String,
    // Copied from the question at submission so answers can be listed per quiz.
    pub quiz_id: String,
    pub selected_answer: String,
    pub selected_option_id: Option<String>,
    pub is_correct: Option<bool>,
    pub is_active: bool,
    pub audit: Audit,
}

impl Answer {
    pub fn new(
        user_id: &str,
        question_id: &str,
        quiz_id: &str,
        selected_answer: &str,
        actor: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Answer {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            question_id: question_id.to_string(),
            quiz_id: quiz_id.to_string(),
            selected_answer: selected_answer.to_string(),
            selected_option_id: None,
            is_correct: None,
            is_active: true,
            audit: Audit::new(actor, now),
        }
    }

    pub fn with_selected_option(mut self, option_id: &str, is_correct: bool) -> Self {
        self.selected_option_id = Some(option_id.to_string());
        self.is_correct = Some(is_correct);
        self
    }
}

impl SoftDeletable for Answer {
    fn is_active(&self) -> bool {
        self.is_active
    }

    fn deactivate(&mut self, actor: &str, now: DateTime<Utc>) {
        self.is_active = false;
        self.audit.touch(actor, now);
    }
}
