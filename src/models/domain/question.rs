use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::audit::{Audit, SoftDeletable};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub quiz_id: String,
    pub text: String,
    pub is_active: bool,
    pub audit: Audit,
}

impl Question {
    pub fn new(quiz_id: &str, text: &str, actor: &str, now: DateTime<Utc>) -> Self {
        Question {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz_id.to_string(),
            text: text.to_string(),
            is_active: true,
            audit: Audit::new(actor, now),
        }
    }
}

impl SoftDeletable for Question {
    fn is_active(&self) -> bool {
        self.is_active
    }

    fn deactivate(&mut self, actor: &str, now: DateTime<Utc>) {
        self.is_active = false;
        self.audit.touch(actor, now);
    }
}
