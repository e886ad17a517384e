use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::audit::{Audit, SoftDeletable};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub end_time: DateTime<Utc>,
    pub is_active: bool,
    /// Set by a soft delete; archived quizzes are invisible to the API and the sweep.
    #[serde(default)]
    pub archived: bool,
    /// Bumped by every persisted write; updates compare-and-set against it.
    #[serde(default)]
    pub version: i64,
    pub audit: Audit,
}

impl Quiz {
    pub fn new(
        title: &str,
        description: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        actor: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Quiz {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: description.to_string(),
            start_time,
            end_time,
            is_active: false,
            archived: false,
            version: 0,
            audit: Audit::new(actor, now),
        }
    }

    pub fn has_valid_window(&self) -> bool {
        self.start_time < self.end_time
    }

    pub fn window_contains(&self, now: DateTime<Utc>) -> bool {
        self.start_time <= now && now <= self.end_time
    }

    /// Due but not yet active: the selection rule of the activation sweep.
    pub fn is_due_inactive(&self, now: DateTime<Utc>) -> bool {
        !self.archived && !self.is_active && self.window_contains(now)
    }

    pub fn activate(&mut self, actor: &str, now: DateTime<Utc>) {
        self.is_active = true;
        self.audit.touch(actor, now);
    }
}

impl SoftDeletable for Quiz {
    fn is_active(&self) -> bool {
        self.is_active
    }

    fn deactivate(&mut self, actor: &str, now: DateTime<Utc>) {
        self.is_active = false;
        self.archived = true;
        self.audit.touch(actor, now);
    }
}

#[cfg(test)]
impl Quiz {
    pub fn test_quiz(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Quiz::new("T", "D", start_time, end_time, "tester", start_time)
    }
}
