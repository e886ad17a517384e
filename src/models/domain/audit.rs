use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

/// Who created and last touched a record, and when.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Audit {
    pub created_by: String,
    pub updated_by: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_on: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_on: DateTime<Utc>,
}

impl Audit {
    pub fn new(actor: &str, now: DateTime<Utc>) -> Self {
        Audit {
            created_by: actor.to_string(),
            updated_by: actor.to_string(),
            created_on: now,
            updated_on: now,
        }
    }

    pub fn touch(&mut self, actor: &str, now: DateTime<Utc>) {
        self.updated_by = actor.to_string();
        self.updated_on = now;
    }
}

/// Records that are retired by flipping `is_active` instead of being removed.
pub trait SoftDeletable {
    fn is_active(&self) -> bool;

    fn deactivate(&mut self, actor: &str, now: DateTime<Utc>);

    fn matches_active(&self, active: Option<bool>) -> bool {
        active.map_or(true, |wanted| self.is_active() == wanted)
    }
}
