pub mod answer_repository;
pub mod option_repository;
pub mod question_repository;
pub mod quiz_attempt_repository;
pub mod quiz_repository;
pub mod user_repository;

use chrono::{DateTime, Utc};
use mongodb::bson::{doc, DateTime as BsonDateTime, Document};

pub use answer_repository::{AnswerRepository, MongoAnswerRepository};
pub use option_repository::{MongoOptionRepository, OptionRepository};
pub use question_repository::{MongoQuestionRepository, QuestionRepository};
pub use quiz_attempt_repository::{MongoQuizAttemptRepository, QuizAttemptRepository};
pub use quiz_repository::{MongoQuizRepository, QuizRepository};
pub use user_repository::{MongoUserRepository, UserRepository};

/// `$set` body for bulk soft deletes.
pub(crate) fn deactivation_update(actor: &str, now: DateTime<Utc>) -> Document {
    doc! {
        "$set": {
            "is_active": false,
            "audit.updated_by": actor,
            "audit.updated_on": BsonDateTime::from_chrono(now),
        }
    }
}

/// `None` leaves the `is_active` field unconstrained.
pub(crate) fn active_filter(mut filter: Document, active: Option<bool>) -> Document {
    if let Some(active) = active {
        filter.insert("is_active", active);
    }
    filter
}
