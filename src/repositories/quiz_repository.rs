use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, DateTime as BsonDateTime},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::Quiz,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz>;
    /// Archived quizzes are never returned.
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>>;
    async fn find_all(&self) -> AppResult<Vec<Quiz>>;
    /// Non-archived, inactive quizzes whose window contains `now`.
    async fn find_due_inactive(&self, now: DateTime<Utc>) -> AppResult<Vec<Quiz>>;
    /// Compare-and-set on `(id, version)`. The stored and returned record
    /// carries `version + 1`; a stale version yields `Conflict`.
    async fn update(&self, quiz: Quiz) -> AppResult<Quiz>;
}

pub struct MongoQuizRepository {
    collection: Collection<Quiz>,
}

impl MongoQuizRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("quizzes");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quizzes collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let window_index = IndexModel::builder()
            .keys(doc! { "start_time": 1, "end_time": 1, "is_active": 1 })
            .options(
                IndexOptions::builder()
                    .name("activation_window".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(window_index).await?;

        log::info!("Successfully created indexes for quizzes collection");
        Ok(())
    }
}

#[async_trait]
impl QuizRepository for MongoQuizRepository {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        self.collection.insert_one(&quiz).await?;
        Ok(quiz)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        let quiz = self
            .collection
            .find_one(doc! { "id": id, "archived": { "$ne": true } })
            .await?;
        Ok(quiz)
    }

    async fn find_all(&self) -> AppResult<Vec<Quiz>> {
        let quizzes = self
            .collection
            .find(doc! { "archived": { "$ne": true } })
            .sort(doc! { "start_time": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(quizzes)
    }

    async fn find_due_inactive(&self, now: DateTime<Utc>) -> AppResult<Vec<Quiz>> {
        let now = BsonDateTime::from_chrono(now);
        let quizzes = self
            .collection
            .find(doc! {
                "start_time": { "$lte": now },
                "end_time": { "$gte": now },
                "is_active": false,
                "archived": { "$ne": true },
            })
            .await?
            .try_collect()
            .await?;
        Ok(quizzes)
    }

    async fn update(&self, quiz: Quiz) -> AppResult<Quiz> {
        let expected = quiz.version;
        let mut next = quiz;
        next.version = expected + 1;

        let result = self
            .collection
            .replace_one(doc! { "id": &next.id, "version": expected }, &next)
            .await?;

        if result.matched_count == 0 {
            let exists = self
                .collection
                .count_documents(doc! { "id": &next.id })
                .await?
                > 0;
            return Err(if exists {
                AppError::Conflict(format!(
                    "Quiz '{}' was modified concurrently (expected version {})",
                    next.id, expected
                ))
            } else {
                AppError::not_found("Quiz", &next.id)
            });
        }

        Ok(next)
    }
}
