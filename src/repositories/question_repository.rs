use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::Question,
    repositories::{active_filter, deactivation_update},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn create(&self, question: Question) -> AppResult<Question>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Question>>;
    async fn find_all(&self, active: Option<bool>) -> AppResult<Vec<Question>>;
    async fn find_by_quiz(&self, quiz_id: &str, active: Option<bool>) -> AppResult<Vec<Question>>;
    async fn update(&self, question: Question) -> AppResult<Question>;
    /// Soft-deletes every question of a quiz and returns the affected ids.
    async fn deactivate_by_quiz(
        &self,
        quiz_id: &str,
        actor: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<String>>;
}

pub struct MongoQuestionRepository {
    collection: Collection<Question>,
}

impl MongoQuestionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("questions");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for questions collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let quiz_index = IndexModel::builder()
            .keys(doc! { "quiz_id": 1, "is_active": 1 })
            .options(IndexOptions::builder().name("quiz_id".to_string()).build())
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(quiz_index).await?;

        log::info!("Successfully created indexes for questions collection");
        Ok(())
    }
}

#[async_trait]
impl QuestionRepository for MongoQuestionRepository {
    async fn create(&self, question: Question) -> AppResult<Question> {
        self.collection.insert_one(&question).await?;
        Ok(question)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Question>> {
        let question = self.collection.find_one(doc! { "id": id }).await?;
        Ok(question)
    }

    async fn find_all(&self, active: Option<bool>) -> AppResult<Vec<Question>> {
        let questions = self
            .collection
            .find(active_filter(doc! {}, active))
            .await?
            .try_collect()
            .await?;
        Ok(questions)
    }

    async fn find_by_quiz(&self, quiz_id: &str, active: Option<bool>) -> AppResult<Vec<Question>> {
        let questions = self
            .collection
            .find(active_filter(doc! { "quiz_id": quiz_id }, active))
            .sort(doc! { "audit.created_on": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(questions)
    }

    async fn update(&self, question: Question) -> AppResult<Question> {
        let result = self
            .collection
            .replace_one(doc! { "id": &question.id }, &question)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::not_found("Question", &question.id));
        }

        Ok(question)
    }

    async fn deactivate_by_quiz(
        &self,
        quiz_id: &str,
        actor: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<String>> {
        let ids: Vec<String> = self
            .collection
            .find(doc! { "quiz_id": quiz_id })
            .await?
            .map_ok(|question| question.id)
            .try_collect()
            .await?;

        if !ids.is_empty() {
            self.collection
                .update_many(doc! { "quiz_id": quiz_id }, deactivation_update(actor, now))
                .await?;
        }

        Ok(ids)
    }
}
