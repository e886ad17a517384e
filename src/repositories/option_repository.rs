use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::QuestionOption,
    repositories::{active_filter, deactivation_update},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OptionRepository: Send + Sync {
    async fn create(&self, option: QuestionOption) -> AppResult<QuestionOption>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuestionOption>>;
    async fn find_all(&self, active: Option<bool>) -> AppResult<Vec<QuestionOption>>;
    async fn find_by_question(
        &self,
        question_id: &str,
        active: Option<bool>,
    ) -> AppResult<Vec<QuestionOption>>;
    async fn update(&self, option: QuestionOption) -> AppResult<QuestionOption>;
    /// Soft-deletes every option belonging to any of `question_ids`.
    async fn deactivate_by_questions(
        &self,
        question_ids: &[String],
        actor: &str,
        now: DateTime<Utc>,
    ) -> AppResult<u64>;
}

pub struct MongoOptionRepository {
    collection: Collection<QuestionOption>,
}

impl MongoOptionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("options");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for options collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let question_index = IndexModel::builder()
            .keys(doc! { "question_id": 1 })
            .options(IndexOptions::builder().name("question_id".to_string()).build())
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(question_index).await?;

        log::info!("Successfully created indexes for options collection");
        Ok(())
    }
}

#[async_trait]
impl OptionRepository for MongoOptionRepository {
    async fn create(&self, option: QuestionOption) -> AppResult<QuestionOption> {
        self.collection.insert_one(&option).await?;
        Ok(option)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuestionOption>> {
        let option = self.collection.find_one(doc! { "id": id }).await?;
        Ok(option)
    }

    async fn find_all(&self, active: Option<bool>) -> AppResult<Vec<QuestionOption>> {
        let options = self
            .collection
            .find(active_filter(doc! {}, active))
            .await?
            .try_collect()
            .await?;
        Ok(options)
    }

    async fn find_by_question(
        &self,
        question_id: &str,
        active: Option<bool>,
    ) -> AppResult<Vec<QuestionOption>> {
        let options = self
            .collection
            .find(active_filter(doc! { "question_id": question_id }, active))
            .sort(doc! { "audit.created_on": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(options)
    }

    async fn update(&self, option: QuestionOption) -> AppResult<QuestionOption> {
        let result = self
            .collection
            .replace_one(doc! { "id": &option.id }, &option)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::not_found("Option", &option.id));
        }

        Ok(option)
    }

    async fn deactivate_by_questions(
        &self,
        question_ids: &[String],
        actor: &str,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        if question_ids.is_empty() {
            return Ok(0);
        }

        let result = self
            .collection
            .update_many(
                doc! { "question_id": { "$in": question_ids.to_vec() } },
                deactivation_update(actor, now),
            )
            .await?;
        Ok(result.modified_count)
    }
}
