use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::Answer,
    repositories::active_filter,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnswerRepository: Send + Sync {
    async fn create(&self, answer: Answer) -> AppResult<Answer>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Answer>>;
    async fn find_all(&self, active: Option<bool>) -> AppResult<Vec<Answer>>;
    async fn find_by_question(
        &self,
        question_id: &str,
        active: Option<bool>,
    ) -> AppResult<Vec<Answer>>;
    async fn find_active_by_user_and_question(
        &self,
        user_id: &str,
        question_id: &str,
    ) -> AppResult<Option<Answer>>;
    async fn find_by_user_and_quiz(
        &self,
        user_id: &str,
        quiz_id: &str,
        active: Option<bool>,
    ) -> AppResult<Vec<Answer>>;
    async fn update(&self, answer: Answer) -> AppResult<Answer>;
}

pub struct MongoAnswerRepository {
    collection: Collection<Answer>,
}

impl MongoAnswerRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("answers");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for answers collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let user_question_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "question_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .partial_filter_expression(doc! { "is_active": true })
                    .name("user_question_active_unique".to_string())
                    .build(),
            )
            .build();

        let user_quiz_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "quiz_id": 1 })
            .options(IndexOptions::builder().name("user_quiz".to_string()).build())
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(user_question_index).await?;
        self.collection.create_index(user_quiz_index).await?;

        log::info!("Successfully created indexes for answers collection");
        Ok(())
    }
}

#[async_trait]
impl AnswerRepository for MongoAnswerRepository {
    async fn create(&self, answer: Answer) -> AppResult<Answer> {
        self.collection.insert_one(&answer).await?;
        Ok(answer)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Answer>> {
        let answer = self.collection.find_one(doc! { "id": id }).await?;
        Ok(answer)
    }

    async fn find_all(&self, active: Option<bool>) -> AppResult<Vec<Answer>> {
        let answers = self
            .collection
            .find(active_filter(doc! {}, active))
            .await?
            .try_collect()
            .await?;
        Ok(answers)
    }

    async fn find_by_question(
        &self,
        question_id: &str,
        active: Option<bool>,
    ) -> AppResult<Vec<Answer>> {
        let answers = self
            .collection
            .find(active_filter(doc! { "question_id": question_id }, active))
            .await?
            .try_collect()
            .await?;
        Ok(answers)
    }

    async fn find_active_by_user_and_question(
        &self,
        user_id: &str,
        question_id: &str,
    ) -> AppResult<Option<Answer>> {
        let answer = self
            .collection
            .find_one(doc! {
                "user_id": user_id,
                "question_id": question_id,
                "is_active": true,
            })
            .await?;
        Ok(answer)
    }

    async fn find_by_user_and_quiz(
        &self,
        user_id: &str,
        quiz_id: &str,
        active: Option<bool>,
    ) -> AppResult<Vec<Answer>> {
        let answers = self
            .collection
            .find(active_filter(
                doc! { "user_id": user_id, "quiz_id": quiz_id },
                active,
            ))
            .await?
            .try_collect()
            .await?;
        Ok(answers)
    }

    async fn update(&self, answer: Answer) -> AppResult<Answer> {
        let result = self
            .collection
            .replace_one(doc! { "id": &answer.id }, &answer)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::not_found("Answer", &answer.id));
        }

        Ok(answer)
    }
}
