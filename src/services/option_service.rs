use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{QuestionOption, SoftDeletable},
        dto::{
            request::{CreateOptionRequest, UpdateOptionRequest},
            response::OptionDto,
        },
    },
    repositories::{OptionRepository, QuestionRepository},
};

pub struct OptionService {
    repository: Arc<dyn OptionRepository>,
    question_repository: Arc<dyn QuestionRepository>,
}

impl OptionService {
    pub fn new(
        repository: Arc<dyn OptionRepository>,
        question_repository: Arc<dyn QuestionRepository>,
    ) -> Self {
        Self {
            repository,
            question_repository,
        }
    }

    async fn fetch(&self, id: &str, active: Option<bool>) -> AppResult<QuestionOption> {
        self.repository
            .find_by_id(id)
            .await?
            .filter(|option| option.matches_active(active))
            .ok_or_else(|| AppError::not_found("Option", id))
    }

    pub async fn list_options(&self, active: bool) -> AppResult<Vec<OptionDto>> {
        let options = self.repository.find_all(Some(active)).await?;
        Ok(options.into_iter().map(OptionDto::from).collect())
    }

    pub async fn get_option(&self, id: &str, active: bool) -> AppResult<OptionDto> {
        Ok(self.fetch(id, Some(active)).await?.into())
    }

    pub async fn add_option(
        &self,
        question_id: &str,
        request: CreateOptionRequest,
        actor: &str,
    ) -> AppResult<OptionDto> {
        request.validate()?;

        let question = self
            .question_repository
            .find_by_id(question_id)
            .await?
            .filter(|question| question.is_active)
            .ok_or_else(|| AppError::not_found("Question", question_id))?;

        let option = QuestionOption::new(
            &question.id,
            request.text.trim(),
            request.is_correct,
            actor,
            Utc::now(),
        );
        let option = self.repository.create(option).await?;
        Ok(option.into())
    }

    pub async fn update_option(
        &self,
        id: &str,
        request: UpdateOptionRequest,
        actor: &str,
    ) -> AppResult<OptionDto> {
        request.validate()?;
        let mut option = self.fetch(id, None).await?;

        if let Some(text) = request.text {
            option.text = text.trim().to_string();
        }
        if let Some(is_correct) = request.is_correct {
            option.is_correct = is_correct;
        }
        if let Some(is_active) = request.is_active {
            option.is_active = is_active;
        }

        option.audit.touch(actor, Utc::now());
        let option = self.repository.update(option).await?;
        Ok(option.into())
    }

    /// Never cascades to the owning question.
    pub async fn delete_option(&self, id: &str, actor: &str) -> AppResult<()> {
        let mut option = self.fetch(id, None).await?;
        option.deactivate(actor, Utc::now());
        self.repository.update(option).await?;
        Ok(())
    }
}
