use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Question, SoftDeletable},
        dto::{
            request::UpdateQuestionRequest,
            response::{AnswerDto, OptionDto, QuestionDto},
        },
    },
    repositories::{AnswerRepository, OptionRepository, QuestionRepository, QuizRepository},
};

pub struct QuestionService {
    repository: Arc<dyn QuestionRepository>,
    quiz_repository: Arc<dyn QuizRepository>,
    option_repository: Arc<dyn OptionRepository>,
    answer_repository: Arc<dyn AnswerRepository>,
}

impl QuestionService {
    pub fn new(
        repository: Arc<dyn QuestionRepository>,
        quiz_repository: Arc<dyn QuizRepository>,
        option_repository: Arc<dyn OptionRepository>,
        answer_repository: Arc<dyn AnswerRepository>,
    ) -> Self {
        Self {
            repository,
            quiz_repository,
            option_repository,
            answer_repository,
        }
    }

    async fn fetch(&self, id: &str, active: Option<bool>) -> AppResult<Question> {
        self.repository
            .find_by_id(id)
            .await?
            .filter(|question| question.matches_active(active))
            .ok_or_else(|| AppError::not_found("Question", id))
    }

    async fn with_options(&self, question: Question, active: bool) -> AppResult<QuestionDto> {
        let options = self
            .option_repository
            .find_by_question(&question.id, Some(active))
            .await?;
        Ok(QuestionDto::from_parts(question, options))
    }

    pub async fn list_questions(&self, active: bool) -> AppResult<Vec<QuestionDto>> {
        let questions = self.repository.find_all(Some(active)).await?;

        let mut result = Vec::with_capacity(questions.len());
        for question in questions {
            result.push(self.with_options(question, active).await?);
        }
        Ok(result)
    }

    pub async fn get_question(&self, id: &str, active: bool) -> AppResult<QuestionDto> {
        let question = self.fetch(id, Some(active)).await?;
        self.with_options(question, active).await
    }

    pub async fn update_question(
        &self,
        id: &str,
        request: UpdateQuestionRequest,
        actor: &str,
    ) -> AppResult<QuestionDto> {
        request.validate()?;
        let mut question = self.fetch(id, None).await?;

        if let Some(text) = request.text {
            question.text = text.trim().to_string();
        }
        if let Some(is_active) = request.is_active {
            // A question of an archived quiz stays inactive.
            if is_active && !question.is_active {
                self.quiz_repository
                    .find_by_id(&question.quiz_id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Quiz", &question.quiz_id))?;
            }
            question.is_active = is_active;
        }

        question.audit.touch(actor, Utc::now());
        let question = self.repository.update(question).await?;
        self.with_options(question, true).await
    }

    /// Deactivates the question and its options.
    pub async fn delete_question(&self, id: &str, actor: &str) -> AppResult<()> {
        let now = Utc::now();
        let mut question = self.fetch(id, None).await?;

        question.deactivate(actor, now);
        let question = self.repository.update(question).await?;

        let options = self
            .option_repository
            .deactivate_by_questions(std::slice::from_ref(&question.id), actor, now)
            .await?;

        log::info!(
            "Question '{}' deleted by {} ({} options deactivated)",
            id,
            actor,
            options
        );
        Ok(())
    }

    pub async fn list_options(&self, question_id: &str, active: bool) -> AppResult<Vec<OptionDto>> {
        let question = self.fetch(question_id, None).await?;
        let options = self
            .option_repository
            .find_by_question(&question.id, Some(active))
            .await?;
        Ok(options.into_iter().map(OptionDto::from).collect())
    }

    pub async fn list_answers(&self, question_id: &str, active: bool) -> AppResult<Vec<AnswerDto>> {
        let question = self.fetch(question_id, None).await?;
        let answers = self
            .answer_repository
            .find_by_question(&question.id, Some(active))
            .await?;
        Ok(answers.into_iter().map(AnswerDto::from).collect())
    }
}
