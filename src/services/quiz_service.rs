use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Question, QuestionOption, Quiz, SoftDeletable},
        dto::{
            request::{CreateQuestionRequest, CreateQuizRequest, UpdateQuizRequest},
            response::{QuestionDto, QuizDto},
        },
    },
    repositories::{OptionRepository, QuestionRepository, QuizRepository},
};

pub struct QuizService {
    repository: Arc<dyn QuizRepository>,
    question_repository: Arc<dyn QuestionRepository>,
    option_repository: Arc<dyn OptionRepository>,
}

impl QuizService {
    pub fn new(
        repository: Arc<dyn QuizRepository>,
        question_repository: Arc<dyn QuestionRepository>,
        option_repository: Arc<dyn OptionRepository>,
    ) -> Self {
        Self {
            repository,
            question_repository,
            option_repository,
        }
    }

    async fn fetch(&self, id: &str) -> AppResult<Quiz> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Quiz", id))
    }

    pub async fn list_quizzes(&self) -> AppResult<Vec<QuizDto>> {
        let quizzes = self.repository.find_all().await?;
        Ok(quizzes.into_iter().map(QuizDto::from).collect())
    }

    pub async fn get_quiz(&self, id: &str) -> AppResult<QuizDto> {
        Ok(self.fetch(id).await?.into())
    }

    pub async fn create_quiz(&self, request: CreateQuizRequest, actor: &str) -> AppResult<QuizDto> {
        request.validate()?;

        let (start_time, end_time) = match (request.start_time, request.end_time) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                return Err(AppError::ValidationError(
                    "startTime and endTime are required".to_string(),
                ))
            }
        };

        if request.is_active == Some(true) {
            log::debug!("Ignoring isActive on quiz creation; quizzes start inactive");
        }

        let quiz = Quiz::new(
            request.title.trim(),
            request.description.trim(),
            start_time,
            end_time,
            actor,
            Utc::now(),
        );
        let quiz = self.repository.create(quiz).await?;

        log::info!("Quiz '{}' created by {}", quiz.id, actor);
        Ok(quiz.into())
    }

    pub async fn update_quiz(
        &self,
        id: &str,
        request: UpdateQuizRequest,
        actor: &str,
    ) -> AppResult<QuizDto> {
        request.validate()?;

        let mut quiz = self.fetch(id).await?;

        if let Some(title) = request.title {
            quiz.title = title.trim().to_string();
        }
        if let Some(description) = request.description {
            quiz.description = description.trim().to_string();
        }
        if let Some(start_time) = request.start_time {
            quiz.start_time = start_time;
        }
        if let Some(end_time) = request.end_time {
            quiz.end_time = end_time;
        }
        if let Some(is_active) = request.is_active {
            quiz.is_active = is_active;
        }

        if !quiz.has_valid_window() {
            return Err(AppError::ValidationError(
                "startTime must be before endTime".to_string(),
            ));
        }

        quiz.audit.touch(actor, Utc::now());
        let quiz = self.repository.update(quiz).await?;
        Ok(quiz.into())
    }

    /// Archives the quiz and deactivates its questions and their options.
    pub async fn delete_quiz(&self, id: &str, actor: &str) -> AppResult<()> {
        let now = Utc::now();
        let mut quiz = self.fetch(id).await?;

        quiz.deactivate(actor, now);
        self.repository.update(quiz).await?;

        let question_ids = self
            .question_repository
            .deactivate_by_quiz(id, actor, now)
            .await?;
        let options = self
            .option_repository
            .deactivate_by_questions(&question_ids, actor, now)
            .await?;

        log::info!(
            "Quiz '{}' deleted by {} ({} questions, {} options deactivated)",
            id,
            actor,
            question_ids.len(),
            options
        );
        Ok(())
    }

    pub async fn add_question(
        &self,
        quiz_id: &str,
        request: CreateQuestionRequest,
        actor: &str,
    ) -> AppResult<QuestionDto> {
        request.validate()?;
        let quiz = self.fetch(quiz_id).await?;

        let now = Utc::now();
        let question = self
            .question_repository
            .create(Question::new(&quiz.id, request.text.trim(), actor, now))
            .await?;

        let mut options = Vec::with_capacity(request.options.len());
        for option in request.options {
            let option = QuestionOption::new(
                &question.id,
                option.text.trim(),
                option.is_correct,
                actor,
                now,
            );
            options.push(self.option_repository.create(option).await?);
        }

        Ok(QuestionDto::from_parts(question, options))
    }

    pub async fn list_questions(&self, quiz_id: &str, active: bool) -> AppResult<Vec<QuestionDto>> {
        let quiz = self.fetch(quiz_id).await?;

        let questions = self
            .question_repository
            .find_by_quiz(&quiz.id, Some(active))
            .await?;

        let mut result = Vec::with_capacity(questions.len());
        for question in questions {
            let options = self
                .option_repository
                .find_by_question(&question.id, Some(active))
                .await?;
            result.push(QuestionDto::from_parts(question, options));
        }
        Ok(result)
    }

    /// Forces `is_active = true`. Retries once when a concurrent writer bumped
    /// the version in between, since the outcome does not depend on the
    /// record's previous state.
    pub async fn activate_quiz(&self, id: &str, actor: &str) -> AppResult<QuizDto> {
        match self.try_activate(id, actor).await {
            Err(AppError::Conflict(reason)) => {
                log::debug!("Retrying activation of quiz '{}': {}", id, reason);
                self.try_activate(id, actor).await
            }
            result => result,
        }
    }

    async fn try_activate(&self, id: &str, actor: &str) -> AppResult<QuizDto> {
        let mut quiz = self.fetch(id).await?;
        if quiz.is_active {
            return Ok(quiz.into());
        }

        quiz.activate(actor, Utc::now());
        let quiz = self.repository.update(quiz).await?;

        log::info!("Quiz '{}' activated by {}", quiz.id, actor);
        Ok(quiz.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::dto::request::CreateOptionRequest,
        repositories::{
            option_repository::MockOptionRepository, question_repository::MockQuestionRepository,
            quiz_repository::MockQuizRepository,
        },
        test_utils::fixtures::active_quiz,
    };
    use chrono::Duration;

    fn service(
        quizzes: MockQuizRepository,
        questions: MockQuestionRepository,
        options: MockOptionRepository,
    ) -> QuizService {
        QuizService::new(Arc::new(quizzes), Arc::new(questions), Arc::new(options))
    }

    fn stored_quiz() -> Quiz {
        let t0 = Utc::now();
        Quiz::test_quiz(t0, t0 + Duration::minutes(30))
    }

    #[tokio::test]
    async fn test_create_quiz_ignores_requested_active_flag() {
        let mut quizzes = MockQuizRepository::new();
        quizzes
            .expect_create()
            .withf(|quiz| !quiz.is_active && quiz.version == 0 && quiz.audit.created_by == "alice")
            .times(1)
            .returning(|quiz| Ok(quiz));

        let service = service(quizzes, MockQuestionRepository::new(), MockOptionRepository::new());
        let t0 = Utc::now();
        let request = CreateQuizRequest {
            title: "Geography".to_string(),
            description: "Capitals".to_string(),
            start_time: Some(t0),
            end_time: Some(t0 + Duration::minutes(30)),
            is_active: Some(true),
        };

        let quiz = service.create_quiz(request, "alice").await.unwrap();
        assert!(!quiz.is_active);
    }

    #[tokio::test]
    async fn test_create_quiz_rejects_inverted_window_without_persisting() {
        let mut quizzes = MockQuizRepository::new();
        quizzes.expect_create().times(0);

        let service = service(quizzes, MockQuestionRepository::new(), MockOptionRepository::new());
        let t0 = Utc::now();
        let request = CreateQuizRequest {
            title: "T".to_string(),
            description: "D".to_string(),
            start_time: Some(t0),
            end_time: Some(t0 - Duration::minutes(1)),
            is_active: None,
        };

        let result = service.create_quiz(request, "alice").await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_update_rechecks_merged_window() {
        let quiz = stored_quiz();
        let start = quiz.start_time;

        let mut quizzes = MockQuizRepository::new();
        quizzes
            .expect_find_by_id()
            .returning(move |_| Ok(Some(quiz.clone())));
        quizzes.expect_update().times(0);

        let service = service(quizzes, MockQuestionRepository::new(), MockOptionRepository::new());
        let request = UpdateQuizRequest {
            end_time: Some(start - Duration::minutes(5)),
            ..Default::default()
        };

        let result = service.update_quiz("any", request, "alice").await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_update_missing_quiz_is_not_found() {
        let mut quizzes = MockQuizRepository::new();
        quizzes.expect_find_by_id().returning(|_| Ok(None));

        let service = service(quizzes, MockQuestionRepository::new(), MockOptionRepository::new());
        let result = service
            .update_quiz("missing", UpdateQuizRequest::default(), "alice")
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_cascades_to_questions_and_options() {
        let quiz = stored_quiz();
        let quiz_id = quiz.id.clone();

        let mut quizzes = MockQuizRepository::new();
        quizzes
            .expect_find_by_id()
            .returning(move |_| Ok(Some(quiz.clone())));
        quizzes
            .expect_update()
            .withf(|quiz| quiz.archived && !quiz.is_active && quiz.audit.updated_by == "admin")
            .times(1)
            .returning(|quiz| Ok(quiz));

        let mut questions = MockQuestionRepository::new();
        questions
            .expect_deactivate_by_quiz()
            .withf(move |id, actor, _| id == quiz_id && actor == "admin")
            .times(1)
            .returning(|_, _, _| Ok(vec!["q1".to_string(), "q2".to_string()]));

        let mut options = MockOptionRepository::new();
        options
            .expect_deactivate_by_questions()
            .withf(|ids, _, _| ids.len() == 2)
            .times(1)
            .returning(|_, _, _| Ok(4));

        let service = service(quizzes, questions, options);
        service.delete_quiz("any", "admin").await.unwrap();
    }

    #[tokio::test]
    async fn test_add_question_to_missing_quiz_is_not_found() {
        let mut quizzes = MockQuizRepository::new();
        quizzes.expect_find_by_id().returning(|_| Ok(None));
        let mut questions = MockQuestionRepository::new();
        questions.expect_create().times(0);

        let service = service(quizzes, questions, MockOptionRepository::new());
        let request = CreateQuestionRequest {
            text: "Capital of France?".to_string(),
            options: vec![CreateOptionRequest {
                text: "Paris".to_string(),
                is_correct: true,
            }],
        };

        let result = service.add_question("missing", request, "alice").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_activate_retries_once_on_conflict() {
        let quiz = stored_quiz();

        let mut quizzes = MockQuizRepository::new();
        quizzes
            .expect_find_by_id()
            .times(2)
            .returning(move |_| Ok(Some(quiz.clone())));

        let mut seq = mockall::Sequence::new();
        quizzes
            .expect_update()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(AppError::Conflict("stale".to_string())));
        quizzes
            .expect_update()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|mut quiz| {
                quiz.version += 1;
                Ok(quiz)
            });

        let service = service(quizzes, MockQuestionRepository::new(), MockOptionRepository::new());
        let quiz = service.activate_quiz("any", "webhook").await.unwrap();

        assert!(quiz.is_active);
        assert_eq!(quiz.audit.updated_by, "webhook");
    }

    #[tokio::test]
    async fn test_activate_is_idempotent_for_active_quiz() {
        let quiz = active_quiz();

        let mut quizzes = MockQuizRepository::new();
        quizzes
            .expect_find_by_id()
            .returning(move |_| Ok(Some(quiz.clone())));
        quizzes.expect_update().times(0);

        let service = service(quizzes, MockQuestionRepository::new(), MockOptionRepository::new());
        let quiz = service.activate_quiz("any", "webhook").await.unwrap();

        assert!(quiz.is_active);
        assert_eq!(quiz.audit.updated_by, "SCHEDULER");
    }
}
