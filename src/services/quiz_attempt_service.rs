use std::{collections::HashSet, sync::Arc};

use chrono::Utc;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{AttemptStatus, Quiz, QuizAttempt, User},
        dto::response::AttemptStatusDto,
    },
    repositories::{AnswerRepository, QuestionRepository, QuizAttemptRepository, QuizRepository, UserRepository},
};

pub struct QuizAttemptService {
    repository: Arc<dyn QuizAttemptRepository>,
    quiz_repository: Arc<dyn QuizRepository>,
    user_repository: Arc<dyn UserRepository>,
    question_repository: Arc<dyn QuestionRepository>,
    answer_repository: Arc<dyn AnswerRepository>,
}

impl QuizAttemptService {
    pub fn new(
        repository: Arc<dyn QuizAttemptRepository>,
        quiz_repository: Arc<dyn QuizRepository>,
        user_repository: Arc<dyn UserRepository>,
        question_repository: Arc<dyn QuestionRepository>,
        answer_repository: Arc<dyn AnswerRepository>,
    ) -> Self {
        Self {
            repository,
            quiz_repository,
            user_repository,
            question_repository,
            answer_repository,
        }
    }

    async fn resolve(&self, quiz_id: &str, user_id: &str) -> AppResult<(Quiz, User)> {
        let quiz = self
            .quiz_repository
            .find_by_id(quiz_id)
            .await?
            .ok_or_else(|| AppError::not_found("Quiz", quiz_id))?;
        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .filter(|user| user.is_active)
            .ok_or_else(|| AppError::not_found("User", user_id))?;
        Ok((quiz, user))
    }

    /// Answered active questions over active questions, as a whole percentage.
    async fn progress(&self, quiz_id: &str, user_id: &str) -> AppResult<u8> {
        let questions = self
            .question_repository
            .find_by_quiz(quiz_id, Some(true))
            .await?;
        if questions.is_empty() {
            return Ok(0);
        }

        let answered: HashSet<String> = self
            .answer_repository
            .find_by_user_and_quiz(user_id, quiz_id, Some(true))
            .await?
            .into_iter()
            .map(|answer| answer.question_id)
            .collect();

        let done = questions
            .iter()
            .filter(|question| answered.contains(&question.id))
            .count();
        Ok((done * 100 / questions.len()) as u8)
    }

    pub async fn start_attempt(
        &self,
        quiz_id: &str,
        user_id: &str,
        actor: &str,
    ) -> AppResult<AttemptStatusDto> {
        let (quiz, user) = self.resolve(quiz_id, user_id).await?;

        if !quiz.is_active {
            return Err(AppError::ValidationError(format!(
                "Quiz '{}' is not active",
                quiz.id
            )));
        }

        let now = Utc::now();
        let attempt = match self
            .repository
            .find_by_user_and_quiz(&user.id, &quiz.id)
            .await?
        {
            Some(existing) if existing.status != AttemptStatus::NotStarted => {
                return Err(AppError::Conflict(format!(
                    "User '{}' has already started quiz '{}'",
                    user.id, quiz.id
                )));
            }
            Some(mut pending) => {
                pending.start(actor, now);
                self.repository.update(pending).await?
            }
            None => {
                let mut attempt = QuizAttempt::new(&user.id, &quiz.id, actor, now);
                attempt.start(actor, now);
                self.repository.create(attempt).await?
            }
        };

        log::info!("User '{}' started quiz '{}'", user.id, quiz.id);
        Ok(AttemptStatusDto::from_attempt(attempt, 0))
    }

    pub async fn complete_attempt(
        &self,
        quiz_id: &str,
        user_id: &str,
        actor: &str,
    ) -> AppResult<AttemptStatusDto> {
        let (quiz, user) = self.resolve(quiz_id, user_id).await?;

        let mut attempt = self
            .repository
            .find_by_user_and_quiz(&user.id, &quiz.id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "No attempt of quiz '{}' by user '{}'",
                    quiz.id, user.id
                ))
            })?;

        if attempt.status != AttemptStatus::Started {
            return Err(AppError::ValidationError(format!(
                "Attempt of quiz '{}' is not in progress",
                quiz.id
            )));
        }

        attempt.complete(actor, Utc::now());
        let attempt = self.repository.update(attempt).await?;
        let progress = self.progress(&quiz.id, &user.id).await?;
        Ok(AttemptStatusDto::from_attempt(attempt, progress))
    }

    /// A user who never started the quiz gets a NOT_STARTED status rather than NotFound.
    pub async fn attempt_status(&self, quiz_id: &str, user_id: &str) -> AppResult<AttemptStatusDto> {
        let (quiz, user) = self.resolve(quiz_id, user_id).await?;

        let attempt = self
            .repository
            .find_by_user_and_quiz(&user.id, &quiz.id)
            .await?
            .unwrap_or_else(|| QuizAttempt::new(&user.id, &quiz.id, &user.id, Utc::now()));

        let progress = match attempt.status {
            AttemptStatus::NotStarted => 0,
            _ => self.progress(&quiz.id, &user.id).await?,
        };
        Ok(AttemptStatusDto::from_attempt(attempt, progress))
    }
}
