use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Answer, SoftDeletable},
        dto::{
            request::{SubmitAnswerRequest, UpdateAnswerRequest},
            response::AnswerDto,
        },
    },
    repositories::{AnswerRepository, OptionRepository, QuestionRepository, UserRepository},
};

pub struct AnswerService {
    repository: Arc<dyn AnswerRepository>,
    question_repository: Arc<dyn QuestionRepository>,
    option_repository: Arc<dyn OptionRepository>,
    user_repository: Arc<dyn UserRepository>,
}

impl AnswerService {
    pub fn new(
        repository: Arc<dyn AnswerRepository>,
        question_repository: Arc<dyn QuestionRepository>,
        option_repository: Arc<dyn OptionRepository>,
        user_repository: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            repository,
            question_repository,
            option_repository,
            user_repository,
        }
    }

    async fn fetch(&self, id: &str, active: Option<bool>) -> AppResult<Answer> {
        self.repository
            .find_by_id(id)
            .await?
            .filter(|answer| answer.matches_active(active))
            .ok_or_else(|| AppError::not_found("Answer", id))
    }

    pub async fn list_answers(&self, active: bool) -> AppResult<Vec<AnswerDto>> {
        let answers = self.repository.find_all(Some(active)).await?;
        Ok(answers.into_iter().map(AnswerDto::from).collect())
    }

    pub async fn get_answer(&self, id: &str, active: bool) -> AppResult<AnswerDto> {
        Ok(self.fetch(id, Some(active)).await?.into())
    }

    pub async fn answers_for_user_quiz(
        &self,
        user_id: &str,
        quiz_id: &str,
        active: bool,
    ) -> AppResult<Vec<AnswerDto>> {
        let answers = self
            .repository
            .find_by_user_and_quiz(user_id, quiz_id, Some(active))
            .await?;
        Ok(answers.into_iter().map(AnswerDto::from).collect())
    }

    pub async fn submit_answer(
        &self,
        request: SubmitAnswerRequest,
        actor: &str,
    ) -> AppResult<AnswerDto> {
        request.validate()?;

        let user = self
            .user_repository
            .find_by_id(&request.user_id)
            .await?
            .filter(|user| user.is_active)
            .ok_or_else(|| AppError::not_found("User", &request.user_id))?;

        let question = self
            .question_repository
            .find_by_id(&request.question_id)
            .await?
            .filter(|question| question.is_active)
            .ok_or_else(|| AppError::not_found("Question", &request.question_id))?;

        if self
            .repository
            .find_active_by_user_and_question(&user.id, &question.id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "User '{}' already answered question '{}'",
                user.id, question.id
            )));
        }

        let now = Utc::now();
        let text = request.selected_answer.as_deref().map(str::trim).unwrap_or_default();
        let mut answer = Answer::new(&user.id, &question.id, &question.quiz_id, text, actor, now);

        if let Some(option_id) = request.selected_option_id.as_deref() {
            let option = self
                .option_repository
                .find_by_id(option_id)
                .await?
                .filter(|option| option.is_active)
                .ok_or_else(|| AppError::not_found("Option", option_id))?;

            if option.question_id != question.id {
                return Err(AppError::ValidationError(format!(
                    "Option '{}' does not belong to question '{}'",
                    option.id, question.id
                )));
            }

            if answer.selected_answer.is_empty() {
                answer.selected_answer = option.text.clone();
            }
            answer = answer.with_selected_option(&option.id, option.is_correct);
        }

        let answer = self.repository.create(answer).await?;
        Ok(answer.into())
    }

    pub async fn update_answer(
        &self,
        id: &str,
        request: UpdateAnswerRequest,
        actor: &str,
    ) -> AppResult<AnswerDto> {
        request.validate()?;
        let mut answer = self.fetch(id, None).await?;

        if let Some(selected_answer) = request.selected_answer {
            answer.selected_answer = selected_answer.trim().to_string();
        }
        if let Some(is_active) = request.is_active {
            if is_active && !answer.is_active {
                let existing = self
                    .repository
                    .find_active_by_user_and_question(&answer.user_id, &answer.question_id)
                    .await?;
                if existing.is_some_and(|other| other.id != answer.id) {
                    return Err(AppError::Conflict(format!(
                        "User '{}' already has an active answer for question '{}'",
                        answer.user_id, answer.question_id
                    )));
                }
            }
            answer.is_active = is_active;
        }

        answer.audit.touch(actor, Utc::now());
        let answer = self.repository.update(answer).await?;
        Ok(answer.into())
    }

    pub async fn delete_answer(&self, id: &str, actor: &str) -> AppResult<()> {
        let mut answer = self.fetch(id, None).await?;
        answer.deactivate(actor, Utc::now());
        self.repository.update(answer).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::domain::{Question, QuestionOption, User},
        repositories::{
            answer_repository::MockAnswerRepository, option_repository::MockOptionRepository,
            question_repository::MockQuestionRepository, user_repository::MockUserRepository,
        },
        test_utils::fixtures::test_user,
    };

    struct Fixture {
        user: User,
        question: Question,
        answers: MockAnswerRepository,
        questions: MockQuestionRepository,
        options: MockOptionRepository,
        users: MockUserRepository,
    }

    impl Fixture {
        fn new() -> Self {
            let now = Utc::now();
            let user = test_user();
            let question = Question::new("quiz-1", "Capital of France?", "SYSTEM", now);

            let mut users = MockUserRepository::new();
            let stored_user = user.clone();
            users
                .expect_find_by_id()
                .returning(move |_| Ok(Some(stored_user.clone())));

            let mut questions = MockQuestionRepository::new();
            let stored_question = question.clone();
            questions
                .expect_find_by_id()
                .returning(move |_| Ok(Some(stored_question.clone())));

            Fixture {
                user,
                question,
                answers: MockAnswerRepository::new(),
                questions,
                options: MockOptionRepository::new(),
                users,
            }
        }

        fn request(&self, option_id: Option<&str>) -> SubmitAnswerRequest {
            SubmitAnswerRequest {
                user_id: self.user.id.clone(),
                question_id: self.question.id.clone(),
                selected_answer: option_id.is_none().then(|| "Paris".to_string()),
                selected_option_id: option_id.map(str::to_string),
            }
        }

        fn service(self) -> AnswerService {
            AnswerService::new(
                Arc::new(self.answers),
                Arc::new(self.questions),
                Arc::new(self.options),
                Arc::new(self.users),
            )
        }
    }

    #[tokio::test]
    async fn test_second_active_answer_is_conflict() {
        let mut fixture = Fixture::new();
        let existing = Answer::new(&fixture.user.id, &fixture.question.id, "quiz-1", "Lyon", "SYSTEM", Utc::now());
        fixture
            .answers
            .expect_find_active_by_user_and_question()
            .returning(move |_, _| Ok(Some(existing.clone())));
        fixture.answers.expect_create().times(0);

        let request = fixture.request(None);
        let result = fixture.service().submit_answer(request, "jane").await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_answer_copies_quiz_and_scores_selected_option() {
        let mut fixture = Fixture::new();
        let option = QuestionOption::new(&fixture.question.id, "Paris", true, "SYSTEM", Utc::now());
        let option_id = option.id.clone();

        fixture
            .answers
            .expect_find_active_by_user_and_question()
            .returning(|_, _| Ok(None));
        fixture
            .options
            .expect_find_by_id()
            .returning(move |_| Ok(Some(option.clone())));
        fixture
            .answers
            .expect_create()
            .times(1)
            .returning(|answer| Ok(answer));

        let request = fixture.request(Some(&option_id));
        let answer = fixture.service().submit_answer(request, "jane").await.unwrap();

        assert_eq!(answer.quiz_id, "quiz-1");
        assert_eq!(answer.selected_answer, "Paris");
        assert_eq!(answer.selected_option_id.as_deref(), Some(option_id.as_str()));
        assert_eq!(answer.is_correct, Some(true));
        assert_eq!(answer.audit.created_by, "jane");
    }

    #[tokio::test]
    async fn test_option_from_another_question_is_rejected() {
        let mut fixture = Fixture::new();
        let foreign = QuestionOption::new("other-question", "Madrid", false, "SYSTEM", Utc::now());

        fixture
            .answers
            .expect_find_active_by_user_and_question()
            .returning(|_, _| Ok(None));
        fixture
            .options
            .expect_find_by_id()
            .returning(move |_| Ok(Some(foreign.clone())));
        fixture.answers.expect_create().times(0);

        let request = fixture.request(Some("foreign"));
        let result = fixture.service().submit_answer(request, "jane").await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_missing_user_is_not_found() {
        let mut fixture = Fixture::new();
        fixture.users = MockUserRepository::new();
        fixture.users.expect_find_by_id().returning(|_| Ok(None));

        let request = fixture.request(None);
        let result = fixture.service().submit_answer(request, "jane").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
