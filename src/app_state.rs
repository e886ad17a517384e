use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::{AppError, AppResult},
    repositories::{
        AnswerRepository, MongoAnswerRepository, MongoOptionRepository, MongoQuestionRepository,
        MongoQuizAttemptRepository, MongoQuizRepository, MongoUserRepository, OptionRepository,
        QuestionRepository, QuizAttemptRepository, QuizRepository, UserRepository,
    },
    services::{
        ActivationService, AnswerService, HttpWebhookNotifier, OptionService, QuestionService,
        QuizActivationNotifier, QuizAttemptService, QuizService, UserService,
    },
};

/// Repository handles the services are built from.
pub struct Repositories {
    pub quizzes: Arc<dyn QuizRepository>,
    pub questions: Arc<dyn QuestionRepository>,
    pub options: Arc<dyn OptionRepository>,
    pub answers: Arc<dyn AnswerRepository>,
    pub users: Arc<dyn UserRepository>,
    pub attempts: Arc<dyn QuizAttemptRepository>,
}

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: Arc<QuizService>,
    pub question_service: Arc<QuestionService>,
    pub option_service: Arc<OptionService>,
    pub answer_service: Arc<AnswerService>,
    pub user_service: Arc<UserService>,
    pub attempt_service: Arc<QuizAttemptService>,
    pub activation_service: Arc<ActivationService>,
    pub config: Arc<Config>,
    /// `None` when the state was assembled from non-Mongo repositories.
    pub db: Option<Database>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let quizzes = Arc::new(MongoQuizRepository::new(&db));
        quizzes.ensure_indexes().await?;
        let questions = Arc::new(MongoQuestionRepository::new(&db));
        questions.ensure_indexes().await?;
        let options = Arc::new(MongoOptionRepository::new(&db));
        options.ensure_indexes().await?;
        let answers = Arc::new(MongoAnswerRepository::new(&db));
        answers.ensure_indexes().await?;
        let users = Arc::new(MongoUserRepository::new(&db));
        users.ensure_indexes().await?;
        let attempts = Arc::new(MongoQuizAttemptRepository::new(&db));
        attempts.ensure_indexes().await?;

        let notifier = HttpWebhookNotifier::new(config.webhook_url.clone(), config.webhook_timeout())
            .map_err(|e| AppError::OperationFailed(e.to_string()))?;
        log::info!("Quiz activations will be announced to {}", notifier.url());

        let repositories = Repositories {
            quizzes,
            questions,
            options,
            answers,
            users,
            attempts,
        };

        let mut state = Self::from_parts(config, repositories, Arc::new(notifier));
        state.db = Some(db);
        Ok(state)
    }

    pub fn from_parts(
        config: Config,
        repositories: Repositories,
        notifier: Arc<dyn QuizActivationNotifier>,
    ) -> Self {
        let Repositories {
            quizzes,
            questions,
            options,
            answers,
            users,
            attempts,
        } = repositories;

        let quiz_service = Arc::new(QuizService::new(
            quizzes.clone(),
            questions.clone(),
            options.clone(),
        ));
        let question_service = Arc::new(QuestionService::new(
            questions.clone(),
            quizzes.clone(),
            options.clone(),
            answers.clone(),
        ));
        let option_service = Arc::new(OptionService::new(options.clone(), questions.clone()));
        let answer_service = Arc::new(AnswerService::new(
            answers.clone(),
            questions.clone(),
            options,
            users.clone(),
        ));
        let user_service = Arc::new(UserService::new(users.clone()));
        let attempt_service = Arc::new(QuizAttemptService::new(
            attempts,
            quizzes.clone(),
            users,
            questions,
            answers,
        ));
        let activation_service = Arc::new(ActivationService::new(
            quizzes,
            notifier,
            config.scheduler_actor.clone(),
            config.activation_concurrency,
        ));

        Self {
            quiz_service,
            question_service,
            option_service,
            answer_service,
            user_service,
            attempt_service,
            activation_service,
            config: Arc::new(config),
            db: None,
        }
    }
}
