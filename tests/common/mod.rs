#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use quiz_server::{
    app_state::{AppState, Repositories},
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{Answer, Question, QuestionOption, Quiz, QuizAttempt, SoftDeletable, User},
    repositories::{
        AnswerRepository, OptionRepository, QuestionRepository, QuizAttemptRepository,
        QuizRepository, UserRepository,
    },
    services::{NotificationError, QuizActivationNotifier},
};

type Table<T> = Arc<RwLock<HashMap<String, T>>>;

fn table<T>() -> Table<T> {
    Arc::new(RwLock::new(HashMap::new()))
}

fn sorted<T: Clone>(items: impl Iterator<Item = T>, key: impl Fn(&T) -> (DateTime<Utc>, String)) -> Vec<T> {
    let mut items: Vec<T> = items.collect();
    items.sort_by_key(|item| key(item));
    items
}

#[derive(Default)]
pub struct InMemoryQuizRepository {
    quizzes: Table<Quiz>,
    failing_updates: Mutex<HashSet<String>>,
}

impl InMemoryQuizRepository {
    pub fn new() -> Self {
        Self {
            quizzes: table(),
            failing_updates: Mutex::new(HashSet::new()),
        }
    }

    /// Every later update of `id` fails as if the store were unreachable.
    pub fn fail_updates_for(&self, id: &str) {
        self.failing_updates.lock().unwrap().insert(id.to_string());
    }

    /// Raw stored record, archived ones included.
    pub async fn stored(&self, id: &str) -> Option<Quiz> {
        self.quizzes.read().await.get(id).cloned()
    }

    pub async fn insert(&self, quiz: Quiz) {
        self.quizzes.write().await.insert(quiz.id.clone(), quiz);
    }
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        let mut quizzes = self.quizzes.write().await;
        if quizzes.contains_key(&quiz.id) {
            return Err(AppError::Conflict(format!("Quiz '{}' already exists", quiz.id)));
        }
        quizzes.insert(quiz.id.clone(), quiz.clone());
        Ok(quiz)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        let quizzes = self.quizzes.read().await;
        Ok(quizzes.get(id).filter(|quiz| !quiz.archived).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Quiz>> {
        let quizzes = self.quizzes.read().await;
        Ok(sorted(
            quizzes.values().filter(|quiz| !quiz.archived).cloned(),
            |quiz| (quiz.start_time, quiz.id.clone()),
        ))
    }

    async fn find_due_inactive(&self, now: DateTime<Utc>) -> AppResult<Vec<Quiz>> {
        let quizzes = self.quizzes.read().await;
        Ok(sorted(
            quizzes.values().filter(|quiz| quiz.is_due_inactive(now)).cloned(),
            |quiz| (quiz.start_time, quiz.id.clone()),
        ))
    }

    async fn update(&self, quiz: Quiz) -> AppResult<Quiz> {
        if self.failing_updates.lock().unwrap().contains(&quiz.id) {
            return Err(AppError::DatabaseError("connection reset".to_string()));
        }

        let mut quizzes = self.quizzes.write().await;
        let stored = quizzes
            .get(&quiz.id)
            .ok_or_else(|| AppError::not_found("Quiz", &quiz.id))?;
        if stored.version != quiz.version {
            return Err(AppError::Conflict(format!(
                "Quiz '{}' was modified concurrently (expected version {})",
                quiz.id, quiz.version
            )));
        }

        let mut next = quiz;
        next.version += 1;
        quizzes.insert(next.id.clone(), next.clone());
        Ok(next)
    }
}

#[derive(Default)]
pub struct InMemoryQuestionRepository {
    questions: Table<Question>,
}

#[async_trait]
impl QuestionRepository for InMemoryQuestionRepository {
    async fn create(&self, question: Question) -> AppResult<Question> {
        self.questions
            .write()
            .await
            .insert(question.id.clone(), question.clone());
        Ok(question)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Question>> {
        Ok(self.questions.read().await.get(id).cloned())
    }

    async fn find_all(&self, active: Option<bool>) -> AppResult<Vec<Question>> {
        let questions = self.questions.read().await;
        Ok(sorted(
            questions.values().filter(|q| q.matches_active(active)).cloned(),
            |q| (q.audit.created_on, q.id.clone()),
        ))
    }

    async fn find_by_quiz(&self, quiz_id: &str, active: Option<bool>) -> AppResult<Vec<Question>> {
        let questions = self.questions.read().await;
        Ok(sorted(
            questions
                .values()
                .filter(|q| q.quiz_id == quiz_id && q.matches_active(active))
                .cloned(),
            |q| (q.audit.created_on, q.id.clone()),
        ))
    }

    async fn update(&self, question: Question) -> AppResult<Question> {
        let mut questions = self.questions.write().await;
        if !questions.contains_key(&question.id) {
            return Err(AppError::not_found("Question", &question.id));
        }
        questions.insert(question.id.clone(), question.clone());
        Ok(question)
    }

    async fn deactivate_by_quiz(
        &self,
        quiz_id: &str,
        actor: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<String>> {
        let mut questions = self.questions.write().await;
        let mut ids = Vec::new();
        for question in questions.values_mut().filter(|q| q.quiz_id == quiz_id) {
            question.deactivate(actor, now);
            ids.push(question.id.clone());
        }
        Ok(ids)
    }
}

#[derive(Default)]
pub struct InMemoryOptionRepository {
    options: Table<QuestionOption>,
}

#[async_trait]
impl OptionRepository for InMemoryOptionRepository {
    async fn create(&self, option: QuestionOption) -> AppResult<QuestionOption> {
        self.options
            .write()
            .await
            .insert(option.id.clone(), option.clone());
        Ok(option)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuestionOption>> {
        Ok(self.options.read().await.get(id).cloned())
    }

    async fn find_all(&self, active: Option<bool>) -> AppResult<Vec<QuestionOption>> {
        let options = self.options.read().await;
        Ok(sorted(
            options.values().filter(|o| o.matches_active(active)).cloned(),
            |o| (o.audit.created_on, o.id.clone()),
        ))
    }

    async fn find_by_question(
        &self,
        question_id: &str,
        active: Option<bool>,
    ) -> AppResult<Vec<QuestionOption>> {
        let options = self.options.read().await;
        Ok(sorted(
            options
                .values()
                .filter(|o| o.question_id == question_id && o.matches_active(active))
                .cloned(),
            |o| (o.audit.created_on, o.id.clone()),
        ))
    }

    async fn update(&self, option: QuestionOption) -> AppResult<QuestionOption> {
        let mut options = self.options.write().await;
        if !options.contains_key(&option.id) {
            return Err(AppError::not_found("Option", &option.id));
        }
        options.insert(option.id.clone(), option.clone());
        Ok(option)
    }

    async fn deactivate_by_questions(
        &self,
        question_ids: &[String],
        actor: &str,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let mut options = self.options.write().await;
        let mut count = 0;
        for option in options
            .values_mut()
            .filter(|o| question_ids.contains(&o.question_id))
        {
            option.deactivate(actor, now);
            count += 1;
        }
        Ok(count)
    }
}

#[derive(Default)]
pub struct InMemoryAnswerRepository {
    answers: Table<Answer>,
    lookup_delay: Mutex<Option<Duration>>,
}

impl InMemoryAnswerRepository {
    /// Every later active-answer lookup waits `delay` before reading.
    pub fn slow_lookups(&self, delay: Duration) {
        *self.lookup_delay.lock().unwrap() = Some(delay);
    }

    fn conflicts(answers: &HashMap<String, Answer>, answer: &Answer) -> bool {
        answer.is_active
            && answers.values().any(|a| {
                a.id != answer.id
                    && a.is_active
                    && a.user_id == answer.user_id
                    && a.question_id == answer.question_id
            })
    }
}

#[async_trait]
impl AnswerRepository for InMemoryAnswerRepository {
    async fn create(&self, answer: Answer) -> AppResult<Answer> {
        let mut answers = self.answers.write().await;
        if Self::conflicts(&answers, &answer) {
            return Err(AppError::Conflict(format!(
                "duplicate key: user_question_active_unique ({}, {})",
                answer.user_id, answer.question_id
            )));
        }
        answers.insert(answer.id.clone(), answer.clone());
        Ok(answer)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Answer>> {
        Ok(self.answers.read().await.get(id).cloned())
    }

    async fn find_all(&self, active: Option<bool>) -> AppResult<Vec<Answer>> {
        let answers = self.answers.read().await;
        Ok(sorted(
            answers.values().filter(|a| a.matches_active(active)).cloned(),
            |a| (a.audit.created_on, a.id.clone()),
        ))
    }

    async fn find_by_question(
        &self,
        question_id: &str,
        active: Option<bool>,
    ) -> AppResult<Vec<Answer>> {
        let answers = self.answers.read().await;
        Ok(sorted(
            answers
                .values()
                .filter(|a| a.question_id == question_id && a.matches_active(active))
                .cloned(),
            |a| (a.audit.created_on, a.id.clone()),
        ))
    }

    async fn find_active_by_user_and_question(
        &self,
        user_id: &str,
        question_id: &str,
    ) -> AppResult<Option<Answer>> {
        let delay = *self.lookup_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let answers = self.answers.read().await;
        Ok(answers
            .values()
            .find(|a| a.user_id == user_id && a.question_id == question_id && a.is_active)
            .cloned())
    }

    async fn find_by_user_and_quiz(
        &self,
        user_id: &str,
        quiz_id: &str,
        active: Option<bool>,
    ) -> AppResult<Vec<Answer>> {
        let answers = self.answers.read().await;
        Ok(sorted(
            answers
                .values()
                .filter(|a| a.user_id == user_id && a.quiz_id == quiz_id && a.matches_active(active))
                .cloned(),
            |a| (a.audit.created_on, a.id.clone()),
        ))
    }

    async fn update(&self, answer: Answer) -> AppResult<Answer> {
        let mut answers = self.answers.write().await;
        if !answers.contains_key(&answer.id) {
            return Err(AppError::not_found("Answer", &answer.id));
        }
        if Self::conflicts(&answers, &answer) {
            return Err(AppError::Conflict(format!(
                "duplicate key: user_question_active_unique ({}, {})",
                answer.user_id, answer.question_id
            )));
        }
        answers.insert(answer.id.clone(), answer.clone());
        Ok(answer)
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Table<User>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict(format!(
                "User with email '{}' already exists",
                user.email
            )));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_all(&self, active: Option<bool>) -> AppResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(sorted(
            users.values().filter(|u| u.matches_active(active)).cloned(),
            |u| (u.audit.created_on, u.id.clone()),
        ))
    }

    async fn update(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(AppError::not_found("User", &user.id));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }
}

#[derive(Default)]
pub struct InMemoryQuizAttemptRepository {
    attempts: Table<QuizAttempt>,
}

#[async_trait]
impl QuizAttemptRepository for InMemoryQuizAttemptRepository {
    async fn create(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        let mut attempts = self.attempts.write().await;
        if attempts
            .values()
            .any(|a| a.user_id == attempt.user_id && a.quiz_id == attempt.quiz_id)
        {
            return Err(AppError::Conflict(format!(
                "Attempt of quiz '{}' by user '{}' already exists",
                attempt.quiz_id, attempt.user_id
            )));
        }
        attempts.insert(attempt.id.clone(), attempt.clone());
        Ok(attempt)
    }

    async fn find_by_user_and_quiz(
        &self,
        user_id: &str,
        quiz_id: &str,
    ) -> AppResult<Option<QuizAttempt>> {
        let attempts = self.attempts.read().await;
        Ok(attempts
            .values()
            .find(|a| a.user_id == user_id && a.quiz_id == quiz_id)
            .cloned())
    }

    async fn update(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        let mut attempts = self.attempts.write().await;
        if !attempts.contains_key(&attempt.id) {
            return Err(AppError::not_found("QuizAttempt", &attempt.id));
        }
        attempts.insert(attempt.id.clone(), attempt.clone());
        Ok(attempt)
    }
}

/// Records every announced quiz id; ids registered with `fail_for` are
/// rejected with a 500.
#[derive(Default)]
pub struct RecordingNotifier {
    delivered: Mutex<Vec<String>>,
    failing: Mutex<HashSet<String>>,
}

impl RecordingNotifier {
    pub fn fail_for(&self, quiz_id: &str) {
        self.failing.lock().unwrap().insert(quiz_id.to_string());
    }

    pub fn delivered(&self) -> Vec<String> {
        let mut ids = self.delivered.lock().unwrap().clone();
        ids.sort();
        ids
    }
}

#[async_trait]
impl QuizActivationNotifier for RecordingNotifier {
    async fn notify_quiz_activated(&self, quiz_id: &str) -> Result<(), NotificationError> {
        if self.failing.lock().unwrap().contains(quiz_id) {
            return Err(NotificationError::Status {
                status: 500,
                body: "receiver down".to_string(),
            });
        }
        self.delivered.lock().unwrap().push(quiz_id.to_string());
        Ok(())
    }
}

/// Application state over in-memory stores, with handles kept for inspection.
pub struct TestApp {
    pub state: Arc<AppState>,
    pub quizzes: Arc<InMemoryQuizRepository>,
    pub questions: Arc<InMemoryQuestionRepository>,
    pub options: Arc<InMemoryOptionRepository>,
    pub answers: Arc<InMemoryAnswerRepository>,
    pub users: Arc<InMemoryUserRepository>,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestApp {
    pub fn new() -> Self {
        let quizzes = Arc::new(InMemoryQuizRepository::new());
        let questions = Arc::new(InMemoryQuestionRepository::default());
        let options = Arc::new(InMemoryOptionRepository::default());
        let answers = Arc::new(InMemoryAnswerRepository::default());
        let users = Arc::new(InMemoryUserRepository::default());
        let notifier = Arc::new(RecordingNotifier::default());

        let repositories = Repositories {
            quizzes: quizzes.clone(),
            questions: questions.clone(),
            options: options.clone(),
            answers: answers.clone(),
            users: users.clone(),
            attempts: Arc::new(InMemoryQuizAttemptRepository::default()),
        };
        let state = AppState::from_parts(Config::test_config(), repositories, notifier.clone());

        Self {
            state: Arc::new(state),
            quizzes,
            questions,
            options,
            answers,
            users,
            notifier,
        }
    }
}
