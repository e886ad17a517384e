pub mod activation_service;
pub mod answer_service;
pub mod option_service;
pub mod question_service;
pub mod quiz_attempt_service;
pub mod quiz_service;
pub mod user_service;
pub mod webhook_service;

pub use activation_service::{
    ActivationScheduler, ActivationService, SweepFailure, SweepReport, SweepStage,
};
pub use answer_service::AnswerService;
pub use option_service::OptionService;
pub use question_service::QuestionService;
pub use quiz_attempt_service::QuizAttemptService;
pub use quiz_service::QuizService;
pub use user_service::UserService;
pub use webhook_service::{HttpWebhookNotifier, NotificationError, QuizActivationNotifier};
