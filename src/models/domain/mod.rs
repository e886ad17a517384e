pub mod answer;
pub mod audit;
pub mod question;
pub mod question_option;
pub mod quiz;
pub mod quiz_attempt;
pub mod user;

pub use answer::Answer;
pub use audit::{Audit, SoftDeletable};
pub use question::Question;
pub use question_option::QuestionOption;
pub use quiz::Quiz;
pub use quiz_attempt::{AttemptStatus, QuizAttempt};
pub use user::{User, UserRole};
