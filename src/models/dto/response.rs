use actix_web::{http::StatusCode, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::models::domain::{
    Answer, AttemptStatus, Audit, Question, QuestionOption, Quiz, QuizAttempt, User, UserRole,
};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn serialize_timestamp<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.format(TIMESTAMP_FORMAT).to_string())
}

/// Uniform wrapper for every response body, successful or not.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: u16,
    pub payload: Option<T>,
    pub message: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status: StatusCode, payload: Option<T>, message: impl Into<String>) -> Self {
        ApiResponse {
            status: status.as_u16(),
            payload,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn ok(payload: T, message: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, Some(payload), message)
    }

    pub fn created(payload: T, message: impl Into<String>) -> Self {
        Self::new(StatusCode::CREATED, Some(payload), message)
    }

    pub fn into_http(self) -> HttpResponse {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        HttpResponse::build(status).json(self)
    }
}

impl ApiResponse<()> {
    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(status, None, message)
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, None, message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditDto {
    pub created_by: String,
    pub updated_by: String,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
}

impl From<Audit> for AuditDto {
    fn from(audit: Audit) -> Self {
        AuditDto {
            created_by: audit.created_by,
            updated_by: audit.updated_by,
            created_on: audit.created_on,
            updated_on: audit.updated_on,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_active: bool,
    #[serde(flatten)]
    pub audit: AuditDto,
}

impl From<Quiz> for QuizDto {
    fn from(quiz: Quiz) -> Self {
        QuizDto {
            id: quiz.id,
            title: quiz.title,
            description: quiz.description,
            start_time: quiz.start_time,
            end_time: quiz.end_time,
            is_active: quiz.is_active,
            audit: quiz.audit.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionDto {
    pub id: String,
    pub question_id: String,
    pub text: String,
    pub is_correct: bool,
    pub is_active: bool,
    #[serde(flatten)]
    pub audit: AuditDto,
}

impl From<QuestionOption> for OptionDto {
    fn from(option: QuestionOption) -> Self {
        OptionDto {
            id: option.id,
            question_id: option.question_id,
            text: option.text,
            is_correct: option.is_correct,
            is_active: option.is_active,
            audit: option.audit.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDto {
    pub id: String,
    pub quiz_id: String,
    pub text: String,
    pub is_active: bool,
    pub options: Vec<OptionDto>,
    #[serde(flatten)]
    pub audit: AuditDto,
}

impl QuestionDto {
    pub fn from_parts(question: Question, options: Vec<QuestionOption>) -> Self {
        QuestionDto {
            id: question.id,
            quiz_id: question.quiz_id,
            text: question.text,
            is_active: question.is_active,
            options: options.into_iter().map(OptionDto::from).collect(),
            audit: question.audit.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerDto {
    pub id: String,
    pub user_id: String,
    pub question_id: String,
    pub quiz_id: String,
    pub selected_answer: String,
    pub selected_option_id: Option<String>,
    pub is_correct: Option<bool>,
    pub is_active: bool,
    #[serde(flatten)]
    pub audit: AuditDto,
}

impl From<Answer> for AnswerDto {
    fn from(answer: Answer) -> Self {
        AnswerDto {
            id: answer.id,
            user_id: answer.user_id,
            question_id: answer.question_id,
            quiz_id: answer.quiz_id,
            selected_answer: answer.selected_answer,
            selected_option_id: answer.selected_option_id,
            is_correct: answer.is_correct,
            is_active: answer.is_active,
            audit: answer.audit.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub is_active: bool,
    #[serde(flatten)]
    pub audit: AuditDto,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            is_active: user.is_active,
            audit: user.audit.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptStatusDto {
    pub quiz_id: String,
    pub user_id: String,
    pub status: AttemptStatus,
    pub started: bool,
    pub completed: bool,
    pub progress_percentage: u8,
    pub score: Option<i32>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl AttemptStatusDto {
    pub fn from_attempt(attempt: QuizAttempt, progress_percentage: u8) -> Self {
        AttemptStatusDto {
            started: attempt.status != AttemptStatus::NotStarted,
            completed: attempt.status == AttemptStatus::Completed,
            quiz_id: attempt.quiz_id,
            user_id: attempt.user_id,
            status: attempt.status,
            progress_percentage,
            score: attempt.score,
            started_at: attempt.started_at,
            completed_at: attempt.completed_at,
        }
    }
}
