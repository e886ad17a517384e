use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::domain::UserRole;

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::from("must not be blank")));
    }
    Ok(())
}

fn window_error() -> ValidationError {
    ValidationError::new("window").with_message(Cow::from("startTime must be before endTime"))
}

fn validate_create_quiz_window(request: &CreateQuizRequest) -> Result<(), ValidationError> {
    match (request.start_time, request.end_time) {
        (Some(start), Some(end)) if start >= end => Err(window_error()),
        _ => Ok(()),
    }
}

fn validate_update_quiz_window(request: &UpdateQuizRequest) -> Result<(), ValidationError> {
    match (request.start_time, request.end_time) {
        (Some(start), Some(end)) if start >= end => Err(window_error()),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_create_quiz_window"))]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, max = 255), custom(function = "not_blank"))]
    pub title: String,

    #[validate(length(min = 1, max = 2000), custom(function = "not_blank"))]
    pub description: String,

    #[validate(required(message = "Start time is required"))]
    pub start_time: Option<DateTime<Utc>>,

    #[validate(required(message = "End time is required"))]
    pub end_time: Option<DateTime<Utc>>,

    /// Accepted for compatibility; new quizzes always start inactive.
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_update_quiz_window"))]
pub struct UpdateQuizRequest {
    #[validate(length(min = 1, max = 255), custom(function = "not_blank"))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 2000), custom(function = "not_blank"))]
    pub description: Option<String>,

    pub start_time: Option<DateTime<Utc>>,

    pub end_time: Option<DateTime<Utc>>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOptionRequest {
    #[validate(length(min = 1, max = 500), custom(function = "not_blank"))]
    pub text: String,

    #[serde(default)]
    pub is_correct: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOptionRequest {
    #[validate(length(min = 1, max = 500), custom(function = "not_blank"))]
    pub text: Option<String>,

    pub is_correct: Option<bool>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 500), custom(function = "not_blank"))]
    pub text: String,

    #[serde(default)]
    #[validate(nested)]
    pub options: Vec<CreateOptionRequest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuestionRequest {
    #[validate(length(min = 1, max = 500), custom(function = "not_blank"))]
    pub text: Option<String>,

    pub is_active: Option<bool>,
}

fn validate_answer_choice(request: &SubmitAnswerRequest) -> Result<(), ValidationError> {
    let has_text = request
        .selected_answer
        .as_deref()
        .is_some_and(|text| !text.trim().is_empty());
    if !has_text && request.selected_option_id.is_none() {
        return Err(ValidationError::new("answer").with_message(Cow::from(
            "either selectedAnswer or selectedOptionId is required",
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_answer_choice"))]
pub struct SubmitAnswerRequest {
    #[validate(length(min = 1))]
    pub user_id: String,

    #[validate(length(min = 1))]
    pub question_id: String,

    #[validate(length(max = 1000))]
    pub selected_answer: Option<String>,

    pub selected_option_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAnswerRequest {
    #[validate(length(min = 1, max = 1000), custom(function = "not_blank"))]
    pub selected_answer: Option<String>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[serde(default)]
    pub role: UserRole,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 8, max = 128))]
    pub password: Option<String>,

    pub role: Option<UserRole>,

    pub is_active: Option<bool>,
}

/// Body of the activation webhook, both inbound and outbound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuizActivationRequest {
    #[validate(length(min = 1))]
    pub quiz_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StartAttemptRequest {
    #[validate(length(min = 1))]
    pub user_id: String,
}

/// `?active=` filter; records are matched against `true` when absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActiveFilter {
    pub active: Option<bool>,
}

impl ActiveFilter {
    pub fn status(&self) -> bool {
        self.active.unwrap_or(true)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerQuery {
    pub active: Option<bool>,
    pub user_id: Option<String>,
    pub quiz_id: Option<String>,
}
