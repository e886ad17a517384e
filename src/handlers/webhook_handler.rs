use std::sync::Arc;

use actix_web::{post, web, HttpResponse};
use validator::Validate;

use crate::{
    actor::CurrentActor,
    app_state::AppState,
    errors::AppError,
    models::dto::{request::QuizActivationRequest, response::ApiResponse},
};

/// Inbound half of the activation webhook; safe to deliver more than once.
#[post("/api/webhooks/quiz-activation")]
pub async fn quiz_activation(
    state: web::Data<Arc<AppState>>,
    request: web::Json<QuizActivationRequest>,
    actor: CurrentActor,
) -> Result<HttpResponse, AppError> {
    request.validate()?;

    let quiz = state
        .quiz_service
        .activate_quiz(&request.quiz_id, actor.as_str())
        .await?;
    Ok(ApiResponse::ok(quiz, "Quiz activated successfully").into_http())
}
