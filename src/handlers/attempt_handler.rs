use std::sync::Arc;

use actix_web::{get, post, put, web, HttpResponse};

use crate::{
    actor::CurrentActor,
    app_state::AppState,
    errors::AppError,
    models::dto::{request::StartAttemptRequest, response::ApiResponse},
};

#[post("/api/quizzes/{id}/attempts")]
pub async fn start_attempt(
    state: web::Data<Arc<AppState>>,
    quiz_id: web::Path<String>,
    request: web::Json<StartAttemptRequest>,
    actor: CurrentActor,
) -> Result<HttpResponse, AppError> {
    let status = state
        .attempt_service
        .start_attempt(&quiz_id, &request.user_id, actor.as_str())
        .await?;
    Ok(ApiResponse::created(status, "Quiz started successfully").into_http())
}

#[get("/api/quizzes/{id}/attempts/{user_id}")]
pub async fn attempt_status(
    state: web::Data<Arc<AppState>>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (quiz_id, user_id) = path.into_inner();
    let status = state
        .attempt_service
        .attempt_status(&quiz_id, &user_id)
        .await?;
    Ok(ApiResponse::ok(status, "Quiz status retrieved successfully").into_http())
}

#[put("/api/quizzes/{id}/attempts/{user_id}/complete")]
pub async fn complete_attempt(
    state: web::Data<Arc<AppState>>,
    path: web::Path<(String, String)>,
    actor: CurrentActor,
) -> Result<HttpResponse, AppError> {
    let (quiz_id, user_id) = path.into_inner();
    let status = state
        .attempt_service
        .complete_attempt(&quiz_id, &user_id, actor.as_str())
        .await?;
    Ok(ApiResponse::ok(status, "Quiz completed successfully").into_http())
}
