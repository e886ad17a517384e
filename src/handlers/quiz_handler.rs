use std::sync::Arc;

use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::{
    actor::CurrentActor,
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::{ActiveFilter, CreateQuestionRequest, CreateQuizRequest, UpdateQuizRequest},
        response::ApiResponse,
    },
};

#[get("/api/quizzes")]
pub async fn list_quizzes(state: web::Data<Arc<AppState>>) -> Result<HttpResponse, AppError> {
    let quizzes = state.quiz_service.list_quizzes().await?;
    Ok(ApiResponse::ok(quizzes, "Quizzes retrieved successfully").into_http())
}

#[get("/api/quizzes/{id}")]
pub async fn get_quiz(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.get_quiz(&id).await?;
    Ok(ApiResponse::ok(quiz, "Quiz retrieved successfully").into_http())
}

#[post("/api/quizzes")]
pub async fn create_quiz(
    state: web::Data<Arc<AppState>>,
    request: web::Json<CreateQuizRequest>,
    actor: CurrentActor,
) -> Result<HttpResponse, AppError> {
    let quiz = state
        .quiz_service
        .create_quiz(request.into_inner(), actor.as_str())
        .await?;
    Ok(ApiResponse::created(quiz, "Quiz created successfully").into_http())
}

#[put("/api/quizzes/{id}")]
pub async fn update_quiz(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    request: web::Json<UpdateQuizRequest>,
    actor: CurrentActor,
) -> Result<HttpResponse, AppError> {
    let quiz = state
        .quiz_service
        .update_quiz(&id, request.into_inner(), actor.as_str())
        .await?;
    Ok(ApiResponse::ok(quiz, "Quiz updated successfully").into_http())
}

#[delete("/api/quizzes/{id}")]
pub async fn delete_quiz(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    actor: CurrentActor,
) -> Result<HttpResponse, AppError> {
    state.quiz_service.delete_quiz(&id, actor.as_str()).await?;
    Ok(ApiResponse::<()>::message("Quiz deleted successfully").into_http())
}

#[get("/api/quizzes/{id}/questions")]
pub async fn list_quiz_questions(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    filter: web::Query<ActiveFilter>,
) -> Result<HttpResponse, AppError> {
    let questions = state
        .quiz_service
        .list_questions(&id, filter.status())
        .await?;
    Ok(ApiResponse::ok(questions, "Questions retrieved successfully").into_http())
}

#[post("/api/quizzes/{id}/questions")]
pub async fn add_quiz_question(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    request: web::Json<CreateQuestionRequest>,
    actor: CurrentActor,
) -> Result<HttpResponse, AppError> {
    let question = state
        .quiz_service
        .add_question(&id, request.into_inner(), actor.as_str())
        .await?;
    Ok(ApiResponse::created(question, "Question created successfully").into_http())
}
