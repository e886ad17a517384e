use std::sync::Arc;

use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::{
    actor::CurrentActor,
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::{ActiveFilter, CreateOptionRequest, UpdateQuestionRequest},
        response::ApiResponse,
    },
};

#[get("/api/questions")]
pub async fn list_questions(
    state: web::Data<Arc<AppState>>,
    filter: web::Query<ActiveFilter>,
) -> Result<HttpResponse, AppError> {
    let questions = state.question_service.list_questions(filter.status()).await?;
    Ok(ApiResponse::ok(questions, "Questions retrieved successfully").into_http())
}

#[get("/api/questions/{id}")]
pub async fn get_question(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    filter: web::Query<ActiveFilter>,
) -> Result<HttpResponse, AppError> {
    let question = state
        .question_service
        .get_question(&id, filter.status())
        .await?;
    Ok(ApiResponse::ok(question, "Question retrieved successfully").into_http())
}

#[put("/api/questions/{id}")]
pub async fn update_question(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    request: web::Json<UpdateQuestionRequest>,
    actor: CurrentActor,
) -> Result<HttpResponse, AppError> {
    let question = state
        .question_service
        .update_question(&id, request.into_inner(), actor.as_str())
        .await?;
    Ok(ApiResponse::ok(question, "Question updated successfully").into_http())
}

#[delete("/api/questions/{id}")]
pub async fn delete_question(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    actor: CurrentActor,
) -> Result<HttpResponse, AppError> {
    state
        .question_service
        .delete_question(&id, actor.as_str())
        .await?;
    Ok(ApiResponse::<()>::message("Question deleted successfully").into_http())
}

#[get("/api/questions/{id}/options")]
pub async fn list_question_options(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    filter: web::Query<ActiveFilter>,
) -> Result<HttpResponse, AppError> {
    let options = state
        .question_service
        .list_options(&id, filter.status())
        .await?;
    Ok(ApiResponse::ok(options, "Options retrieved successfully").into_http())
}

#[post("/api/questions/{id}/options")]
pub async fn add_question_option(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    request: web::Json<CreateOptionRequest>,
    actor: CurrentActor,
) -> Result<HttpResponse, AppError> {
    let option = state
        .option_service
        .add_option(&id, request.into_inner(), actor.as_str())
        .await?;
    Ok(ApiResponse::created(option, "Option created successfully").into_http())
}

#[get("/api/questions/{id}/answers")]
pub async fn list_question_answers(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    filter: web::Query<ActiveFilter>,
) -> Result<HttpResponse, AppError> {
    let answers = state
        .question_service
        .list_answers(&id, filter.status())
        .await?;
    Ok(ApiResponse::ok(answers, "Answers retrieved successfully").into_http())
}
