use std::sync::Arc;

use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::{
    actor::CurrentActor,
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::{ActiveFilter, AnswerQuery, SubmitAnswerRequest, UpdateAnswerRequest},
        response::ApiResponse,
    },
};

/// `?userId=&quizId=` narrows to one user's answers for one quiz; both or neither.
#[get("/api/answers")]
pub async fn list_answers(
    state: web::Data<Arc<AppState>>,
    query: web::Query<AnswerQuery>,
) -> Result<HttpResponse, AppError> {
    let AnswerQuery {
        active,
        user_id,
        quiz_id,
    } = query.into_inner();
    let active = ActiveFilter { active }.status();

    let answers = match (user_id, quiz_id) {
        (Some(user_id), Some(quiz_id)) => {
            state
                .answer_service
                .answers_for_user_quiz(&user_id, &quiz_id, active)
                .await?
        }
        (None, None) => state.answer_service.list_answers(active).await?,
        _ => {
            return Err(AppError::ValidationError(
                "userId and quizId must be supplied together".to_string(),
            ))
        }
    };
    Ok(ApiResponse::ok(answers, "Answers retrieved successfully").into_http())
}

#[post("/api/answers")]
pub async fn submit_answer(
    state: web::Data<Arc<AppState>>,
    request: web::Json<SubmitAnswerRequest>,
    actor: CurrentActor,
) -> Result<HttpResponse, AppError> {
    let answer = state
        .answer_service
        .submit_answer(request.into_inner(), actor.as_str())
        .await?;
    Ok(ApiResponse::created(answer, "Answer submitted successfully").into_http())
}

#[get("/api/answers/{id}")]
pub async fn get_answer(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    filter: web::Query<ActiveFilter>,
) -> Result<HttpResponse, AppError> {
    let answer = state.answer_service.get_answer(&id, filter.status()).await?;
    Ok(ApiResponse::ok(answer, "Answer retrieved successfully").into_http())
}

#[put("/api/answers/{id}")]
pub async fn update_answer(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    request: web::Json<UpdateAnswerRequest>,
    actor: CurrentActor,
) -> Result<HttpResponse, AppError> {
    let answer = state
        .answer_service
        .update_answer(&id, request.into_inner(), actor.as_str())
        .await?;
    Ok(ApiResponse::ok(answer, "Answer updated successfully").into_http())
}

#[delete("/api/answers/{id}")]
pub async fn delete_answer(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    actor: CurrentActor,
) -> Result<HttpResponse, AppError> {
    state.answer_service.delete_answer(&id, actor.as_str()).await?;
    Ok(ApiResponse::<()>::message("Answer deleted successfully").into_http())
}
