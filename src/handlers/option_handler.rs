use std::sync::Arc;

use actix_web::{delete, get, put, web, HttpResponse};

use crate::{
    actor::CurrentActor,
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::{ActiveFilter, UpdateOptionRequest},
        response::ApiResponse,
    },
};

#[get("/api/options")]
pub async fn list_options(
    state: web::Data<Arc<AppState>>,
    filter: web::Query<ActiveFilter>,
) -> Result<HttpResponse, AppError> {
    let options = state.option_service.list_options(filter.status()).await?;
    Ok(ApiResponse::ok(options, "Options retrieved successfully").into_http())
}

#[get("/api/options/{id}")]
pub async fn get_option(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    filter: web::Query<ActiveFilter>,
) -> Result<HttpResponse, AppError> {
    let option = state.option_service.get_option(&id, filter.status()).await?;
    Ok(ApiResponse::ok(option, "Option retrieved successfully").into_http())
}

#[put("/api/options/{id}")]
pub async fn update_option(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    request: web::Json<UpdateOptionRequest>,
    actor: CurrentActor,
) -> Result<HttpResponse, AppError> {
    let option = state
        .option_service
        .update_option(&id, request.into_inner(), actor.as_str())
        .await?;
    Ok(ApiResponse::ok(option, "Option updated successfully").into_http())
}

#[delete("/api/options/{id}")]
pub async fn delete_option(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    actor: CurrentActor,
) -> Result<HttpResponse, AppError> {
    state.option_service.delete_option(&id, actor.as_str()).await?;
    Ok(ApiResponse::<()>::message("Option deleted successfully").into_http())
}
