use std::sync::Arc;

use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::{
    actor::CurrentActor,
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::{ActiveFilter, CreateUserRequest, UpdateUserRequest},
        response::ApiResponse,
    },
};

#[post("/api/users")]
pub async fn create_user(
    state: web::Data<Arc<AppState>>,
    request: web::Json<CreateUserRequest>,
    actor: CurrentActor,
) -> Result<HttpResponse, AppError> {
    let user = state
        .user_service
        .create_user(request.into_inner(), actor.as_str())
        .await?;
    Ok(ApiResponse::created(user, "User created successfully").into_http())
}

#[get("/api/users/{id}")]
pub async fn get_user(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    filter: web::Query<ActiveFilter>,
) -> Result<HttpResponse, AppError> {
    let user = state.user_service.get_user(&id, filter.status()).await?;
    Ok(ApiResponse::ok(user, "User retrieved successfully").into_http())
}

#[get("/api/users")]
pub async fn get_all_users(
    state: web::Data<Arc<AppState>>,
    filter: web::Query<ActiveFilter>,
) -> Result<HttpResponse, AppError> {
    let users = state.user_service.list_users(filter.status()).await?;
    Ok(ApiResponse::ok(users, "Users retrieved successfully").into_http())
}

#[put("/api/users/{id}")]
pub async fn update_user(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    request: web::Json<UpdateUserRequest>,
    actor: CurrentActor,
) -> Result<HttpResponse, AppError> {
    let user = state
        .user_service
        .update_user(&id, request.into_inner(), actor.as_str())
        .await?;
    Ok(ApiResponse::ok(user, "User updated successfully").into_http())
}

#[delete("/api/users/{id}")]
pub async fn delete_user(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    actor: CurrentActor,
) -> Result<HttpResponse, AppError> {
    state.user_service.delete_user(&id, actor.as_str()).await?;
    Ok(ApiResponse::<()>::message("User deleted successfully").into_http())
}

#[get("/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[get("/health/ready")]
pub async fn health_check_ready(state: web::Data<Arc<AppState>>) -> HttpResponse {
    let db_health = match &state.db {
        Some(db) => db.health_check().await,
        None => Ok(()),
    };

    let status = if db_health.is_ok() {
        "ready"
    } else {
        "not_ready"
    };

    let response = serde_json::json!({
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
        "dependencies": {
            "mongodb": match (&state.db, &db_health) {
                (None, _) => "not_configured",
                (Some(_), Ok(())) => "ok",
                (Some(_), Err(_)) => "error",
            }
        }
    });

    if db_health.is_ok() {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

#[get("/health/live")]
pub async fn health_check_live() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
