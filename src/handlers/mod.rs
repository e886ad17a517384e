pub mod answer_handler;
pub mod attempt_handler;
pub mod option_handler;
pub mod question_handler;
pub mod quiz_handler;
pub mod user_handler;
pub mod webhook_handler;

use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError},
    web, HttpRequest,
};

use crate::errors::AppError;

pub use user_handler::{
    create_user, delete_user, get_all_users, get_user, health_check, health_check_live,
    health_check_ready, update_user,
};

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::ValidationError(format!("Invalid request body: {}", err)).into()
}

fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::ValidationError(format!("Invalid query string: {}", err)).into()
}

fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::ValidationError(format!("Invalid path: {}", err)).into()
}

/// Registers every route plus extractor error handlers that answer in the
/// standard envelope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(health_check)
        .service(health_check_ready)
        .service(health_check_live)
        .service(quiz_handler::list_quizzes)
        .service(quiz_handler::create_quiz)
        .service(quiz_handler::get_quiz)
        .service(quiz_handler::update_quiz)
        .service(quiz_handler::delete_quiz)
        .service(quiz_handler::list_quiz_questions)
        .service(quiz_handler::add_quiz_question)
        .service(attempt_handler::start_attempt)
        .service(attempt_handler::attempt_status)
        .service(attempt_handler::complete_attempt)
        .service(question_handler::list_questions)
        .service(question_handler::get_question)
        .service(question_handler::update_question)
        .service(question_handler::delete_question)
        .service(question_handler::list_question_options)
        .service(question_handler::add_question_option)
        .service(question_handler::list_question_answers)
        .service(option_handler::list_options)
        .service(option_handler::get_option)
        .service(option_handler::update_option)
        .service(option_handler::delete_option)
        .service(answer_handler::list_answers)
        .service(answer_handler::submit_answer)
        .service(answer_handler::get_answer)
        .service(answer_handler::update_answer)
        .service(answer_handler::delete_answer)
        .service(get_all_users)
        .service(create_user)
        .service(get_user)
        .service(update_user)
        .service(delete_user)
        .service(webhook_handler::quiz_activation);
}
