use actix_web::http::StatusCode;
use actix_web::{get, web, HttpResponse, ResponseError};
use chrono::Utc;
use serde_json::json;

use crate::model::validation_messages;
use common::DbError;

pub mod articles;
pub mod categories;
pub mod dashboard;
pub mod networks;
pub mod notifications;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Validation failed")]
    Validation(#[from] validator::ValidationErrors),
    #[error("{0}")]
    Conflict(String),
    #[error("Database error: {0}")]
    Database(#[from] DbError),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Database(error) => database_status_code(error),
            ApiError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::NotFound(entity) => HttpResponse::NotFound()
                .json(json!({"success": false, "message": format!("{entity} not found")})),
            ApiError::Validation(errors) => HttpResponse::BadRequest().json(json!({
                "success": false,
                "message": "Validation failed",
                "errors": validation_messages(errors),
            })),
            ApiError::Conflict(message) => HttpResponse::Conflict()
                .json(json!({"success": false, "message": message})),
            ApiError::Database(error) => database_error_response(error),
            ApiError::Unexpected(error) => {
                tracing::error!("Unhandled error: {error}");
                HttpResponse::InternalServerError()
                    .json(json!({"success": false, "message": "Internal server error"}))
            }
        }
    }
}

fn database_status_code(error: &DbError) -> StatusCode {
    match error {
        DbError::RowNotFound => StatusCode::NOT_FOUND,
        DbError::Database(db_error) if db_error.is_unique_violation() => StatusCode::CONFLICT,
        DbError::Database(db_error) if db_error.is_foreign_key_violation() => {
            StatusCode::NOT_FOUND
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn database_error_response(error: &DbError) -> HttpResponse {
    match database_status_code(error) {
        StatusCode::NOT_FOUND => HttpResponse::NotFound()
            .json(json!({"success": false, "message": "Record not found"})),
        StatusCode::CONFLICT => HttpResponse::Conflict().json(
            json!({"success": false, "message": "A record with this value already exists"}),
        ),
        _ => {
            tracing::error!("Database error: {error}");
            HttpResponse::InternalServerError()
                .json(json!({"success": false, "message": "Internal server error"}))
        }
    }
}

/// Liveness probe.
#[get("/health")]
#[tracing::instrument]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({"status": "ok", "timestamp": Utc::now()}))
}

/// Envelope 404 for unknown API routes.
pub async fn route_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({"success": false, "message": "Route not found"}))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(articles::configure)
        .configure(categories::configure)
        .configure(networks::configure)
        .configure(notifications::configure)
        .configure(dashboard::configure);
}
