use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;
use log::error;
use crate::db::StoreError;
use crate::utils::validation::ValidationIssue;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Validation(Vec<ValidationIssue>),
    NotFound(String),
    DatabaseError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct ValidationErrorResponse<'a> {
    errors: &'a [ValidationIssue],
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::Validation(issues) => write!(f, "Validation failed: {} issue(s)", issues.len()),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(ErrorResponse { error: msg.clone() }),
            AppError::Validation(issues) => HttpResponse::BadRequest().json(ValidationErrorResponse { errors: issues }),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(ErrorResponse { error: msg.clone() }),
            // Storage details stay in the logs.
            AppError::DatabaseError(_) => HttpResponse::InternalServerError().json(ErrorResponse { error: "Database error".to_string() }),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => AppError::NotFound(msg),
            StoreError::Database(msg) => {
                error!("Database error: {}", msg);
                AppError::DatabaseError(msg)
            }
        }
    }
}

impl From<Vec<ValidationIssue>> for AppError {
    fn from(issues: Vec<ValidationIssue>) -> Self {
        AppError::Validation(issues)
    }
}
