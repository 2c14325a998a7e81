// API module for exposing the back office via HTTP
// Author: Gabriel Demetrios Lafis

mod server;
mod routes;
mod handlers;
mod models;

pub use server::*;
pub use routes::*;
pub use handlers::*;
pub use models::*;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::services::ServiceError;

/// Represents an error in the API module
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Service(#[from] ServiceError),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Service(ServiceError::NotFound(_)) | ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Service(ServiceError::Validation(_)) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Service(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("Request failed: {}", self);
        }

        HttpResponse::build(self.status_code()).json(json!({
            "statusCode": self.status_code().as_u16(),
            "message": self.to_string(),
        }))
    }
}
