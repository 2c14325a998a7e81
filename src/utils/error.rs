// Error handling utilities
// Author: Gabriel Demetrios Lafis

use thiserror::Error;

use crate::api::ApiError;
use crate::data::DataError;
use crate::services::ServiceError;
use crate::storage::StoreError;

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Data error: {0}")]
    Data(#[from] DataError),
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for AppError
pub type AppResult<T> = Result<T, AppError>;
