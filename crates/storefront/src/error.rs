//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//! Error bodies are JSON objects of the form `{"message": "..."}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::{CatalogError, ProductAdminError, ReviewError};

/// Message returned when a product ID does not resolve.
pub const PRODUCT_NOT_FOUND: &str = "Product Not Found";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Catalog query failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Review operation failed.
    #[error("Review error: {0}")]
    Review(#[from] ReviewError),

    /// Catalog management failed.
    #[error("Admin error: {0}")]
    Admin(#[from] ProductAdminError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User lacks permission.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Whether this error indicates a server-side failure.
    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Catalog(CatalogError::Repository(_))
                | Self::Review(ReviewError::Repository(_))
                | Self::Admin(ProductAdminError::Repository(_))
        )
    }

    /// HTTP status and client-facing message.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::Catalog(CatalogError::ProductNotFound)
            | Self::Review(ReviewError::ProductNotFound)
            | Self::Admin(ProductAdminError::ProductNotFound) => {
                (StatusCode::NOT_FOUND, PRODUCT_NOT_FOUND.to_string())
            }
            Self::Review(ReviewError::AlreadyReviewed(_)) => (
                StatusCode::BAD_REQUEST,
                "Product Already Reviewed".to_string(),
            ),
            Self::Review(err @ ReviewError::InvalidRating(_)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Admin(err @ ProductAdminError::InvalidDetails(_)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Review(err @ ReviewError::Conflict) => (StatusCode::CONFLICT, err.to_string()),
            Self::Admin(err @ ProductAdminError::Conflict) => {
                (StatusCode::CONFLICT, err.to_string())
            }
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            // Don't expose internal error details to clients
            Self::Catalog(CatalogError::Repository(_))
            | Self::Review(ReviewError::Repository(_))
            | Self::Admin(ProductAdminError::Repository(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let (status, message) = self.status_and_message();
        (status, Json(json!({ "message": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
