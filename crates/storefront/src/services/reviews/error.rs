//! Review error types.

use thiserror::Error;

use emporium_core::{AlreadyReviewed, RatingError};

use crate::db::RepositoryError;

/// Errors that can occur while adding or removing reviews.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// Rating outside 1 to 5.
    #[error("invalid rating: {0}")]
    InvalidRating(#[from] RatingError),

    /// The product does not exist.
    #[error("product not found")]
    ProductNotFound,

    /// The user already reviewed this product.
    #[error(transparent)]
    AlreadyReviewed(#[from] AlreadyReviewed),

    /// The product changed between load and save.
    #[error("product was modified concurrently, please retry")]
    Conflict,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ReviewError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::ProductNotFound,
            RepositoryError::Conflict(_) => Self::Conflict,
            other => Self::Repository(other),
        }
    }
}
