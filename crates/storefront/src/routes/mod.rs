//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                    - Liveness check
//! GET    /health/ready              - Readiness check (storage reachable)
//!
//! # Catalog
//! GET    /api/products              - Keyword search, sort and pagination
//! GET    /api/products/top          - Top rated products
//! GET    /api/products/{id}         - Product detail
//!
//! # Catalog management (admin)
//! POST   /api/products              - Create placeholder product
//! PUT    /api/products/{id}         - Update product details
//! DELETE /api/products/{id}         - Delete product
//!
//! # Reviews (requires auth, rate limited)
//! POST   /api/products/{id}/reviews - Add the caller's review
//! DELETE /api/products/{id}/reviews - Remove the caller's review
//! ```

pub mod products;
pub mod reviews;

use axum::{
    Json, Router,
    extract::{FromRequest, Request},
    routing::{get, post},
};
use serde::de::DeserializeOwned;

use emporium_core::ProductId;

use crate::error::{AppError, PRODUCT_NOT_FOUND};
use crate::middleware::review_rate_limiter;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/top", get(products::top))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
        .merge(review_routes())
}

/// Create the review routes router.
pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}/reviews",
            post(reviews::create).delete(reviews::delete),
        )
        .layer(review_rate_limiter())
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new().nest("/api/products", product_routes())
}

/// Parse a product ID path segment.
///
/// IDs that cannot name a product are reported the same way as IDs that
/// name no product.
fn product_id(raw: &str) -> Result<ProductId, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound(PRODUCT_NOT_FOUND.to_string()))
}

/// JSON body extractor that rejects with an `AppError` message body.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}
