//! Review route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{JsonBody, product_id};
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::services::ReviewService;
use crate::state::AppState;

/// Review submission body.
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub rating: i64,
    #[serde(default)]
    pub comment: String,
}

/// Confirmation returned by review mutations.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Add the caller's review.
///
/// POST /api/products/{id}/reviews
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<ReviewRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    ReviewService::new(state.products())
        .add_review(product_id(&id)?, &user, body.rating, body.comment)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Review Added",
        }),
    ))
}

/// Remove the caller's review.
///
/// DELETE /api/products/{id}/reviews
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    ReviewService::new(state.products())
        .remove_review(product_id(&id)?, user.id)
        .await?;

    Ok(Json(MessageResponse {
        message: "Review Removed Successfully!",
    }))
}
