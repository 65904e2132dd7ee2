//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use emporium_core::{CatalogQuery, Product, ProductDetails};

use super::{JsonBody, product_id};
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::services::{CatalogService, ProductAdminService};
use crate::state::AppState;

/// Catalog listing query parameters.
///
/// Values are kept as raw strings: unknown filters and malformed page
/// numbers fall back to defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogParams {
    pub keyword: Option<String>,
    pub filter: Option<String>,
    pub page_number: Option<String>,
}

/// One page of catalog results.
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub products: Vec<Product>,
    pub page: u32,
    pub pages: u64,
}

/// List products.
///
/// GET /api/products?keyword=&filter=&pageNumber=
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> Result<Json<CatalogResponse>> {
    let query = CatalogQuery::from_params(
        params.keyword.as_deref(),
        params.filter.as_deref(),
        params.page_number.as_deref(),
    );

    let page = CatalogService::new(state.products()).query(&query).await?;

    Ok(Json(CatalogResponse {
        products: page.items,
        page: page.page,
        pages: page.total_pages,
    }))
}

/// Top rated products.
///
/// GET /api/products/top
#[instrument(skip(state))]
pub async fn top(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = CatalogService::new(state.products()).top_rated().await?;
    Ok(Json(products))
}

/// Product detail.
///
/// GET /api/products/{id}
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Product>> {
    let product = CatalogService::new(state.products())
        .product(product_id(&id)?)
        .await?;
    Ok(Json(product))
}

/// Create a placeholder product.
///
/// POST /api/products
#[instrument(skip(state, admin), fields(user_id = %admin.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<(StatusCode, Json<Product>)> {
    let product = ProductAdminService::new(state.products()).create().await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product's details.
///
/// PUT /api/products/{id}
#[instrument(skip(state, admin, details), fields(user_id = %admin.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    JsonBody(details): JsonBody<ProductDetails>,
) -> Result<Json<Product>> {
    let product = ProductAdminService::new(state.products())
        .update(product_id(&id)?, details)
        .await?;
    Ok(Json(product))
}

/// Delete a product.
///
/// DELETE /api/products/{id}
#[instrument(skip(state, admin), fields(user_id = %admin.id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    ProductAdminService::new(state.products())
        .delete(product_id(&id)?)
        .await?;
    Ok(Json(serde_json::json!({ "message": "Product removed" })))
}
