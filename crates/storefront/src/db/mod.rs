//! Product storage.
//!
//! # Database: `emporium`
//!
//! ## Tables
//!
//! - `catalog.product` - Products with their reviews embedded as JSONB
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p emporium-cli -- migrate
//! ```
//!
//! # Backends
//!
//! - [`PgProductRepository`] - `PostgreSQL`, used in production
//! - [`MemoryProductRepository`] - process-local, used by tests and local development

mod memory;
mod products;

pub use memory::MemoryProductRepository;
pub use products::PgProductRepository;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use emporium_core::{KeywordFilter, PageWindow, Product, ProductDetails, ProductId, SortFilter};

/// Errors returned by product repositories.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// The stored product changed since it was loaded.
    #[error("conflict: {0}")]
    Conflict(String),
}

/// Storage for catalog products.
///
/// Implementations must order ties by creation order so that repeated
/// queries over the same data return the same sequence.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Products whose name matches `keyword`, ordered by `sort`, restricted
    /// to `window`.
    async fn find_matching(
        &self,
        keyword: &KeywordFilter,
        sort: SortFilter,
        window: PageWindow,
    ) -> Result<Vec<Product>, RepositoryError>;

    /// Number of products whose name matches `keyword`.
    async fn count_matching(&self, keyword: &KeywordFilter) -> Result<u64, RepositoryError>;

    /// Load a single product.
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    async fn load_by_id(&self, id: ProductId) -> Result<Product, RepositoryError>;

    /// Persist a product loaded earlier.
    ///
    /// Succeeds only if the stored version still equals `product.version()`;
    /// otherwise returns `RepositoryError::Conflict`. Returns the stored
    /// product with its new version.
    async fn save(&self, product: Product) -> Result<Product, RepositoryError>;

    /// Create a product without reviews.
    async fn insert(&self, details: ProductDetails) -> Result<Product, RepositoryError>;

    /// Delete a product and its reviews.
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    async fn delete(&self, id: ProductId) -> Result<(), RepositoryError>;

    /// Check the backend is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
