//! Catalog queries.

use thiserror::Error;
use tracing::instrument;

use emporium_core::{
    CatalogPage, CatalogQuery, KeywordFilter, PageWindow, Product, ProductId, SortFilter,
    TOP_RATED_LIMIT,
};

use crate::db::{ProductRepository, RepositoryError};

/// Errors from catalog queries.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The requested product does not exist.
    #[error("product not found")]
    ProductNotFound,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Read-only access to the catalog.
pub struct CatalogService<'a> {
    products: &'a dyn ProductRepository,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(products: &'a dyn ProductRepository) -> Self {
        Self { products }
    }

    /// Run a paginated catalog query.
    ///
    /// A page past the end yields an empty list; `total_pages` is still
    /// reported for the full match set.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the backend fails.
    #[instrument(skip(self, query), fields(keyword = ?query.keyword.keyword(), sort = query.sort.as_str(), page = query.page.get()))]
    pub async fn query(&self, query: &CatalogQuery) -> Result<CatalogPage<Product>, CatalogError> {
        let count = self.products.count_matching(&query.keyword).await?;
        let items = self
            .products
            .find_matching(&query.keyword, query.sort, query.page.window())
            .await?;

        tracing::debug!(count, returned = items.len(), "Catalog query");

        Ok(CatalogPage::new(items, query.page, count))
    }

    /// The highest rated products, best first.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the backend fails.
    #[instrument(skip(self))]
    pub async fn top_rated(&self) -> Result<Vec<Product>, CatalogError> {
        let window = PageWindow {
            offset: 0,
            limit: TOP_RATED_LIMIT,
        };
        let products = self
            .products
            .find_matching(&KeywordFilter::all(), SortFilter::TopReviewed, window)
            .await?;
        Ok(products)
    }

    /// Look up a single product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` if no product has this ID.
    #[instrument(skip(self))]
    pub async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.products.load_by_id(id).await.map_err(|e| match e {
            RepositoryError::NotFound => CatalogError::ProductNotFound,
            other => CatalogError::Repository(other),
        })
    }
}
