//! Catalog management for administrators.

use thiserror::Error;
use tracing::instrument;

use emporium_core::{DetailsError, Product, ProductDetails, ProductId};

use crate::db::{ProductRepository, RepositoryError};

/// Errors from catalog management.
#[derive(Debug, Error)]
pub enum ProductAdminError {
    /// Submitted details are invalid.
    #[error("invalid product: {0}")]
    InvalidDetails(#[from] DetailsError),

    /// The product does not exist.
    #[error("product not found")]
    ProductNotFound,

    /// The product changed between load and save.
    #[error("product was modified concurrently, please retry")]
    Conflict,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ProductAdminError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::ProductNotFound,
            RepositoryError::Conflict(_) => Self::Conflict,
            other => Self::Repository(other),
        }
    }
}

/// Creates, edits and deletes catalog products.
pub struct ProductAdminService<'a> {
    products: &'a dyn ProductRepository,
}

impl<'a> ProductAdminService<'a> {
    /// Create a new admin service.
    #[must_use]
    pub const fn new(products: &'a dyn ProductRepository) -> Self {
        Self { products }
    }

    /// Create a placeholder product for the administrator to fill in.
    ///
    /// # Errors
    ///
    /// Returns `ProductAdminError::Repository` if the backend fails.
    #[instrument(skip(self))]
    pub async fn create(&self) -> Result<Product, ProductAdminError> {
        let product = self.products.insert(ProductDetails::placeholder()).await?;
        tracing::info!(product_id = %product.id(), "Product created");
        Ok(product)
    }

    /// Replace a product's details. Reviews and rating are untouched.
    ///
    /// # Errors
    ///
    /// Returns `ProductAdminError::InvalidDetails` if the details fail validation.
    /// Returns `ProductAdminError::ProductNotFound` if the product does not exist.
    /// Returns `ProductAdminError::Conflict` if the product changed concurrently.
    #[instrument(skip(self, details))]
    pub async fn update(
        &self,
        id: ProductId,
        details: ProductDetails,
    ) -> Result<Product, ProductAdminError> {
        details.validate()?;

        let mut product = self.products.load_by_id(id).await?;
        product.update_details(details);
        let saved = self.products.save(product).await?;

        tracing::info!(version = saved.version(), "Product updated");
        Ok(saved)
    }

    /// Delete a product together with its reviews.
    ///
    /// # Errors
    ///
    /// Returns `ProductAdminError::ProductNotFound` if the product does not exist.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ProductId) -> Result<(), ProductAdminError> {
        self.products.delete(id).await?;
        tracing::info!("Product deleted");
        Ok(())
    }
}
