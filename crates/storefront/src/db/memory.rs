//! In-memory product repository.
//!
//! Products are kept in insertion order, which doubles as the storage order
//! for unsorted listings. Queries are evaluated with the rules from
//! `emporium_core::catalog`.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use emporium_core::catalog::{select, window};
use emporium_core::{KeywordFilter, PageWindow, Product, ProductDetails, ProductId, SortFilter};

use super::{ProductRepository, RepositoryError};

/// Process-local product storage.
#[derive(Debug, Default)]
pub struct MemoryProductRepository {
    store: RwLock<Store>,
}

#[derive(Debug, Default)]
struct Store {
    products: Vec<Product>,
    last_id: i32,
}

impl MemoryProductRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository holding `products` in the given order.
    ///
    /// New IDs continue after the highest ID present.
    #[must_use]
    pub fn with_products(products: Vec<Product>) -> Self {
        let last_id = products
            .iter()
            .map(|p| p.id().as_i32())
            .max()
            .unwrap_or(0);
        Self {
            store: RwLock::new(Store { products, last_id }),
        }
    }
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn find_matching(
        &self,
        keyword: &KeywordFilter,
        sort: SortFilter,
        page: PageWindow,
    ) -> Result<Vec<Product>, RepositoryError> {
        let store = self.store.read().await;
        let matched = select(&store.products, keyword, sort);
        Ok(window(matched, page).into_iter().cloned().collect())
    }

    async fn count_matching(&self, keyword: &KeywordFilter) -> Result<u64, RepositoryError> {
        let store = self.store.read().await;
        let count = store
            .products
            .iter()
            .filter(|p| keyword.matches(p.name()))
            .count();
        Ok(count as u64)
    }

    async fn load_by_id(&self, id: ProductId) -> Result<Product, RepositoryError> {
        let store = self.store.read().await;
        store
            .products
            .iter()
            .find(|p| p.id() == id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn save(&self, product: Product) -> Result<Product, RepositoryError> {
        let mut store = self.store.write().await;
        let slot = store
            .products
            .iter_mut()
            .find(|p| p.id() == product.id())
            .ok_or(RepositoryError::NotFound)?;

        if slot.version() != product.version() {
            return Err(RepositoryError::Conflict(format!(
                "product {} was modified concurrently",
                product.id()
            )));
        }

        *slot = product.into_saved(Utc::now());
        Ok(slot.clone())
    }

    async fn insert(&self, details: ProductDetails) -> Result<Product, RepositoryError> {
        let mut store = self.store.write().await;
        store.last_id += 1;
        let product = Product::create(ProductId::new(store.last_id), details, Utc::now());
        store.products.push(product.clone());
        Ok(product)
    }

    async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let mut store = self.store.write().await;
        let index = store
            .products
            .iter()
            .position(|p| p.id() == id)
            .ok_or(RepositoryError::NotFound)?;
        store.products.remove(index);
        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
