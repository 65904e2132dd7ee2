//! `PostgreSQL` product repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use emporium_core::{
    KeywordFilter, PageWindow, Price, Product, ProductDetails, ProductId, Review, SortFilter,
};

use super::{ProductRepository, RepositoryError};

const COLUMNS: &str = "id, name, image, category, description, price, count_in_stock, \
                       reviews, version, created_at, updated_at";

/// Keyword predicate shared by the listing and count queries. `$1` is the
/// escaped `ILIKE` pattern, or NULL to match everything.
const KEYWORD_PREDICATE: &str = "($1::text IS NULL OR name ILIKE $1 ESCAPE '\\')";

/// Product repository backed by the `catalog.product` table.
#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let found: Option<i32> = sqlx::query_scalar("SELECT id FROM catalog.product WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    image: String,
    category: String,
    description: String,
    price: Decimal,
    count_in_stock: i32,
    reviews: Json<Vec<Review>>,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("product {}: {e}", row.id))
        })?;
        let count_in_stock = u32::try_from(row.count_in_stock).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "product {}: negative stock {}",
                row.id, row.count_in_stock
            ))
        })?;

        let details = ProductDetails {
            name: row.name,
            image: row.image,
            category: row.category,
            description: row.description,
            price,
            count_in_stock,
        };

        Ok(Self::from_storage(
            ProductId::new(row.id),
            details,
            row.reviews.0,
            row.version,
            row.created_at,
            row.updated_at,
        ))
    }
}

/// Build an `ILIKE` pattern matching `keyword` literally anywhere in a name.
fn like_pattern(keyword: &KeywordFilter) -> Option<String> {
    keyword.keyword().map(|k| {
        let escaped = k
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        format!("%{escaped}%")
    })
}

/// `ORDER BY` clause for a sort filter. Ties fall back to creation order.
const fn order_by(sort: SortFilter) -> &'static str {
    match sort {
        SortFilter::Unsorted => "id ASC",
        SortFilter::PriceLowToHigh => "price ASC, id ASC",
        SortFilter::PriceHighToLow => "price DESC, id ASC",
        SortFilter::TopReviewed => "rating DESC, id ASC",
    }
}

/// Stock as the `INTEGER` column type. Validated details always fit.
fn stock_param(details: &ProductDetails) -> Result<i32, RepositoryError> {
    i32::try_from(details.count_in_stock).map_err(|_| {
        RepositoryError::DataCorruption(format!(
            "unvalidated stock count {}",
            details.count_in_stock
        ))
    })
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_matching(
        &self,
        keyword: &KeywordFilter,
        sort: SortFilter,
        window: PageWindow,
    ) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM catalog.product WHERE {KEYWORD_PREDICATE} \
             ORDER BY {} LIMIT $2 OFFSET $3",
            order_by(sort)
        );

        let rows: Vec<ProductRow> = sqlx::query_as(&sql)
            .bind(like_pattern(keyword))
            .bind(i64::from(window.limit))
            .bind(i64::try_from(window.offset).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    async fn count_matching(&self, keyword: &KeywordFilter) -> Result<u64, RepositoryError> {
        let sql = format!("SELECT COUNT(*) FROM catalog.product WHERE {KEYWORD_PREDICATE}");

        let count: i64 = sqlx::query_scalar(&sql)
            .bind(like_pattern(keyword))
            .fetch_one(&self.pool)
            .await?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn load_by_id(&self, id: ProductId) -> Result<Product, RepositoryError> {
        let sql = format!("SELECT {COLUMNS} FROM catalog.product WHERE id = $1");

        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    async fn save(&self, product: Product) -> Result<Product, RepositoryError> {
        let details = product.details();
        let stats = product.stats();
        let sql = format!(
            "UPDATE catalog.product \
             SET name = $2, image = $3, category = $4, description = $5, price = $6, \
                 count_in_stock = $7, reviews = $8, rating = $9, num_reviews = $10, \
                 version = version + 1, updated_at = now() \
             WHERE id = $1 AND version = $11 \
             RETURNING {COLUMNS}"
        );

        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(product.id())
            .bind(&details.name)
            .bind(&details.image)
            .bind(&details.category)
            .bind(&details.description)
            .bind(details.price.amount())
            .bind(stock_param(details)?)
            .bind(Json(product.reviews()))
            .bind(stats.rating())
            .bind(i32::try_from(stats.num_reviews()).unwrap_or(i32::MAX))
            .bind(product.version())
            .fetch_optional(&self.pool)
            .await?;

        if let Some(row) = row {
            return row.try_into();
        }

        // Nothing updated: either the product is gone or its version moved on.
        if self.exists(product.id()).await? {
            return Err(RepositoryError::Conflict(format!(
                "product {} was modified concurrently",
                product.id()
            )));
        }
        Err(RepositoryError::NotFound)
    }

    async fn insert(&self, details: ProductDetails) -> Result<Product, RepositoryError> {
        let sql = format!(
            "INSERT INTO catalog.product (name, image, category, description, price, count_in_stock) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );

        let row: ProductRow = sqlx::query_as(&sql)
            .bind(&details.name)
            .bind(&details.image)
            .bind(&details.category)
            .bind(&details.description)
            .bind(details.price.amount())
            .bind(stock_param(&details)?)
            .fetch_one(&self.pool)
            .await?;

        row.try_into()
    }

    async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM catalog.product WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        let filter = KeywordFilter::new(Some("100%_off\\"));
        assert_eq!(
            like_pattern(&filter).as_deref(),
            Some("%100\\%\\_off\\\\%")
        );
    }

    #[test]
    fn test_like_pattern_empty_matches_all() {
        assert_eq!(like_pattern(&KeywordFilter::new(Some(""))), None);
        assert_eq!(like_pattern(&KeywordFilter::all()), None);
    }

    #[test]
    fn test_like_pattern_keeps_whitespace() {
        assert_eq!(
            like_pattern(&KeywordFilter::new(Some(" "))).as_deref(),
            Some("% %")
        );
        assert_eq!(
            like_pattern(&KeywordFilter::new(Some("blue "))).as_deref(),
            Some("%blue %")
        );
    }

    #[test]
    fn test_stock_param_fits_validated_details() {
        let mut details = ProductDetails::placeholder();
        details.count_in_stock = emporium_core::MAX_STOCK;
        assert!(matches!(stock_param(&details), Ok(i32::MAX)));
    }

    #[test]
    fn test_order_by_breaks_ties_by_id() {
        for sort in [
            SortFilter::Unsorted,
            SortFilter::PriceLowToHigh,
            SortFilter::PriceHighToLow,
            SortFilter::TopReviewed,
        ] {
            assert!(order_by(sort).ends_with("id ASC"));
        }
        assert_eq!(order_by(SortFilter::TopReviewed), "rating DESC, id ASC");
    }
}
