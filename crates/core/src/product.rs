//! The product document.
//!
//! A [`Product`] owns its reviews. The `rating` and `numReviews` fields are
//! derived from those reviews and are never stored independently: every
//! constructor and every review mutation recomputes them through
//! [`ReviewStats::from_reviews`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::review::{Review, ReviewStats};
use crate::types::{Price, ProductId};

/// Largest stock count a product can hold.
pub const MAX_STOCK: u32 = i32::MAX.unsigned_abs();

/// Errors from validating [`ProductDetails`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetailsError {
    #[error("product name must not be blank")]
    BlankName,

    #[error("stock count {0} exceeds the maximum of {MAX_STOCK}")]
    StockOutOfRange(u32),
}

/// The editable part of a product.
///
/// This is what admins send when updating a product and what the seed file
/// contains. It deliberately has no rating fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub count_in_stock: u32,
}

impl ProductDetails {
    /// Details for a freshly created product, to be filled in by an admin.
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            name: "Enter Name".to_owned(),
            image: String::new(),
            category: "Enter Category".to_owned(),
            description: "Enter Description".to_owned(),
            price: Price::ZERO,
            count_in_stock: 0,
        }
    }

    /// Check the details can be stored.
    ///
    /// # Errors
    ///
    /// Returns `DetailsError::BlankName` if the name is empty or whitespace,
    /// or `DetailsError::StockOutOfRange` if the stock count exceeds
    /// [`MAX_STOCK`].
    pub fn validate(&self) -> Result<(), DetailsError> {
        if self.name.trim().is_empty() {
            return Err(DetailsError::BlankName);
        }
        if self.count_in_stock > MAX_STOCK {
            return Err(DetailsError::StockOutOfRange(self.count_in_stock));
        }
        Ok(())
    }
}

/// A catalog product with its embedded reviews.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    id: ProductId,
    #[serde(flatten)]
    details: ProductDetails,
    pub(crate) reviews: Vec<Review>,
    #[serde(flatten)]
    pub(crate) stats: ReviewStats,
    #[serde(skip)]
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    /// Rebuild a product from stored parts.
    ///
    /// Review statistics are recomputed from `reviews`; any denormalized
    /// rating a storage backend keeps is not trusted here.
    #[must_use]
    pub fn from_storage(
        id: ProductId,
        details: ProductDetails,
        reviews: Vec<Review>,
        version: i64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let stats = ReviewStats::from_reviews(&reviews);
        Self {
            id,
            details,
            reviews,
            stats,
            version,
            created_at,
            updated_at,
        }
    }

    /// Create a product that has never been saved.
    #[must_use]
    pub fn create(id: ProductId, details: ProductDetails, now: DateTime<Utc>) -> Self {
        Self::from_storage(id, details, Vec::new(), 0, now, now)
    }

    /// Unique product ID.
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.id
    }

    /// Editable details (name, price, stock...).
    #[must_use]
    pub const fn details(&self) -> &ProductDetails {
        &self.details
    }

    /// Product name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.details.name
    }

    /// Current price.
    #[must_use]
    pub const fn price(&self) -> Price {
        self.details.price
    }

    /// Reviews in creation order.
    #[must_use]
    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    /// Derived rating statistics.
    #[must_use]
    pub const fn stats(&self) -> ReviewStats {
        self.stats
    }

    /// Mean review rating, or 0 without reviews.
    #[must_use]
    pub const fn rating(&self) -> f64 {
        self.stats.rating()
    }

    /// Number of reviews.
    #[must_use]
    pub const fn num_reviews(&self) -> u32 {
        self.stats.num_reviews()
    }

    /// Optimistic concurrency token, bumped on every save.
    #[must_use]
    pub const fn version(&self) -> i64 {
        self.version
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replace the editable details, keeping reviews and statistics.
    pub fn update_details(&mut self, details: ProductDetails) {
        self.details = details;
    }

    /// The state a repository persists when saving this product.
    ///
    /// Bumps the version and the update timestamp. Repositories call this
    /// only after confirming the stored version still equals
    /// [`version`](Self::version).
    #[must_use]
    pub fn into_saved(mut self, now: DateTime<Utc>) -> Self {
        self.version += 1;
        self.updated_at = now;
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::review::ReviewAuthor;
    use crate::types::{ReviewRating, UserId};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn review(user: i32, rating: i64) -> Review {
        Review::new(
            ReviewAuthor::new(UserId::new(user), format!("user {user}")),
            ReviewRating::new(rating).unwrap(),
            String::new(),
            now(),
        )
    }

    #[test]
    fn test_from_storage_recomputes_stats() {
        let product = Product::from_storage(
            ProductId::new(1),
            ProductDetails::placeholder(),
            vec![review(1, 5), review(2, 2)],
            3,
            now(),
            now(),
        );

        assert_eq!(product.num_reviews(), 2);
        assert!((product.rating() - 3.5).abs() < f64::EPSILON);
        assert_eq!(product.version(), 3);
    }

    #[test]
    fn test_into_saved_bumps_version() {
        let product = Product::create(ProductId::new(1), ProductDetails::placeholder(), now());
        let later = now() + chrono::Duration::minutes(5);
        let saved = product.into_saved(later);

        assert_eq!(saved.version(), 1);
        assert_eq!(saved.updated_at(), later);
        assert_eq!(saved.created_at(), now());
    }

    #[test]
    fn test_update_details_keeps_reviews() {
        let mut product = Product::from_storage(
            ProductId::new(1),
            ProductDetails::placeholder(),
            vec![review(1, 4)],
            0,
            now(),
            now(),
        );

        let mut details = ProductDetails::placeholder();
        details.name = "Airpods Wireless Bluetooth Headphones".to_owned();
        product.update_details(details);

        assert_eq!(product.name(), "Airpods Wireless Bluetooth Headphones");
        assert_eq!(product.num_reviews(), 1);
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let mut details = ProductDetails::placeholder();
        details.name = "   ".to_owned();
        assert_eq!(details.validate(), Err(DetailsError::BlankName));
    }

    #[test]
    fn test_validate_rejects_stock_beyond_storage_range() {
        let mut details = ProductDetails::placeholder();
        details.count_in_stock = 3_000_000_000;
        assert_eq!(
            details.validate(),
            Err(DetailsError::StockOutOfRange(3_000_000_000))
        );

        details.count_in_stock = MAX_STOCK;
        assert_eq!(details.validate(), Ok(()));
    }

    #[test]
    fn test_json_shape() {
        let product = Product::from_storage(
            ProductId::new(7),
            ProductDetails::placeholder(),
            vec![review(1, 4)],
            2,
            now(),
            now(),
        );

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["name"], "Enter Name");
        assert_eq!(json["countInStock"], 0);
        assert_eq!(json["numReviews"], 1);
        assert_eq!(json["rating"], 4.0);
        assert!(json.get("version").is_none());
        assert_eq!(json["reviews"][0]["userId"], 1);
    }
}
