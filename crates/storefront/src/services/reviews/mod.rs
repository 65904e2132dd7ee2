//! Review service.
//!
//! Every mutation is load, apply, save. The save is guarded by the product's
//! version, so two writers racing on the same product cannot lose each
//! other's reviews: the loser gets `ReviewError::Conflict` and may retry.

mod error;

pub use error::ReviewError;

use chrono::Utc;
use tracing::instrument;

use emporium_core::{Product, ProductId, ReviewRating, UserId};

use crate::db::ProductRepository;
use crate::models::CurrentUser;

/// Adds and removes product reviews.
pub struct ReviewService<'a> {
    products: &'a dyn ProductRepository,
}

impl<'a> ReviewService<'a> {
    /// Create a new review service.
    #[must_use]
    pub const fn new(products: &'a dyn ProductRepository) -> Self {
        Self { products }
    }

    /// Add `reviewer`'s review to a product.
    ///
    /// The rating is validated before the product is loaded.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::InvalidRating` if `rating` is outside 1 to 5.
    /// Returns `ReviewError::ProductNotFound` if the product does not exist.
    /// Returns `ReviewError::AlreadyReviewed` if the user already has a review.
    /// Returns `ReviewError::Conflict` if the product changed concurrently.
    #[instrument(skip(self, reviewer, comment), fields(user_id = %reviewer.id))]
    pub async fn add_review(
        &self,
        product_id: ProductId,
        reviewer: &CurrentUser,
        rating: i64,
        comment: String,
    ) -> Result<Product, ReviewError> {
        let rating = ReviewRating::new(rating)?;

        let mut product = self.products.load_by_id(product_id).await?;
        product.add_review(reviewer.as_author(), rating, comment, Utc::now())?;
        let saved = self.products.save(product).await?;

        tracing::info!(
            rating = saved.rating(),
            num_reviews = saved.num_reviews(),
            "Review added"
        );

        Ok(saved)
    }

    /// Remove `user_id`'s review from a product.
    ///
    /// Succeeds even if nothing was removed. When the product has exactly one
    /// review, that review is removed whoever wrote it.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::ProductNotFound` if the product does not exist.
    /// Returns `ReviewError::Conflict` if the product changed concurrently.
    #[instrument(skip(self))]
    pub async fn remove_review(
        &self,
        product_id: ProductId,
        user_id: UserId,
    ) -> Result<Product, ReviewError> {
        let mut product = self.products.load_by_id(product_id).await?;

        let removed = product.remove_review(user_id);
        if removed == 0 {
            tracing::debug!("No review to remove");
            return Ok(product);
        }

        let saved = self.products.save(product).await?;

        tracing::info!(
            removed,
            rating = saved.rating(),
            num_reviews = saved.num_reviews(),
            "Review removed"
        );

        Ok(saved)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use emporium_core::ProductDetails;

    use super::*;
    use crate::db::MemoryProductRepository;

    fn user(id: i32, name: &str) -> CurrentUser {
        CurrentUser {
            id: UserId::new(id),
            name: name.to_owned(),
            is_admin: false,
        }
    }

    async fn repo_with_product() -> (MemoryProductRepository, ProductId) {
        let repo = MemoryProductRepository::new();
        let product = repo.insert(ProductDetails::placeholder()).await.unwrap();
        (repo, product.id())
    }

    #[tokio::test]
    async fn test_add_then_remove_keeps_stats_consistent() {
        let (repo, id) = repo_with_product().await;
        let service = ReviewService::new(&repo);
        let (a, b) = (user(1, "Ann"), user(2, "Bob"));

        service.add_review(id, &a, 4, "Good".into()).await.unwrap();
        let both = service.add_review(id, &b, 2, "Meh".into()).await.unwrap();
        assert_eq!(both.num_reviews(), 2);
        assert!((both.rating() - 3.0).abs() < f64::EPSILON);

        let after = service.remove_review(id, b.id).await.unwrap();
        assert_eq!(after.num_reviews(), 1);
        assert_eq!(after.reviews()[0].user_id, a.id);
        assert!((after.rating() - 4.0).abs() < f64::EPSILON);

        let stored = repo.load_by_id(id).await.unwrap();
        assert_eq!(stored, after);
    }

    #[tokio::test]
    async fn test_duplicate_review_rejected() {
        let (repo, id) = repo_with_product().await;
        let service = ReviewService::new(&repo);
        let a = user(1, "Ann");

        service.add_review(id, &a, 5, String::new()).await.unwrap();
        let err = service.add_review(id, &a, 1, String::new()).await.unwrap_err();

        assert!(matches!(err, ReviewError::AlreadyReviewed(_)));
        assert_eq!(repo.load_by_id(id).await.unwrap().num_reviews(), 1);
    }

    #[tokio::test]
    async fn test_invalid_rating_checked_before_lookup() {
        let repo = MemoryProductRepository::new();
        let service = ReviewService::new(&repo);

        let err = service
            .add_review(ProductId::new(99), &user(1, "Ann"), 6, String::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ReviewError::InvalidRating(_)));
    }

    #[tokio::test]
    async fn test_missing_product() {
        let repo = MemoryProductRepository::new();
        let service = ReviewService::new(&repo);

        let err = service
            .add_review(ProductId::new(99), &user(1, "Ann"), 3, String::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewError::ProductNotFound));

        let err = service
            .remove_review(ProductId::new(99), UserId::new(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewError::ProductNotFound));
    }

    #[tokio::test]
    async fn test_remove_without_reviews_is_noop() {
        let (repo, id) = repo_with_product().await;
        let service = ReviewService::new(&repo);

        let product = service.remove_review(id, UserId::new(1)).await.unwrap();

        assert_eq!(product.num_reviews(), 0);
        assert_eq!(product.version(), 0);
    }

    #[tokio::test]
    async fn test_remove_last_review_by_other_user() {
        let (repo, id) = repo_with_product().await;
        let service = ReviewService::new(&repo);

        service.add_review(id, &user(1, "Ann"), 5, String::new()).await.unwrap();
        let product = service.remove_review(id, UserId::new(2)).await.unwrap();

        assert!(product.reviews().is_empty());
        assert_eq!(product.num_reviews(), 0);
        assert!(product.rating().abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_stale_save_surfaces_conflict() {
        let (repo, id) = repo_with_product().await;

        // Another writer saves between our load and save.
        let stale = repo.load_by_id(id).await.unwrap();
        ReviewService::new(&repo)
            .add_review(id, &user(1, "Ann"), 5, String::new())
            .await
            .unwrap();

        let err = ReviewError::from(repo.save(stale).await.unwrap_err());
        assert!(matches!(err, ReviewError::Conflict));
    }
}
