//! Product reviews and the derived rating statistics.
//!
//! Review mutations only go through [`Product::add_review`] and
//! [`Product::remove_review`]. Both finish by calling
//! [`ReviewStats::from_reviews`], so `rating` and `numReviews` always move
//! together with the review list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::product::Product;
use crate::types::{ReviewRating, UserId};

/// Returned when a user tries to review the same product twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("product already reviewed by user {0}")]
pub struct AlreadyReviewed(pub UserId);

/// Who is writing a review.
///
/// `name` is captured at creation time and never re-synced afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewAuthor {
    pub user_id: UserId,
    pub name: String,
}

impl ReviewAuthor {
    #[must_use]
    pub fn new(user_id: UserId, name: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
        }
    }
}

/// A single review embedded in a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub user_id: UserId,
    pub name: String,
    pub rating: ReviewRating,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl Review {
    #[must_use]
    pub fn new(
        author: ReviewAuthor,
        rating: ReviewRating,
        comment: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: author.user_id,
            name: author.name,
            rating,
            comment,
            created_at,
        }
    }
}

/// Rating statistics derived from a review list.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    rating: f64,
    num_reviews: u32,
}

impl ReviewStats {
    /// Statistics of a product without reviews.
    pub const EMPTY: Self = Self {
        rating: 0.0,
        num_reviews: 0,
    };

    /// Compute the mean rating and review count in one pass.
    ///
    /// The mean is not rounded; an empty slice yields [`EMPTY`](Self::EMPTY).
    #[must_use]
    pub fn from_reviews(reviews: &[Review]) -> Self {
        if reviews.is_empty() {
            return Self::EMPTY;
        }

        let total: u64 = reviews.iter().map(|r| u64::from(r.rating.value())).sum();
        let num_reviews = u32::try_from(reviews.len()).unwrap_or(u32::MAX);

        #[allow(clippy::cast_precision_loss)] // review sums stay far below 2^52
        let rating = total as f64 / f64::from(num_reviews);

        Self {
            rating,
            num_reviews,
        }
    }

    /// Mean rating in `[0, 5]`.
    #[must_use]
    pub const fn rating(&self) -> f64 {
        self.rating
    }

    /// Number of reviews.
    #[must_use]
    pub const fn num_reviews(&self) -> u32 {
        self.num_reviews
    }
}

impl Product {
    /// Whether `user_id` already has a review on this product.
    #[must_use]
    pub fn has_review_from(&self, user_id: UserId) -> bool {
        self.reviews.iter().any(|r| r.user_id == user_id)
    }

    /// Append a review and recompute the statistics.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyReviewed` if the author already reviewed this product.
    /// The product is left untouched in that case.
    pub fn add_review(
        &mut self,
        author: ReviewAuthor,
        rating: ReviewRating,
        comment: String,
        now: DateTime<Utc>,
    ) -> Result<(), AlreadyReviewed> {
        if self.has_review_from(author.user_id) {
            return Err(AlreadyReviewed(author.user_id));
        }

        self.reviews.push(Review::new(author, rating, comment, now));
        self.stats = ReviewStats::from_reviews(&self.reviews);
        Ok(())
    }

    /// Remove `user_id`'s review and recompute the statistics.
    ///
    /// With a single review left, that review is dropped whoever wrote it and
    /// the statistics reset to zero. Without reviews this is a no-op.
    ///
    /// Returns how many reviews were removed.
    pub fn remove_review(&mut self, user_id: UserId) -> usize {
        let before = self.reviews.len();

        match before {
            0 => return 0,
            1 => self.reviews.clear(),
            _ => self.reviews.retain(|r| r.user_id != user_id),
        }

        self.stats = ReviewStats::from_reviews(&self.reviews);
        before - self.reviews.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::product::ProductDetails;
    use crate::types::ProductId;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn product() -> Product {
        Product::create(ProductId::new(1), ProductDetails::placeholder(), now())
    }

    fn author(id: i32) -> ReviewAuthor {
        ReviewAuthor::new(UserId::new(id), format!("User {id}"))
    }

    fn stars(n: i64) -> ReviewRating {
        ReviewRating::new(n).unwrap()
    }

    fn assert_consistent(product: &Product) {
        let reviews = product.reviews();
        assert_eq!(product.num_reviews() as usize, reviews.len());
        if reviews.is_empty() {
            assert_eq!(product.rating(), 0.0);
        } else {
            let mean = reviews
                .iter()
                .map(|r| f64::from(r.rating.value()))
                .sum::<f64>()
                / reviews.len() as f64;
            assert!((product.rating() - mean).abs() < 1e-9);
        }
    }

    #[test]
    fn test_from_reviews_empty() {
        assert_eq!(ReviewStats::from_reviews(&[]), ReviewStats::EMPTY);
    }

    #[test]
    fn test_add_review_updates_stats_together() {
        let mut p = product();
        p.add_review(author(1), stars(4), "Solid".to_owned(), now())
            .unwrap();
        p.add_review(author(2), stars(2), "Meh".to_owned(), now())
            .unwrap();

        assert_eq!(p.rating(), 3.0);
        assert_eq!(p.num_reviews(), 2);
        assert_consistent(&p);
    }

    #[test]
    fn test_add_review_captures_name_snapshot() {
        let mut p = product();
        p.add_review(author(9), stars(5), "Great".to_owned(), now())
            .unwrap();
        let review = p.reviews().last().unwrap();
        assert_eq!(review.name, "User 9");
        assert_eq!(review.user_id, UserId::new(9));
    }

    #[test]
    fn test_duplicate_review_rejected_and_product_unchanged() {
        let mut p = product();
        p.add_review(author(1), stars(5), "First".to_owned(), now())
            .unwrap();
        let before = p.clone();

        let err = p
            .add_review(author(1), stars(1), "Second".to_owned(), now())
            .unwrap_err();

        assert_eq!(err, AlreadyReviewed(UserId::new(1)));
        assert_eq!(p, before);
    }

    #[test]
    fn test_remove_from_two_reviews() {
        let mut p = product();
        p.add_review(author(1), stars(4), String::new(), now())
            .unwrap();
        p.add_review(author(2), stars(2), String::new(), now())
            .unwrap();

        let removed = p.remove_review(UserId::new(2));

        assert_eq!(removed, 1);
        assert_eq!(p.reviews().len(), 1);
        assert_eq!(p.reviews()[0].user_id, UserId::new(1));
        assert_eq!(p.rating(), 4.0);
        assert_eq!(p.num_reviews(), 1);
    }

    #[test]
    fn test_remove_unknown_user_with_many_reviews_is_noop() {
        let mut p = product();
        p.add_review(author(1), stars(5), String::new(), now())
            .unwrap();
        p.add_review(author(2), stars(3), String::new(), now())
            .unwrap();

        assert_eq!(p.remove_review(UserId::new(77)), 0);
        assert_eq!(p.num_reviews(), 2);
        assert_eq!(p.rating(), 4.0);
    }

    #[test]
    fn test_remove_last_review_ignores_owner() {
        let mut p = product();
        p.add_review(author(1), stars(5), String::new(), now())
            .unwrap();

        let removed = p.remove_review(UserId::new(42));

        assert_eq!(removed, 1);
        assert!(p.reviews().is_empty());
        assert_eq!(p.rating(), 0.0);
        assert_eq!(p.num_reviews(), 0);
    }

    #[test]
    fn test_remove_without_reviews_is_noop() {
        let mut p = product();
        assert_eq!(p.remove_review(UserId::new(1)), 0);
        assert_eq!(p.stats(), ReviewStats::EMPTY);
    }

    #[test]
    fn test_mixed_sequence_stays_consistent() {
        let mut p = product();
        for (user, rating) in [(1, 5), (2, 1), (3, 4), (4, 4), (5, 2)] {
            p.add_review(author(user), stars(rating), String::new(), now())
                .unwrap();
            assert_consistent(&p);
        }
        for user in [3, 1, 5, 2] {
            p.remove_review(UserId::new(user));
            assert_consistent(&p);
        }
        assert_eq!(p.num_reviews(), 1);
        assert_eq!(p.rating(), 4.0);

        // Re-reviewing is allowed once the earlier review is gone.
        p.add_review(author(3), stars(1), String::new(), now())
            .unwrap();
        assert_eq!(p.rating(), 2.5);
    }

    #[test]
    fn test_rating_is_not_rounded() {
        let mut p = product();
        for (user, rating) in [(1, 5), (2, 4), (3, 4)] {
            p.add_review(author(user), stars(rating), String::new(), now())
                .unwrap();
        }
        assert!((p.rating() - 13.0 / 3.0).abs() < 1e-12);
    }
}
