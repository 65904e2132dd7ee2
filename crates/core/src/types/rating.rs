//! Star rating given by a single review.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from constructing a [`ReviewRating`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RatingError {
    #[error("rating must be between {min} and {max} (got {0})", min = ReviewRating::MIN, max = ReviewRating::MAX)]
    OutOfRange(i64),
}

/// An integer star rating from 1 to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct ReviewRating(u8);

impl ReviewRating {
    /// Lowest accepted rating.
    pub const MIN: u8 = 1;
    /// Highest accepted rating.
    pub const MAX: u8 = 5;

    /// Create a rating, rejecting values outside `1..=5`.
    ///
    /// # Errors
    ///
    /// Returns `RatingError::OutOfRange` for anything outside `1..=5`.
    pub fn new(value: i64) -> Result<Self, RatingError> {
        u8::try_from(value)
            .ok()
            .filter(|v| (Self::MIN..=Self::MAX).contains(v))
            .map(Self)
            .ok_or(RatingError::OutOfRange(value))
    }

    /// Get the rating as an integer.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for ReviewRating {
    type Error = RatingError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ReviewRating> for u8 {
    fn from(rating: ReviewRating) -> Self {
        rating.0
    }
}
