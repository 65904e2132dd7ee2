//! The caller identity forwarded by the authentication gateway.

use emporium_core::{ReviewAuthor, UserId};

/// The authenticated user making the current request.
///
/// Password checks and token verification happen upstream; the gateway
/// forwards the resolved identity on every request it lets through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// Unique user ID.
    pub id: UserId,
    /// Display name, snapshotted onto reviews.
    pub name: String,
    /// Whether the user may manage the catalog.
    pub is_admin: bool,
}

impl CurrentUser {
    /// The review author this user writes as.
    #[must_use]
    pub fn as_author(&self) -> ReviewAuthor {
        ReviewAuthor::new(self.id, self.name.clone())
    }
}
