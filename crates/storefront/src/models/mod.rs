//! Request-scoped domain models for storefront.

pub mod user;

pub use user::CurrentUser;
