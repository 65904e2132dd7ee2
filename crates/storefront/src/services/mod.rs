//! Business logic services for storefront.
//!
//! # Services
//!
//! - `catalog` - Product listing, top-rated list and product detail
//! - `reviews` - Adding and removing reviews with optimistic concurrency
//! - `products` - Catalog management for administrators
//!
//! Services borrow a [`ProductRepository`](crate::db::ProductRepository) and
//! are constructed per request; they hold no state of their own.

pub mod catalog;
pub mod products;
pub mod reviews;

pub use catalog::{CatalogError, CatalogService};
pub use products::{ProductAdminError, ProductAdminService};
pub use reviews::{ReviewError, ReviewService};
