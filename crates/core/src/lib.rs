//! Emporium Core - catalog and review rules.
//!
//! This crate provides the domain types shared by the Emporium components:
//! - `storefront` - JSON API serving the catalog and product reviews
//! - `cli` - Command-line tools for migrations and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure rules - no I/O, no database
//! access, no HTTP. Repositories and request handlers live in `storefront`
//! and call into these rules so that every storage backend agrees on what a
//! catalog page or a review mutation means.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices and review ratings
//! - [`product`] - The product document and its editable details
//! - [`review`] - Reviews and the derived rating statistics
//! - [`catalog`] - Keyword matching, sort filters and pagination

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod product;
pub mod review;
pub mod types;

pub use catalog::{
    CatalogPage, CatalogQuery, KeywordFilter, PAGE_SIZE, PageNumber, PageWindow, SortFilter,
    TOP_RATED_LIMIT, total_pages,
};
pub use product::{DetailsError, MAX_STOCK, Product, ProductDetails};
pub use review::{AlreadyReviewed, Review, ReviewAuthor, ReviewStats};
pub use types::*;
