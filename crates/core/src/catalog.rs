//! Catalog listing rules: keyword matching, sort filters and pagination.
//!
//! Storage backends translate these rules into their own query language
//! (see the Postgres repository in `storefront`). [`CatalogQuery::run`] is the
//! plain in-memory evaluation every backend must agree with.

use std::cmp::Ordering;
use std::num::{IntErrorKind, NonZeroU32};

use serde::Serialize;

use crate::product::Product;

/// Products per catalog page.
pub const PAGE_SIZE: u32 = 10;

/// Number of products returned by the top-rated listing.
pub const TOP_RATED_LIMIT: u32 = 3;

/// Ordering requested by the `filter` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortFilter {
    /// Storage (creation) order.
    #[default]
    Unsorted,
    /// Ascending by price.
    PriceLowToHigh,
    /// Descending by price.
    PriceHighToLow,
    /// Descending by average rating.
    TopReviewed,
}

impl SortFilter {
    /// Parse from the URL parameter value.
    ///
    /// Unknown values fall back to [`Unsorted`](Self::Unsorted) instead of
    /// failing the request.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "low" => Self::PriceLowToHigh,
            "high" => Self::PriceHighToLow,
            "review" => Self::TopReviewed,
            _ => Self::Unsorted,
        }
    }

    /// Convert to URL parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unsorted => "",
            Self::PriceLowToHigh => "low",
            Self::PriceHighToLow => "high",
            Self::TopReviewed => "review",
        }
    }

    /// Compare two products by this filter's sort key only.
    ///
    /// Equal keys compare as `Equal`, so a stable sort keeps storage order
    /// among ties.
    #[must_use]
    pub fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::Unsorted => Ordering::Equal,
            Self::PriceLowToHigh => a.price().cmp(&b.price()),
            Self::PriceHighToLow => b.price().cmp(&a.price()),
            Self::TopReviewed => b.rating().total_cmp(&a.rating()),
        }
    }
}

/// The slice of the ordered result set that makes up one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u32,
}

/// A 1-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageNumber(NonZeroU32);

impl PageNumber {
    /// The first page.
    pub const FIRST: Self = Self(NonZeroU32::MIN);

    /// Normalize raw `pageNumber` input.
    ///
    /// Missing, non-numeric, zero and negative values all become page 1.
    /// Pages too large to represent saturate to the last representable page,
    /// which is always past the end of the catalog.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let page = raw.and_then(|s| match s.trim().parse::<u32>() {
            Ok(page) => Some(page),
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(u32::MAX),
            Err(_) => None,
        });
        page.and_then(NonZeroU32::new).map_or(Self::FIRST, Self)
    }

    /// Page from a number, treating 0 as page 1.
    #[must_use]
    pub fn new(page: u32) -> Self {
        NonZeroU32::new(page).map_or(Self::FIRST, Self)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// The window of items this page covers.
    #[must_use]
    pub const fn window(self) -> PageWindow {
        PageWindow {
            offset: (self.0.get() as u64 - 1) * PAGE_SIZE as u64,
            limit: PAGE_SIZE,
        }
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

/// Case-insensitive substring match on product names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeywordFilter {
    needle: Option<String>,
}

impl KeywordFilter {
    /// Build a filter from raw input. Missing or empty input matches every
    /// product; anything else, whitespace included, is matched as given.
    #[must_use]
    pub fn new(keyword: Option<&str>) -> Self {
        let needle = keyword.filter(|k| !k.is_empty()).map(str::to_owned);
        Self { needle }
    }

    /// A filter matching every product.
    #[must_use]
    pub const fn all() -> Self {
        Self { needle: None }
    }

    /// The keyword, if any.
    #[must_use]
    pub fn keyword(&self) -> Option<&str> {
        self.needle.as_deref()
    }

    /// Whether `name` contains the keyword, ignoring case.
    ///
    /// The keyword is a literal: no wildcards or pattern syntax.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.needle
            .as_deref()
            .is_none_or(|needle| name.to_lowercase().contains(&needle.to_lowercase()))
    }
}

/// Number of pages needed for `count` matches.
#[must_use]
pub const fn total_pages(count: u64) -> u64 {
    count.div_ceil(PAGE_SIZE as u64)
}

/// One page of catalog results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogPage<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub total_pages: u64,
}

impl<T> CatalogPage<T> {
    /// Assemble a page from its items and the total match count.
    #[must_use]
    pub fn new(items: Vec<T>, page: PageNumber, match_count: u64) -> Self {
        Self {
            items,
            page: page.get(),
            total_pages: total_pages(match_count),
        }
    }
}

/// A full catalog listing request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogQuery {
    pub keyword: KeywordFilter,
    pub sort: SortFilter,
    pub page: PageNumber,
}

impl CatalogQuery {
    /// Build a query from raw request parameters, normalizing each one.
    #[must_use]
    pub fn from_params(keyword: Option<&str>, filter: Option<&str>, page: Option<&str>) -> Self {
        Self {
            keyword: KeywordFilter::new(keyword),
            sort: filter.map(SortFilter::parse).unwrap_or_default(),
            page: PageNumber::parse(page),
        }
    }

    /// Evaluate the query against products held in storage order.
    #[must_use]
    pub fn run(&self, products: &[Product]) -> CatalogPage<Product> {
        let matched = select(products, &self.keyword, self.sort);
        let count = matched.len() as u64;
        let items = window(matched, self.page.window())
            .into_iter()
            .cloned()
            .collect();
        CatalogPage::new(items, self.page, count)
    }
}

/// Filter `products` by keyword and stable-sort them by `sort`.
#[must_use]
pub fn select<'a>(
    products: &'a [Product],
    keyword: &KeywordFilter,
    sort: SortFilter,
) -> Vec<&'a Product> {
    let mut matched: Vec<&Product> = products
        .iter()
        .filter(|p| keyword.matches(p.name()))
        .collect();
    matched.sort_by(|a, b| sort.compare(a, b));
    matched
}

/// Cut a window out of an ordered result set. Windows past the end are empty.
#[must_use]
pub fn window<T>(items: Vec<T>, window: PageWindow) -> Vec<T> {
    let offset = usize::try_from(window.offset).unwrap_or(usize::MAX);
    items
        .into_iter()
        .skip(offset)
        .take(window.limit as usize)
        .collect()
}
