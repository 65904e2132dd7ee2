//! Seed the catalog with products from a YAML file.
//!
//! The file is a list of product details:
//!
//! ```yaml
//! - name: Airpods Wireless Bluetooth Headphones
//!   image: /images/airpods.jpg
//!   category: Electronics
//!   description: Bluetooth technology lets you connect it with compatible devices
//!   price: "89.99"
//!   countInStock: 10
//! ```
//!
//! Products are inserted without reviews.

use std::path::Path;

use thiserror::Error;
use tracing::{error, info};

use emporium_core::ProductDetails;
use emporium_storefront::db::{self, PgProductRepository, ProductRepository};

/// Errors that can occur while reading a seed file.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0} validation errors found")]
    Invalid(usize),
}

/// Parse and validate a product seed file's contents.
///
/// Every entry is checked; all problems are logged before failing.
///
/// # Errors
///
/// Returns `SeedError::Yaml` if the content is not a list of products.
/// Returns `SeedError::Invalid` if any entry fails validation.
pub fn parse_products(content: &str) -> Result<Vec<ProductDetails>, SeedError> {
    let products: Vec<ProductDetails> = serde_yaml::from_str(content)?;

    let errors: Vec<String> = products
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.validate().err().map(|e| format!("entry {}: {e}", i + 1)))
        .collect();

    if !errors.is_empty() {
        error!("Seed file validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(SeedError::Invalid(errors.len()));
    }

    Ok(products)
}

/// Insert products from a YAML file.
///
/// # Arguments
///
/// * `file_path` - Path to the YAML file
/// * `dry_run` - If true, only validate the file
///
/// # Errors
///
/// Returns an error if environment variables are missing, the file cannot be
/// read or validated, or database operations fail.
pub async fn products(file_path: &str, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    // Verify file exists
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(SeedError::FileNotFound(file_path.to_string()).into());
    }

    info!(path = %file_path, "Loading products from file");

    // Read and validate YAML before connecting to database
    let content = tokio::fs::read_to_string(path).await?;
    let products = parse_products(&content)?;

    info!(products = products.len(), "Seed file validated");

    if dry_run {
        info!("Dry run, nothing written");
        return Ok(());
    }

    let database_url = super::database_url().ok_or("STOREFRONT_DATABASE_URL not set")?;
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let repo = PgProductRepository::new(pool);
    for details in products {
        let product = repo.insert(details).await?;
        info!(id = %product.id(), name = product.name(), "Inserted product");
    }

    info!("Seeding complete!");
    Ok(())
}
