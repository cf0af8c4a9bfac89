//! `stylist catalog` subcommands: seed, list, add, remove.

use anyhow::{Context, Result};
use std::path::Path;

use stylist_core::compose::format_price;
use stylist_core::models::Product;

use crate::config::Config;
use crate::db;
use crate::seed;
use crate::sqlite_store::SqliteStore;

async fn open_store(config: &Config) -> Result<SqliteStore> {
    let pool = db::connect(config).await?;
    Ok(SqliteStore::new(pool))
}

pub async fn run_seed(config: &Config) -> Result<()> {
    let store = open_store(config).await?;
    let count = seed::seed(&store).await?;
    store.pool().close().await;
    println!("Seeded {} products.", count);
    Ok(())
}

pub async fn run_list(config: &Config, include_deleted: bool) -> Result<()> {
    let store = open_store(config).await?;
    let products = store.list_products(include_deleted).await?;
    store.pool().close().await;

    if products.is_empty() {
        println!("No products.");
        return Ok(());
    }

    for product in &products {
        let mut flags = Vec::new();
        if !product.is_available {
            flags.push("unavailable");
        }
        if product.deleted_at.is_some() {
            flags.push("deleted");
        }
        let flags = if flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", flags.join(", "))
        };

        println!(
            "{}  {}  {}{}",
            product.id,
            product.name,
            format_price(product.price),
            flags
        );
        println!("    sku: {}", product.sku);
        if let Some(category) = &product.category {
            println!("    category: {}", category);
        }
        if let Some(style) = &product.style {
            println!("    style: {}", style);
        }
        if let Some(shapes) = &product.face_shape_recommendation {
            println!("    face shapes: {}", shapes);
        }
    }
    println!();
    println!("{} products", products.len());
    Ok(())
}

/// Upsert every product in a JSON array file.
pub async fn run_add(config: &Config, path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read product file: {}", path.display()))?;
    let products: Vec<Product> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse product file: {}", path.display()))?;

    let store = open_store(config).await?;
    for product in &products {
        store.upsert_product(product).await?;
    }
    store.pool().close().await;

    println!("Upserted {} products.", products.len());
    Ok(())
}

pub async fn run_remove(config: &Config, id: &str) -> Result<()> {
    let store = open_store(config).await?;
    let removed = store.soft_delete(id).await?;
    store.pool().close().await;

    if !removed {
        anyhow::bail!("product not found: {}", id);
    }
    println!("Removed product {}.", id);
    Ok(())
}
