//! SQLite-backed [`Catalog`] and [`PreferenceStore`] implementations.
//!
//! The catalog query pushes the base predicate and the price range down to
//! SQL, then applies [`ProductFilter::matches`] to the rows so substring
//! clauses keep exactly the in-memory semantics.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use stylist_core::filter::ProductFilter;
use stylist_core::models::{Identity, PreferenceDelta, PreferenceRecord, Product};
use stylist_core::store::{Catalog, PreferenceStore};

/// SQLite implementation of both storage traits.
///
/// Wraps a [`SqlitePool`] against the schema created by
/// [`migrate::apply`](crate::migrate::apply).
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Return the id of the named category, creating it if needed.
    pub async fn ensure_category(&self, name: &str, description: Option<&str>) -> Result<i64> {
        sqlx::query(
            "INSERT INTO categories (name, description, created_at) VALUES (?, ?, ?) ON CONFLICT(name) DO NOTHING",
        )
        .bind(name)
        .bind(description)
        .bind(now())
        .execute(&self.pool)
        .await?;

        let id: i64 = sqlx::query_scalar("SELECT id FROM categories WHERE name = ?")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    /// Insert or replace a product by id.
    ///
    /// Re-adding a soft-deleted product restores it.
    pub async fn upsert_product(&self, product: &Product) -> Result<()> {
        let category_id = match product.category.as_deref() {
            Some(name) => Some(self.ensure_category(name, None).await?),
            None => None,
        };
        let ts = now();

        sqlx::query(
            r#"
            INSERT INTO products (id, sku, name, description, category_id, style, material,
                                  face_shape_recommendation, keywords, price, image_url,
                                  is_available, created_at, updated_at, deleted_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NULL, ?)
            ON CONFLICT(id) DO UPDATE SET
                sku = excluded.sku,
                name = excluded.name,
                description = excluded.description,
                category_id = excluded.category_id,
                style = excluded.style,
                material = excluded.material,
                face_shape_recommendation = excluded.face_shape_recommendation,
                keywords = excluded.keywords,
                price = excluded.price,
                image_url = excluded.image_url,
                is_available = excluded.is_available,
                updated_at = ?,
                deleted_at = excluded.deleted_at
            "#,
        )
        .bind(&product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.description)
        .bind(category_id)
        .bind(&product.style)
        .bind(&product.material)
        .bind(&product.face_shape_recommendation)
        .bind(&product.keywords)
        .bind(product.price)
        .bind(&product.image_url)
        .bind(product.is_available)
        .bind(ts)
        .bind(product.deleted_at)
        .bind(ts)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to upsert product '{}'", product.id))?;

        Ok(())
    }

    /// Mark a product deleted. Returns false if it was missing or already deleted.
    pub async fn soft_delete(&self, id: &str) -> Result<bool> {
        let ts = now();
        let result = sqlx::query(
            "UPDATE products SET deleted_at = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(ts)
        .bind(ts)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Every product in catalog order, optionally including deleted rows.
    pub async fn list_products(&self, include_deleted: bool) -> Result<Vec<Product>> {
        let rows = sqlx::query(&format!(
            "{} WHERE (? OR p.deleted_at IS NULL) ORDER BY p.rowid",
            PRODUCT_SELECT
        ))
        .bind(include_deleted)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(product_from_row).collect())
    }
}

const PRODUCT_SELECT: &str = r#"
    SELECT p.id, p.sku, p.name, p.price, p.description, c.name AS category,
           p.style, p.material, p.face_shape_recommendation, p.keywords,
           p.image_url, p.is_available, p.deleted_at
    FROM products p
    LEFT JOIN categories c ON c.id = p.category_id
"#;

fn product_from_row(row: &SqliteRow) -> Product {
    Product {
        id: row.get("id"),
        sku: row.get("sku"),
        name: row.get("name"),
        price: row.get("price"),
        description: row.get("description"),
        category: row.get("category"),
        style: row.get("style"),
        material: row.get("material"),
        face_shape_recommendation: row.get("face_shape_recommendation"),
        keywords: row.get("keywords"),
        image_url: row.get("image_url"),
        is_available: row.get("is_available"),
        deleted_at: row.get("deleted_at"),
    }
}

/// Column holding the key for this identity, and the key itself.
pub(crate) fn identity_column(identity: &Identity) -> (&'static str, &str) {
    match identity {
        Identity::Account(id) => ("account_id", id),
        Identity::Session(id) => ("session_id", id),
    }
}

pub(crate) fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

#[async_trait]
impl Catalog for SqliteStore {
    async fn query_products(
        &self,
        filter: &ProductFilter,
        limit: Option<usize>,
    ) -> Result<Vec<Product>> {
        let rows = sqlx::query(&format!(
            r#"{}
            WHERE p.is_available = 1
              AND p.deleted_at IS NULL
              AND (? IS NULL OR p.price >= ?)
              AND (? IS NULL OR p.price <= ?)
            ORDER BY p.rowid
            "#,
            PRODUCT_SELECT
        ))
        .bind(filter.price_min)
        .bind(filter.price_min)
        .bind(filter.price_max)
        .bind(filter.price_max)
        .fetch_all(&self.pool)
        .await?;

        let scanned = rows.len();
        let matched: Vec<Product> = rows
            .iter()
            .map(product_from_row)
            .filter(|p| filter.matches(p))
            .take(limit.unwrap_or(usize::MAX))
            .collect();

        debug!(scanned, matched = matched.len(), "catalog query");
        Ok(matched)
    }
}

#[async_trait]
impl PreferenceStore for SqliteStore {
    async fn find_preference(&self, identity: &Identity) -> Result<Option<PreferenceRecord>> {
        let (column, key) = identity_column(identity);
        let row = sqlx::query(&format!(
            r#"
            SELECT search_term, category, style, face_shape, color_preference,
                   keywords_json, price_min, price_max, created_at, updated_at
            FROM preferences WHERE {} = ?
            "#,
            column
        ))
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        let row = match row {
            Some(r) => r,
            None => return Ok(None),
        };

        let keywords_json: String = row.get("keywords_json");
        let keywords: Vec<String> = serde_json::from_str(&keywords_json)
            .with_context(|| format!("Corrupt keywords for {}", identity))?;

        Ok(Some(PreferenceRecord {
            identity: identity.clone(),
            preferences: PreferenceDelta {
                search_term: row.get("search_term"),
                category: row.get("category"),
                style: row.get("style"),
                face_shape: row.get("face_shape"),
                color_preference: row.get("color_preference"),
                keywords,
                price_min: row.get("price_min"),
                price_max: row.get("price_max"),
            },
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }))
    }

    async fn save_preference(&self, record: &PreferenceRecord) -> Result<()> {
        let (column, key) = identity_column(&record.identity);
        let prefs = &record.preferences;
        let keywords_json = serde_json::to_string(&prefs.keywords)?;

        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(&format!(
            r#"
            UPDATE preferences SET
                search_term = ?, category = ?, style = ?, face_shape = ?,
                color_preference = ?, keywords_json = ?, price_min = ?, price_max = ?,
                updated_at = ?
            WHERE {} = ?
            "#,
            column
        ))
        .bind(&prefs.search_term)
        .bind(&prefs.category)
        .bind(&prefs.style)
        .bind(&prefs.face_shape)
        .bind(&prefs.color_preference)
        .bind(&keywords_json)
        .bind(prefs.price_min)
        .bind(prefs.price_max)
        .bind(record.updated_at)
        .bind(key)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            sqlx::query(
                r#"
                INSERT INTO preferences (account_id, session_id, search_term, category, style,
                                         face_shape, color_preference, keywords_json,
                                         price_min, price_max, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(record.identity.account_id())
            .bind(record.identity.session_id())
            .bind(&prefs.search_term)
            .bind(&prefs.category)
            .bind(&prefs.style)
            .bind(&prefs.face_shape)
            .bind(&prefs.color_preference)
            .bind(&keywords_json)
            .bind(prefs.price_min)
            .bind(prefs.price_max)
            .bind(record.created_at)
            .bind(record.updated_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
