//! Database schema migrations (idempotent).
//!
//! | Table | Contents |
//! |-------|----------|
//! | `categories` | Product categories, unique by name |
//! | `products` | Catalog rows; `deleted_at` marks soft deletes |
//! | `preferences` | One row per account or session identity |
//! | `conversations` | Chat sessions per identity |
//! | `messages` | Turns of a conversation |
//!
//! Every statement uses `IF NOT EXISTS`, so `stylist init` can run any
//! number of times.

use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;

pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    apply(&pool).await?;
    pool.close().await;
    Ok(())
}

/// Create all tables and indexes on an open pool.
pub async fn apply(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            description TEXT,
            created_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id TEXT PRIMARY KEY,
            sku TEXT NOT NULL,
            name TEXT NOT NULL,
            description TEXT,
            category_id INTEGER,
            style TEXT,
            material TEXT,
            face_shape_recommendation TEXT,
            keywords TEXT,
            price INTEGER NOT NULL,
            image_url TEXT,
            is_available INTEGER NOT NULL DEFAULT 1,
            created_at INTEGER NOT NULL,
            updated_at INTEGER,
            deleted_at INTEGER,
            FOREIGN KEY (category_id) REFERENCES categories(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Exactly one of account_id / session_id is set on every row.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS preferences (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            account_id TEXT,
            session_id TEXT,
            search_term TEXT,
            category TEXT,
            style TEXT,
            face_shape TEXT,
            color_preference TEXT,
            keywords_json TEXT NOT NULL DEFAULT '[]',
            price_min INTEGER,
            price_max INTEGER,
            created_at INTEGER NOT NULL,
            updated_at INTEGER,
            CHECK ((account_id IS NULL) <> (session_id IS NULL))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS conversations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            account_id TEXT,
            session_id TEXT,
            created_at INTEGER NOT NULL,
            updated_at INTEGER,
            CHECK ((account_id IS NULL) <> (session_id IS NULL))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS messages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            conversation_id INTEGER NOT NULL,
            sender TEXT NOT NULL,
            content TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            FOREIGN KEY (conversation_id) REFERENCES conversations(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_preferences_account ON preferences(account_id) WHERE account_id IS NOT NULL",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_preferences_session ON preferences(session_id) WHERE session_id IS NOT NULL",
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_products_category ON products(category_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_conversations_account ON conversations(account_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_conversations_session ON conversations(session_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_messages_conversation ON messages(conversation_id)")
        .execute(pool)
        .await?;

    Ok(())
}
