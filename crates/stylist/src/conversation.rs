//! Conversation persistence.
//!
//! A conversation belongs to one identity. Starting one stores the
//! assistant greeting as its first turn; each chat exchange appends the
//! user turn and the assistant reply.

use anyhow::{bail, Result};
use serde::Serialize;
use sqlx::{Row, SqlitePool};

use stylist_core::chat::recent_turns;
use stylist_core::models::{ConversationTurn, Identity, Role};

use crate::sqlite_store::{identity_column, now};

pub const GREETING: &str = "Xin chào! Tôi là trợ lý ảo của VF Style. Tôi có thể giúp bạn tìm kiếm kính mắt phù hợp. Bạn đang tìm kiếm loại kính như thế nào?";

#[derive(Debug, Clone, Serialize)]
pub struct ConversationSummary {
    pub id: i64,
    pub created_at: i64,
    pub updated_at: Option<i64>,
    /// The most recent turns, oldest first.
    pub turns: Vec<ConversationTurn>,
}

/// Create a conversation for `identity` and store the greeting.
pub async fn start_conversation(pool: &SqlitePool, identity: &Identity) -> Result<i64> {
    let ts = now();
    let result = sqlx::query(
        "INSERT INTO conversations (account_id, session_id, created_at, updated_at) VALUES (?, ?, ?, ?)",
    )
    .bind(identity.account_id())
    .bind(identity.session_id())
    .bind(ts)
    .bind(ts)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    append_turn(pool, id, Role::Assistant, GREETING).await?;
    Ok(id)
}

/// Check that conversation `id` exists and belongs to `identity`.
pub async fn ensure_owned(pool: &SqlitePool, id: i64, identity: &Identity) -> Result<()> {
    let (column, key) = identity_column(identity);
    let found: Option<i64> = sqlx::query_scalar(&format!(
        "SELECT id FROM conversations WHERE id = ? AND {} = ?",
        column
    ))
    .bind(id)
    .bind(key)
    .fetch_optional(pool)
    .await?;

    if found.is_none() {
        bail!("conversation {} not found for {}", id, identity);
    }
    Ok(())
}

pub async fn append_turn(pool: &SqlitePool, conversation_id: i64, role: Role, content: &str) -> Result<()> {
    let ts = now();
    let mut tx = pool.begin().await?;

    sqlx::query("INSERT INTO messages (conversation_id, sender, content, created_at) VALUES (?, ?, ?, ?)")
        .bind(conversation_id)
        .bind(role.as_str())
        .bind(content)
        .bind(ts)
        .execute(&mut *tx)
        .await?;

    sqlx::query("UPDATE conversations SET updated_at = ? WHERE id = ?")
        .bind(ts)
        .bind(conversation_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// All turns of a conversation, oldest first.
pub async fn load_turns(pool: &SqlitePool, conversation_id: i64) -> Result<Vec<ConversationTurn>> {
    let rows = sqlx::query(
        "SELECT sender, content, created_at FROM messages WHERE conversation_id = ? ORDER BY id",
    )
    .bind(conversation_id)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            let sender: String = row.get("sender");
            Ok::<_, anyhow::Error>(ConversationTurn {
                role: sender.parse()?,
                content: row.get("content"),
                created_at: row.get("created_at"),
            })
        })
        .collect()
}

/// Conversations of `identity`, newest first, each with its last
/// `history_limit` turns.
pub async fn list_conversations(
    pool: &SqlitePool,
    identity: &Identity,
    history_limit: usize,
) -> Result<Vec<ConversationSummary>> {
    let (column, key) = identity_column(identity);
    let rows = sqlx::query(&format!(
        "SELECT id, created_at, updated_at FROM conversations WHERE {} = ? ORDER BY id DESC",
        column
    ))
    .bind(key)
    .fetch_all(pool)
    .await?;

    let mut summaries = Vec::with_capacity(rows.len());
    for row in rows {
        let id: i64 = row.get("id");
        let turns = load_turns(pool, id).await?;
        summaries.push(ConversationSummary {
            id,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
            turns: recent_turns(&turns, history_limit).to_vec(),
        });
    }
    Ok(summaries)
}
