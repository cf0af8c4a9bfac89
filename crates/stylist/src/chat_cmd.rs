//! `stylist chat`, `stylist preferences` and `stylist history`.
//!
//! Each chat invocation handles one utterance: it resolves the caller
//! identity, runs the core pipeline against SQLite, and records the
//! exchange in a conversation.

use anyhow::Result;
use tracing::info;

use stylist_core::chat::handle_utterance;
use stylist_core::compose::format_price;
use stylist_core::models::{Identity, Role};

use crate::config::Config;
use crate::conversation;
use crate::db;
use crate::sqlite_store::SqliteStore;

/// Caller identity flags as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct IdentityArgs {
    pub account: Option<String>,
    pub session: Option<String>,
}

impl IdentityArgs {
    pub fn resolve(&self) -> Result<Identity> {
        Ok(Identity::from_parts(
            self.account.as_deref(),
            self.session.as_deref(),
        )?)
    }

    /// Like [`resolve`](Self::resolve), but mints an anonymous session
    /// when no id was given.
    fn resolve_or_new_session(&self) -> Result<(Identity, bool)> {
        if self.account.is_none() && self.session.is_none() {
            let id = uuid::Uuid::new_v4().to_string();
            return Ok((Identity::Session(id), true));
        }
        Ok((self.resolve()?, false))
    }
}

pub async fn run_chat(
    config: &Config,
    who: &IdentityArgs,
    conversation_id: Option<i64>,
    message: &str,
    json: bool,
) -> Result<()> {
    let (identity, minted) = who.resolve_or_new_session()?;

    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool.clone());

    let conversation_id = match conversation_id {
        Some(id) => {
            conversation::ensure_owned(&pool, id, &identity).await?;
            id
        }
        None => conversation::start_conversation(&pool, &identity).await?,
    };

    let reply = handle_utterance(&store, &store, &identity, message, &config.chat.options()).await?;

    conversation::append_turn(&pool, conversation_id, Role::User, message).await?;
    conversation::append_turn(&pool, conversation_id, Role::Assistant, &reply.response_text)
        .await?;
    pool.close().await;

    info!(
        %identity,
        conversation_id,
        recommendations = reply.recommendations.len(),
        "chat turn handled"
    );

    if json {
        let out = serde_json::json!({
            "identity": identity,
            "conversation_id": conversation_id,
            "reply": reply,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if minted {
        println!("Session: {}", identity.session_id().unwrap_or_default());
    }
    println!("Conversation: {}", conversation_id);
    println!();
    println!("{}", reply.response_text);
    Ok(())
}

pub async fn run_preferences(config: &Config, who: &IdentityArgs) -> Result<()> {
    use stylist_core::store::PreferenceStore;

    let identity = who.resolve()?;
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool);
    let record = store.find_preference(&identity).await?;
    store.pool().close().await;

    let record = match record {
        Some(r) => r,
        None => {
            println!("No preferences stored for {}.", identity);
            return Ok(());
        }
    };

    let prefs = &record.preferences;
    println!("Preferences for {}", identity);
    let fields = [
        ("search term", prefs.search_term.clone()),
        ("category", prefs.category.clone()),
        ("style", prefs.style.clone()),
        ("face shape", prefs.face_shape.clone()),
        ("color", prefs.color_preference.clone()),
        ("min price", prefs.price_min.map(format_price)),
        ("max price", prefs.price_max.map(format_price)),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("    {}: {}", label, value);
        }
    }
    if !prefs.keywords.is_empty() {
        println!("    keywords: {}", prefs.keywords.join(", "));
    }
    Ok(())
}

pub async fn run_history(config: &Config, who: &IdentityArgs) -> Result<()> {
    let identity = who.resolve()?;
    let pool = db::connect(config).await?;
    let conversations =
        conversation::list_conversations(&pool, &identity, config.chat.history_limit).await?;
    pool.close().await;

    if conversations.is_empty() {
        println!("No conversations for {}.", identity);
        return Ok(());
    }

    for summary in &conversations {
        println!("Conversation {}", summary.id);
        for turn in &summary.turns {
            println!("  [{}] {}", turn.role.as_str(), turn.content.trim_end());
        }
        println!();
    }
    Ok(())
}
