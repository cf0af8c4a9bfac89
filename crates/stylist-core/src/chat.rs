//! The utterance pipeline: extract → upsert → recommend → compose.
//!
//! [`handle_utterance`] is the single entry point frontends call. The steps
//! run in that fixed order and fail fast: if the preference store fails,
//! the catalog is never queried.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::compose::compose_counted;
use crate::error::{ChatError, Collaborator};
use crate::extract::extract;
use crate::filter::ProductFilter;
use crate::models::{ConversationTurn, Identity, PreferenceDelta, PreferenceRecord, Product};
use crate::preferences;
use crate::recommend::{recommend_counted, DEFAULT_LIMIT};
use crate::store::{Catalog, PreferenceStore};

/// Which preferences drive the catalog query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendFrom {
    /// Only the signals in the current utterance.
    #[default]
    Utterance,
    /// The merged record for the identity, falling back to the utterance
    /// when nothing has been stored yet.
    Profile,
}

#[derive(Debug, Clone)]
pub struct ChatOptions {
    pub limit: usize,
    pub recommend_from: RecommendFrom,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            recommend_from: RecommendFrom::default(),
        }
    }
}

/// Result of one utterance.
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub response_text: String,
    pub recommendations: Vec<Product>,
    /// Products that matched before truncation to the limit.
    pub total_matches: usize,
    /// Signals found in this utterance.
    pub extracted: PreferenceDelta,
    /// Stored record after the upsert, if the identity has one.
    pub profile: Option<PreferenceRecord>,
}

/// Run the full pipeline for one utterance from `identity`.
pub async fn handle_utterance<C, P>(
    catalog: &C,
    store: &P,
    identity: &Identity,
    utterance: &str,
    options: &ChatOptions,
) -> Result<ChatReply, ChatError>
where
    C: Catalog + ?Sized,
    P: PreferenceStore + ?Sized,
{
    let extracted = extract(utterance);

    let profile = preferences::upsert(store, identity, &extracted)
        .await
        .map_err(|e| {
            warn!(%identity, error = %e, "preference store failed");
            ChatError::unavailable(Collaborator::PreferenceStore, e)
        })?;

    let filter = match (options.recommend_from, &profile) {
        (RecommendFrom::Profile, Some(record)) => ProductFilter::from(record),
        _ => ProductFilter::from(&extracted),
    };

    let counted = recommend_counted(catalog, filter, options.limit)
        .await
        .map_err(|e| {
            warn!(%identity, error = %e, "catalog query failed");
            ChatError::unavailable(Collaborator::Catalog, e)
        })?;

    Ok(ChatReply {
        response_text: compose_counted(&counted.products, counted.total_matches),
        recommendations: counted.products,
        total_matches: counted.total_matches,
        extracted,
        profile,
    })
}

/// The last `n` turns of a chronologically ordered history.
pub fn recent_turns(turns: &[ConversationTurn], n: usize) -> &[ConversationTurn] {
    &turns[turns.len().saturating_sub(n)..]
}
