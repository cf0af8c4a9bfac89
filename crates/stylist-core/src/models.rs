//! Core data models used throughout Stylist.
//!
//! These types represent the catalog products, caller identities, and
//! preference state that flow through the extraction and recommendation
//! pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChatError;

/// A catalog product, as read from the catalog collaborator.
///
/// Prices are whole Vietnamese đồng.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub sku: String,
    pub name: String,
    pub price: i64,
    #[serde(default)]
    pub description: Option<String>,
    /// Name of the owning category, if any.
    #[serde(default)]
    pub category: Option<String>,
    /// Frame style tag, e.g. `Round` or `Aviator`.
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
    /// Comma-separated face shapes the frame suits, e.g. `Round,Oval`.
    #[serde(default)]
    pub face_shape_recommendation: Option<String>,
    /// Free-form matching keywords, e.g. `rayban,round,pink`.
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_available")]
    pub is_available: bool,
    /// Unix timestamp of the soft delete, if the product was removed.
    #[serde(default)]
    pub deleted_at: Option<i64>,
}

fn default_available() -> bool {
    true
}

impl Product {
    /// Available and not soft-deleted.
    pub fn is_active(&self) -> bool {
        self.is_available && self.deleted_at.is_none()
    }
}

/// Who a preference record or conversation belongs to.
///
/// An authenticated account and an anonymous session are mutually
/// exclusive keys: an account identity never matches a session-keyed
/// record and vice versa.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Identity {
    Account(String),
    Session(String),
}

impl Identity {
    /// Build an identity from raw caller input.
    ///
    /// Exactly one of `account` / `session` must be present and non-blank.
    pub fn from_parts(account: Option<&str>, session: Option<&str>) -> Result<Self, ChatError> {
        let account = account.map(str::trim).filter(|s| !s.is_empty());
        let session = session.map(str::trim).filter(|s| !s.is_empty());
        match (account, session) {
            (Some(a), None) => Ok(Identity::Account(a.to_string())),
            (None, Some(s)) => Ok(Identity::Session(s.to_string())),
            (Some(_), Some(_)) => Err(ChatError::InvalidIdentity(
                "account and session ids are mutually exclusive".to_string(),
            )),
            (None, None) => Err(ChatError::InvalidIdentity(
                "an account or session id is required".to_string(),
            )),
        }
    }

    pub fn account_id(&self) -> Option<&str> {
        match self {
            Identity::Account(id) => Some(id),
            Identity::Session(_) => None,
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        match self {
            Identity::Account(_) => None,
            Identity::Session(id) => Some(id),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::Account(id) => write!(f, "account:{}", id),
            Identity::Session(id) => write!(f, "session:{}", id),
        }
    }
}

/// Preference signals extracted from one utterance.
///
/// Every field is optional: `None` (or an empty `keywords` list) means no
/// signal was found, so merging a delta never overwrites a stored value
/// with "unknown".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_shape: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_preference: Option<String>,
    /// Canonical keyword buckets, in order of first appearance.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_max: Option<i64>,
}

impl PreferenceDelta {
    /// Number of fields carrying a signal.
    pub fn field_count(&self) -> usize {
        [
            self.search_term.is_some(),
            self.category.is_some(),
            self.style.is_some(),
            self.face_shape.is_some(),
            self.color_preference.is_some(),
            !self.keywords.is_empty(),
            self.price_min.is_some(),
            self.price_max.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.field_count() == 0
    }
}

/// Cumulative, persisted preference state for one identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceRecord {
    pub identity: Identity,
    #[serde(flatten)]
    pub preferences: PreferenceDelta,
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: Option<i64>,
}

/// Sender of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => anyhow::bail!("unknown conversation role: '{}'", other),
        }
    }
}

/// One message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_requires_exactly_one_id() {
        assert_eq!(
            Identity::from_parts(Some("42"), None).unwrap(),
            Identity::Account("42".to_string())
        );
        assert_eq!(
            Identity::from_parts(None, Some(" abc ")).unwrap(),
            Identity::Session("abc".to_string())
        );
        assert!(Identity::from_parts(Some("42"), Some("abc")).is_err());
        assert!(Identity::from_parts(None, None).is_err());
        assert!(Identity::from_parts(Some("  "), None).is_err());
    }

    #[test]
    fn test_delta_field_count() {
        let mut delta = PreferenceDelta::default();
        assert!(delta.is_empty());
        delta.style = Some("Round".to_string());
        delta.keywords.push("casual".to_string());
        assert_eq!(delta.field_count(), 2);
    }

    #[test]
    fn test_product_is_active() {
        let mut product: Product = serde_json::from_value(serde_json::json!({
            "id": "m1", "sku": "x", "name": "X", "price": 1
        }))
        .unwrap();
        assert!(product.is_active());
        product.deleted_at = Some(10);
        assert!(!product.is_active());
        product.deleted_at = None;
        product.is_available = false;
        assert!(!product.is_active());
    }
}
