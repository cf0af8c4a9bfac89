//! Storage abstraction for Stylist.
//!
//! The [`Catalog`] and [`PreferenceStore`] traits define every storage
//! operation the pipeline needs, enabling pluggable backends (SQLite,
//! in-memory).
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::filter::ProductFilter;
use crate::models::{Identity, PreferenceRecord, Product};

/// Read-only product catalog.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`query_products`](Catalog::query_products) | Products matching a filter, in catalog order |
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Return products matching `filter`, in catalog order.
    ///
    /// `limit` is a pushdown hint; implementations may return more rows
    /// and callers truncate.
    async fn query_products(
        &self,
        filter: &ProductFilter,
        limit: Option<usize>,
    ) -> Result<Vec<Product>>;
}

/// Per-identity preference persistence.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`find_preference`](PreferenceStore::find_preference) | Record for an identity, if any |
/// | [`save_preference`](PreferenceStore::save_preference) | Insert or replace the record for its identity |
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Look up the record keyed by exactly this identity.
    async fn find_preference(&self, identity: &Identity) -> Result<Option<PreferenceRecord>>;

    /// Persist `record`, replacing any existing record for `record.identity`.
    async fn save_preference(&self, record: &PreferenceRecord) -> Result<()>;
}
