//! In-memory [`Catalog`] and [`PreferenceStore`] implementations for
//! tests and embedders.
//!
//! Uses `Vec` and `HashMap` behind `std::sync::RwLock` for thread safety.
//! The catalog evaluates [`ProductFilter::matches`] over every stored
//! product in insertion order.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;

use crate::filter::ProductFilter;
use crate::models::{Identity, PreferenceRecord, Product};

use super::{Catalog, PreferenceStore};

/// In-memory product catalog.
pub struct InMemoryCatalog {
    products: RwLock<Vec<Product>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self {
            products: RwLock::new(Vec::new()),
        }
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: RwLock::new(products),
        }
    }

    /// Insert a product, replacing one with the same id in place.
    pub fn upsert_product(&self, product: Product) {
        let mut products = self.products.write().unwrap();
        match products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product,
            None => products.push(product),
        }
    }

    /// Mark a product deleted. Returns false if the id is unknown.
    pub fn soft_delete(&self, id: &str, deleted_at: i64) -> bool {
        let mut products = self.products.write().unwrap();
        match products.iter_mut().find(|p| p.id == id) {
            Some(p) => {
                p.deleted_at = Some(deleted_at);
                true
            }
            None => false,
        }
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    async fn query_products(
        &self,
        filter: &ProductFilter,
        limit: Option<usize>,
    ) -> Result<Vec<Product>> {
        let products = self.products.read().unwrap();
        Ok(products
            .iter()
            .filter(|p| filter.matches(p))
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }
}

/// In-memory preference store keyed by [`Identity`].
pub struct InMemoryPreferenceStore {
    records: RwLock<HashMap<Identity, PreferenceRecord>>,
    writes: AtomicUsize,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of `save_preference` calls served so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryPreferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PreferenceStore for InMemoryPreferenceStore {
    async fn find_preference(&self, identity: &Identity) -> Result<Option<PreferenceRecord>> {
        let records = self.records.read().unwrap();
        Ok(records.get(identity).cloned())
    }

    async fn save_preference(&self, record: &PreferenceRecord) -> Result<()> {
        let mut records = self.records.write().unwrap();
        records.insert(record.identity.clone(), record.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PreferenceDelta;

    fn product(id: &str, price: i64) -> Product {
        Product {
            id: id.to_string(),
            sku: id.to_string(),
            name: id.to_string(),
            price,
            description: None,
            category: None,
            style: None,
            material: None,
            face_shape_recommendation: None,
            keywords: None,
            image_url: None,
            is_available: true,
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn test_catalog_keeps_insertion_order_and_limit() {
        let catalog = InMemoryCatalog::with_products(vec![
            product("c", 3),
            product("a", 1),
            product("b", 2),
        ]);
        let all = catalog
            .query_products(&ProductFilter::default(), None)
            .await
            .unwrap();
        let ids: Vec<&str> = all.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);

        let two = catalog
            .query_products(&ProductFilter::default(), Some(2))
            .await
            .unwrap();
        assert_eq!(two.len(), 2);
    }

    #[tokio::test]
    async fn test_catalog_soft_delete_hides_product() {
        let catalog = InMemoryCatalog::with_products(vec![product("a", 1), product("b", 2)]);
        assert!(catalog.soft_delete("a", 100));
        assert!(!catalog.soft_delete("missing", 100));
        let rows = catalog
            .query_products(&ProductFilter::default(), None)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "b");
    }

    #[tokio::test]
    async fn test_preference_store_identity_kinds_are_disjoint() {
        let store = InMemoryPreferenceStore::new();
        let record = PreferenceRecord {
            identity: Identity::Session("42".to_string()),
            preferences: PreferenceDelta::default(),
            created_at: 1,
            updated_at: None,
        };
        store.save_preference(&record).await.unwrap();

        assert!(store
            .find_preference(&Identity::Session("42".to_string()))
            .await
            .unwrap()
            .is_some());
        assert!(store
            .find_preference(&Identity::Account("42".to_string()))
            .await
            .unwrap()
            .is_none());
        assert_eq!(store.write_count(), 1);
    }
}
