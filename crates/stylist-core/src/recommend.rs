//! Catalog recommendation.
//!
//! The recommender operates entirely through the [`Catalog`] trait, with
//! no database or configuration dependencies. Callers pass either the
//! delta extracted from the current utterance or the merged preference
//! record; both convert into a [`ProductFilter`].
//!
//! # Algorithm
//!
//! 1. Build the filter (base predicate plus one clause per present field).
//! 2. Query the catalog, passing `limit` down as a hint.
//! 3. Re-apply the filter to the returned rows, so a backend that pushes
//!    down only part of the predicate still yields correct results.
//! 4. Truncate to `limit`, preserving catalog order.
//!
//! There is no ranking: ties are broken by catalog order.
//!
//! [`recommend_counted`] skips the pushdown hint in step 2 so it can also
//! report how many products matched before truncation.

use anyhow::Result;
use tracing::debug;

use crate::filter::ProductFilter;
use crate::models::Product;
use crate::store::Catalog;

/// Number of products returned when the caller does not say otherwise.
pub const DEFAULT_LIMIT: usize = 5;

/// Products matching `source`, at most `limit`, in catalog order.
///
/// Returns an empty list (not an error) when nothing matches.
pub async fn recommend<C, F>(catalog: &C, source: F, limit: usize) -> Result<Vec<Product>>
where
    C: Catalog + ?Sized,
    F: Into<ProductFilter>,
{
    let filter: ProductFilter = source.into();
    debug!(?filter, limit, "querying catalog");

    let rows = catalog.query_products(&filter, Some(limit)).await?;
    let products: Vec<Product> = rows
        .into_iter()
        .filter(|p| filter.matches(p))
        .take(limit)
        .collect();

    debug!(count = products.len(), "recommendations selected");
    Ok(products)
}

/// Truncated recommendations plus the number of products that matched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recommendations {
    pub products: Vec<Product>,
    pub total_matches: usize,
}

/// Like [`recommend`], but counts every match before truncating.
pub async fn recommend_counted<C, F>(catalog: &C, source: F, limit: usize) -> Result<Recommendations>
where
    C: Catalog + ?Sized,
    F: Into<ProductFilter>,
{
    let filter: ProductFilter = source.into();
    debug!(?filter, limit, "querying catalog (counted)");

    let mut products: Vec<Product> = catalog
        .query_products(&filter, None)
        .await?
        .into_iter()
        .filter(|p| filter.matches(p))
        .collect();
    let total_matches = products.len();
    products.truncate(limit);

    debug!(count = products.len(), total_matches, "recommendations selected");
    Ok(Recommendations {
        products,
        total_matches,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PreferenceDelta, PreferenceRecord, Identity};
    use crate::store::memory::InMemoryCatalog;
    use async_trait::async_trait;

    fn frame(id: &str, style: &str, price: i64) -> Product {
        Product {
            id: id.to_string(),
            sku: format!("{}_black", id),
            name: format!("Frame {}", id),
            price,
            description: Some("Kính mắt".to_string()),
            category: Some("Casual".to_string()),
            style: Some(style.to_string()),
            material: None,
            face_shape_recommendation: Some("Round,Oval".to_string()),
            keywords: Some("casual".to_string()),
            image_url: None,
            is_available: true,
            deleted_at: None,
        }
    }

    fn catalog() -> InMemoryCatalog {
        let mut hidden = frame("hidden", "Round", 150_000);
        hidden.is_available = false;
        let mut deleted = frame("deleted", "Round", 150_000);
        deleted.deleted_at = Some(1);
        InMemoryCatalog::with_products(vec![
            frame("a", "Round", 90_000),
            hidden,
            frame("b", "Square", 100_000),
            deleted,
            frame("c", "Round", 250_000),
            frame("d", "Aviator", 300_000),
            frame("e", "Square", 450_000),
            frame("f", "Round", 600_000),
            frame("g", "Round", 700_000),
        ])
    }

    #[tokio::test]
    async fn test_empty_delta_returns_active_up_to_limit() {
        let products = recommend(&catalog(), &PreferenceDelta::default(), DEFAULT_LIMIT)
            .await
            .unwrap();
        assert_eq!(products.len(), 5);
        assert!(products.iter().all(|p| p.is_active()));
        let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d", "e"]);
    }

    #[tokio::test]
    async fn test_price_range_only_in_range() {
        let delta = PreferenceDelta {
            price_min: Some(100_000),
            price_max: Some(300_000),
            ..Default::default()
        };
        let products = recommend(&catalog(), &delta, DEFAULT_LIMIT).await.unwrap();
        assert_eq!(products.len(), 3);
        assert!(products
            .iter()
            .all(|p| (100_000..=300_000).contains(&p.price)));
    }

    #[tokio::test]
    async fn test_clauses_combine_with_and() {
        let delta = PreferenceDelta {
            style: Some("Round".to_string()),
            price_min: Some(200_000),
            ..Default::default()
        };
        let products = recommend(&catalog(), &delta, DEFAULT_LIMIT).await.unwrap();
        let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "f", "g"]);
    }

    #[tokio::test]
    async fn test_no_match_is_empty_not_error() {
        let delta = PreferenceDelta {
            style: Some("Cat Eye".to_string()),
            ..Default::default()
        };
        let products = recommend(&catalog(), &delta, DEFAULT_LIMIT).await.unwrap();
        assert!(products.is_empty());
    }

    #[tokio::test]
    async fn test_recommend_from_record() {
        let record = PreferenceRecord {
            identity: Identity::Session("s".to_string()),
            preferences: PreferenceDelta {
                style: Some("Square".to_string()),
                ..Default::default()
            },
            created_at: 0,
            updated_at: None,
        };
        let products = recommend(&catalog(), &record, DEFAULT_LIMIT).await.unwrap();
        assert_eq!(products.len(), 2);
    }

    /// Ignores the filter and the limit entirely.
    struct CarelessCatalog(Vec<Product>);

    #[async_trait]
    impl Catalog for CarelessCatalog {
        async fn query_products(
            &self,
            _filter: &ProductFilter,
            _limit: Option<usize>,
        ) -> Result<Vec<Product>> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_filter_reapplied_over_backend_rows() {
        let mut deleted = frame("x", "Round", 1);
        deleted.deleted_at = Some(5);
        let backend = CarelessCatalog(vec![
            deleted,
            frame("a", "Round", 1),
            frame("b", "Round", 2),
            frame("c", "Round", 3),
        ]);
        let products = recommend(&backend, &PreferenceDelta::default(), 2)
            .await
            .unwrap();
        let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_counted_reports_matches_beyond_limit() {
        let delta = PreferenceDelta {
            style: Some("Round".to_string()),
            ..Default::default()
        };
        let counted = recommend_counted(&catalog(), &delta, 2).await.unwrap();
        let ids: Vec<&str> = counted.products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(counted.total_matches, 4);
    }
}
