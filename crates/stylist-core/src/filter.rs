//! Product filter predicate built from preferences.
//!
//! A [`ProductFilter`] is the conjunction of the base predicate (available
//! and not soft-deleted) and one clause per present preference field.
//! Absent fields impose no constraint, so an empty filter matches every
//! active product.
//!
//! | Field | Clause |
//! |-------|--------|
//! | `style` | `product.style` contains it (case-sensitive) |
//! | `face_shape` | `product.face_shape_recommendation` contains it (case-sensitive) |
//! | `color` | lowercased `product.sku` contains it lowercased, or `product.description` contains it |
//! | `category` | `product.category` contains it (case-sensitive) |
//! | `terms` | any term is in `name`, `description`, or `keywords` (case-insensitive) |
//! | `price_min` / `price_max` | inclusive range on `product.price` |
//!
//! Catalog backends may push any subset of these clauses down to their
//! query engine, but [`ProductFilter::matches`] is the reference semantics.

use serde::Serialize;

use crate::models::{PreferenceDelta, PreferenceRecord, Product};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductFilter {
    pub style: Option<String>,
    pub face_shape: Option<String>,
    pub color: Option<String>,
    pub category: Option<String>,
    /// Keyword buckets followed by the search term, deduplicated.
    pub terms: Vec<String>,
    pub price_min: Option<i64>,
    pub price_max: Option<i64>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        product.is_active()
            && self.matches_price(product.price)
            && clause(&self.style, |style| contains(&product.style, style))
            && clause(&self.face_shape, |shape| {
                contains(&product.face_shape_recommendation, shape)
            })
            && clause(&self.color, |color| {
                product.sku.to_lowercase().contains(&color.to_lowercase())
                    || contains(&product.description, color)
            })
            && clause(&self.category, |category| contains(&product.category, category))
            && self.matches_terms(product)
    }

    pub fn matches_price(&self, price: i64) -> bool {
        self.price_min.map_or(true, |min| price >= min)
            && self.price_max.map_or(true, |max| price <= max)
    }

    fn matches_terms(&self, product: &Product) -> bool {
        if self.terms.is_empty() {
            return true;
        }
        let haystacks: Vec<String> = [
            Some(product.name.as_str()),
            product.description.as_deref(),
            product.keywords.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::to_lowercase)
        .collect();

        self.terms.iter().any(|term| {
            let term = term.to_lowercase();
            haystacks.iter().any(|h| h.contains(&term))
        })
    }
}

fn clause(value: &Option<String>, pred: impl FnOnce(&str) -> bool) -> bool {
    value.as_deref().map_or(true, pred)
}

fn contains(field: &Option<String>, needle: &str) -> bool {
    field.as_deref().is_some_and(|f| f.contains(needle))
}

impl From<&PreferenceDelta> for ProductFilter {
    fn from(delta: &PreferenceDelta) -> Self {
        let mut terms = delta.keywords.clone();
        if let Some(term) = &delta.search_term {
            if !terms.contains(term) {
                terms.push(term.clone());
            }
        }
        ProductFilter {
            style: delta.style.clone(),
            face_shape: delta.face_shape.clone(),
            color: delta.color_preference.clone(),
            category: delta.category.clone(),
            terms,
            price_min: delta.price_min,
            price_max: delta.price_max,
        }
    }
}

impl From<&PreferenceRecord> for ProductFilter {
    fn from(record: &PreferenceRecord) -> Self {
        ProductFilter::from(&record.preferences)
    }
}
