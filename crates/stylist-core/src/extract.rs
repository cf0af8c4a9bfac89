//! Preference extraction from free-text utterances.
//!
//! [`extract`] never fails: text without any trigger yields an empty
//! [`PreferenceDelta`], and unparseable price literals are dropped.
//!
//! # Rules
//!
//! | Field | Source | Policy |
//! |-------|--------|--------|
//! | `keywords` | [`KEYWORD_BUCKETS`](crate::lexicon::KEYWORD_BUCKETS) | per token, deduplicated, first-appearance order |
//! | `style` | [`STYLE_RULES`](crate::lexicon::STYLE_RULES) | first rule wins, face-shape phrases masked |
//! | `face_shape` | [`FACE_SHAPE_RULES`](crate::lexicon::FACE_SHAPE_RULES) | first rule wins |
//! | `color_preference` | [`COLOR_RULES`](crate::lexicon::COLOR_RULES) | first rule wins |
//! | `search_term` | [`SEARCH_TERMS`](crate::lexicon::SEARCH_TERMS) | first listed substring, verbatim |
//! | `category` | [`CATEGORY_PHRASES`](crate::lexicon::CATEGORY_PHRASES) | first listed substring, verbatim |
//! | `price_min` / `price_max` | price grammar | first price phrase only |
//!
//! # Price Grammar
//!
//! ```text
//! (dưới | từ | trên) <digits> [nghìn | ngàn | k | triệu | tr]
//! từ <digits> [unit] (đến | tới) <digits> [unit]
//! ```
//!
//! `nghìn`/`ngàn`/`k` multiply by 1,000 and `triệu`/`tr` by 1,000,000.
//! `dưới N` sets the maximum, `trên N` the minimum. `từ N` sets the minimum,
//! and both bounds when an upper clause follows it directly; each clause
//! carries its own unit.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::lexicon::{
    self, CATEGORY_PHRASES, COLOR_RULES, FACE_SHAPE_RULES, SEARCH_TERMS, STYLE_RULES,
    TOKEN_SEPARATORS,
};
use crate::models::PreferenceDelta;

const UNIT: &str = r"(\s*nghìn|\s*ngàn|\s*k|\s*triệu|\s*tr)?";

/// Price bounds parsed from one price phrase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriceRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

/// Extract every preference signal from `utterance`.
pub fn extract(utterance: &str) -> PreferenceDelta {
    let normalized = utterance.to_lowercase();

    let price = extract_price_range(&normalized).unwrap_or_default();

    let delta = PreferenceDelta {
        search_term: lexicon::first_phrase(SEARCH_TERMS, &normalized).map(String::from),
        category: lexicon::first_phrase(CATEGORY_PHRASES, &normalized).map(String::from),
        style: detect_style(&normalized).map(String::from),
        face_shape: lexicon::first_tag(FACE_SHAPE_RULES, &normalized).map(String::from),
        color_preference: lexicon::first_tag(COLOR_RULES, &normalized).map(String::from),
        keywords: extract_keywords(&normalized),
        price_min: price.min,
        price_max: price.max,
    };

    debug!(fields = delta.field_count(), ?delta, "extracted preferences");
    delta
}

/// Canonical keyword buckets for each token, deduplicated.
pub fn extract_keywords(normalized: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    let tokens = normalized
        .split(|c: char| c.is_whitespace() || TOKEN_SEPARATORS.contains(&c))
        .filter(|t| !t.is_empty());

    for token in tokens {
        if let Some(bucket) = lexicon::bucket_for(token) {
            if !keywords.iter().any(|k| k == bucket) {
                keywords.push(bucket.to_string());
            }
        }
    }
    keywords
}

/// Frame style, ignoring phrases that describe the face.
///
/// "mặt tròn" names a face shape, so its "tròn" must not select the
/// Round frame style.
pub fn detect_style(normalized: &str) -> Option<&'static str> {
    let mut masked = normalized.to_string();
    for rule in FACE_SHAPE_RULES {
        for phrase in rule.phrases {
            masked = masked.replace(phrase, " ");
        }
    }
    lexicon::first_tag(STYLE_RULES, &masked)
}

fn price_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(&format!(r"(?i)(dưới|từ|trên)\s*(\d+){}", UNIT)).expect("valid price pattern")
    })
}

fn upper_bound_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(&format!(
            r"(?i)^từ\s*\d+{}\s*(đến|tới)\s*(\d+){}",
            UNIT, UNIT
        ))
        .expect("valid upper bound pattern")
    })
}

fn unit_multiplier(unit: &str) -> i64 {
    let unit = unit.trim().to_lowercase();
    if unit.contains("nghìn") || unit.contains("ngàn") || unit.contains('k') {
        1_000
    } else if unit.contains("triệu") || unit.contains("tr") {
        1_000_000
    } else {
        1
    }
}

fn scaled(digits: &str, unit: &str) -> Option<i64> {
    digits.parse::<i64>().ok()?.checked_mul(unit_multiplier(unit))
}

/// Parse the first price phrase in `text`.
///
/// Returns `None` when there is no price phrase or its numbers do not
/// parse; a partial range is never produced from a malformed phrase.
pub fn extract_price_range(text: &str) -> Option<PriceRange> {
    let caps = price_pattern().captures(text)?;
    let whole = caps.get(0)?;
    let kind = caps[1].to_lowercase();
    let unit = caps.get(3).map_or("", |m| m.as_str());
    let amount = scaled(&caps[2], unit)?;

    match kind.as_str() {
        "dưới" => Some(PriceRange {
            min: None,
            max: Some(amount),
        }),
        "trên" => Some(PriceRange {
            min: Some(amount),
            max: None,
        }),
        _ => {
            // The upper clause must continue the same "từ" phrase.
            match upper_bound_pattern().captures(&text[whole.start()..]) {
                Some(upper) => {
                    let upper_unit = upper.get(4).map_or("", |m| m.as_str());
                    let max = scaled(&upper[3], upper_unit)?;
                    Some(PriceRange {
                        min: Some(amount),
                        max: Some(max),
                    })
                }
                None => Some(PriceRange {
                    min: Some(amount),
                    max: None,
                }),
            }
        }
    }
}
