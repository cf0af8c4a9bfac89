//! Static phrase tables used by the extractor.
//!
//! Every table is ordered and evaluated first-match-wins: when an utterance
//! triggers two rules of the same table, the rule listed first decides the
//! tag, regardless of where the phrases occur in the text. All phrases are
//! lowercase and are matched against the lowercased utterance without
//! folding diacritics.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Maps any of `phrases` to the canonical `tag`.
#[derive(Debug, Clone, Copy)]
pub struct TagRule {
    pub tag: &'static str,
    pub phrases: &'static [&'static str],
}

impl TagRule {
    pub fn matches(&self, normalized: &str) -> bool {
        self.phrases.iter().any(|p| normalized.contains(p))
    }
}

/// A named group of single-token synonyms.
#[derive(Debug, Clone, Copy)]
pub struct KeywordBucket {
    pub name: &'static str,
    pub synonyms: &'static [&'static str],
}

pub const STYLE_RULES: &[TagRule] = &[
    TagRule {
        tag: "Round",
        phrases: &["tròn", "round"],
    },
    TagRule {
        tag: "Square",
        phrases: &["vuông", "square"],
    },
    TagRule {
        tag: "Aviator",
        phrases: &["phi công", "aviator"],
    },
    TagRule {
        tag: "Cat Eye",
        phrases: &["cat eye", "mắt mèo"],
    },
];

pub const FACE_SHAPE_RULES: &[TagRule] = &[
    TagRule {
        tag: "Round",
        phrases: &["mặt tròn", "round face"],
    },
    TagRule {
        tag: "Square",
        phrases: &["mặt vuông", "square face"],
    },
    TagRule {
        tag: "Oval",
        phrases: &["mặt oval", "oval face"],
    },
    TagRule {
        tag: "Heart",
        phrases: &["mặt trái xoan", "heart face"],
    },
];

pub const COLOR_RULES: &[TagRule] = &[
    TagRule {
        tag: "Black",
        phrases: &["đen", "black"],
    },
    TagRule {
        tag: "Brown",
        phrases: &["nâu", "brown"],
    },
    TagRule {
        tag: "Gold",
        phrases: &["vàng", "gold"],
    },
    TagRule {
        tag: "Silver",
        phrases: &["bạc", "silver"],
    },
    TagRule {
        tag: "Blue",
        phrases: &["xanh", "blue"],
    },
    TagRule {
        tag: "Pink",
        phrases: &["hồng", "pink"],
    },
];

// Multi-word synonyms never equal a single token; they are kept so the
// buckets read the same as the catalog's keyword vocabulary.
pub const KEYWORD_BUCKETS: &[KeywordBucket] = &[
    KeywordBucket {
        name: "thời trang",
        synonyms: &["thời trang", "fashion", "phong cách", "style"],
    },
    KeywordBucket {
        name: "thể thao",
        synonyms: &["thể thao", "sport", "chạy", "đạp xe", "bơi"],
    },
    KeywordBucket {
        name: "công sở",
        synonyms: &["công sở", "văn phòng", "formal", "business", "làm việc"],
    },
    KeywordBucket {
        name: "casual",
        synonyms: &["casual", "hàng ngày", "thường ngày", "đời thường"],
    },
];

/// Product nouns, recorded verbatim as the search term.
pub const SEARCH_TERMS: &[&str] = &["kính", "mắt kính", "gọng kính", "rayban", "oakley", "gucci"];

/// Category phrases, recorded verbatim as the category.
pub const CATEGORY_PHRASES: &[&str] = &["kính mát", "kính cận", "kính thời trang"];

/// Token separators besides whitespace.
pub const TOKEN_SEPARATORS: &[char] = &[',', '.', '!', '?'];

/// Tag of the first rule in `rules` triggered by `normalized`.
pub fn first_tag(rules: &[TagRule], normalized: &str) -> Option<&'static str> {
    rules.iter().find(|r| r.matches(normalized)).map(|r| r.tag)
}

/// First entry of `vocabulary` contained in `normalized`.
pub fn first_phrase(vocabulary: &[&'static str], normalized: &str) -> Option<&'static str> {
    vocabulary.iter().copied().find(|p| normalized.contains(p))
}

/// Bucket name for a single lowercase token.
///
/// A synonym listed in several buckets resolves to the earliest bucket.
pub fn bucket_for(token: &str) -> Option<&'static str> {
    static INDEX: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    let index = INDEX.get_or_init(|| {
        let mut map = HashMap::new();
        for bucket in KEYWORD_BUCKETS {
            for synonym in bucket.synonyms {
                map.entry(*synonym).or_insert(bucket.name);
            }
        }
        map
    });
    index.get(token).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tag_uses_table_order() {
        // "xanh" appears first in the text, but Black precedes Blue in the table.
        assert_eq!(first_tag(COLOR_RULES, "xanh hoặc đen"), Some("Black"));
    }

    #[test]
    fn test_first_tag_none() {
        assert_eq!(first_tag(FACE_SHAPE_RULES, "xin chào"), None);
    }

    #[test]
    fn test_bucket_lookup() {
        assert_eq!(bucket_for("sport"), Some("thể thao"));
        assert_eq!(bucket_for("style"), Some("thời trang"));
        assert_eq!(bucket_for("formal"), Some("công sở"));
        assert_eq!(bucket_for("kính"), None);
    }

    #[test]
    fn test_first_phrase_list_order() {
        // "kính" is listed before "gọng kính" and always wins.
        assert_eq!(first_phrase(SEARCH_TERMS, "gọng kính rayban"), Some("kính"));
        assert_eq!(first_phrase(CATEGORY_PHRASES, "tôi cần kính cận"), Some("kính cận"));
    }
}
