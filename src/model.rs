//! Catalog entity structs and the shared facet type aliases.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

/// Reserved filter value meaning "item has no value for this descriptor".
pub const UNKNOWN_VALUE: &str = "__unknown__";

/// Label shown for the unknown sentinel in rendered controls and chips.
pub const UNKNOWN_LABEL: &str = "Other / not recorded";

/// Header metadata for the generated page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Specs {
    pub title: String,
    pub version: String,
}

/// One catalog entry. Identity is positional within the catalog; the only
/// mutation after load is image-URL patching from the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    /// Fallback image URL; kept as-is when resolution yields nothing.
    #[serde(default)]
    pub image: String,
    /// External Wikidata QID used for image lookup.
    #[serde(default)]
    pub wikidata: Option<String>,
    /// class -> descriptor -> value.
    #[serde(default)]
    pub traits: BTreeMap<String, BTreeMap<String, String>>,
}

/// class -> descriptor -> set of values observed anywhere in the catalog.
pub type TraitMap = BTreeMap<String, BTreeMap<String, BTreeSet<String>>>;

/// class -> descriptor -> chosen value (a real value or [`UNKNOWN_VALUE`]).
/// A class key exists only while it has at least one constrained descriptor.
pub type SelectedFilters = BTreeMap<String, BTreeMap<String, String>>;

/// class -> descriptor -> value/unknown/"" -> tally over the filtered set.
/// The empty-string key holds the filtered-set total.
pub type Counts = BTreeMap<String, BTreeMap<String, BTreeMap<String, usize>>>;

/// Ordering applied to filter groups within a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Descriptors ordered lexicographically.
    #[default]
    Alpha,
    /// Descriptors ordered by how many distinct values survive the current
    /// filter, most informative first.
    Info,
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortMode::Alpha => write!(f, "alpha"),
            SortMode::Info => write!(f, "info"),
        }
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alpha" => Ok(SortMode::Alpha),
            "info" => Ok(SortMode::Info),
            other => Err(format!("unknown sort mode '{other}' (expected alpha or info)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // =========================
    // Item Tests
    // =========================

    #[test]
    fn item_serde_roundtrip() {
        let item = Item {
            name: "Oak".to_string(),
            image: "images/oak.jpg".to_string(),
            wikidata: Some("Q12004".to_string()),
            traits: BTreeMap::from([(
                "genus".to_string(),
                BTreeMap::from([("family".to_string(), "Fagaceae".to_string())]),
            )]),
        };

        let json = serde_json::to_string(&item).unwrap();
        let deserialized: Item = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized, item);
    }

    #[test]
    fn item_optional_fields_default() {
        let item: Item = serde_json::from_value(json!({"name": "Pine"})).unwrap();

        assert_eq!(item.name, "Pine");
        assert_eq!(item.image, "");
        assert!(item.wikidata.is_none());
        assert!(item.traits.is_empty());
    }

    #[test]
    fn item_with_unicode_name() {
        let item: Item = serde_json::from_value(json!({"name": "Jacarandá-mimoso"})).unwrap();
        assert_eq!(item.name, "Jacarandá-mimoso");
    }

    #[test]
    fn item_rejects_missing_name() {
        let err = serde_json::from_value::<Item>(json!({"image": "x.jpg"}));
        assert!(err.is_err());
    }

    // =========================
    // Specs Tests
    // =========================

    #[test]
    fn specs_serde_roundtrip() {
        let specs = Specs {
            title: "Tree Traits".to_string(),
            version: "1.4.0".to_string(),
        };

        let json = serde_json::to_string(&specs).unwrap();
        let deserialized: Specs = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.title, "Tree Traits");
        assert_eq!(deserialized.version, "1.4.0");
    }

    // =========================
    // SortMode Tests
    // =========================

    #[test]
    fn sort_mode_display_and_parse() {
        assert_eq!(SortMode::Alpha.to_string(), "alpha");
        assert_eq!(SortMode::Info.to_string(), "info");
        assert_eq!("alpha".parse::<SortMode>().unwrap(), SortMode::Alpha);
        assert_eq!("info".parse::<SortMode>().unwrap(), SortMode::Info);
        assert!("newest".parse::<SortMode>().is_err());
    }

    #[test]
    fn sort_mode_serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&SortMode::Info).unwrap(), "\"info\"");
        let parsed: SortMode = serde_json::from_str("\"alpha\"").unwrap();
        assert_eq!(parsed, SortMode::Alpha);
    }

    #[test]
    fn sort_mode_default_is_alpha() {
        assert_eq!(SortMode::default(), SortMode::Alpha);
    }
}
