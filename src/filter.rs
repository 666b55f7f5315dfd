//! The faceted-filter engine: trait index, filter application, per-value
//! counts, and facet ordering.
//!
//! Everything here is a pure function over the catalog and the current
//! selection. Each render recomputes the filtered set, counts, and facet
//! order from scratch; the catalog is small and bounded, so the
//! O(items x classes x descriptors) pass per action is intentional.

use crate::model::{Counts, Item, SelectedFilters, SortMode, TraitMap, UNKNOWN_VALUE};
use itertools::Itertools;
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Counts key holding the filtered-set total. Internal bookkeeping, never
/// shown in the rendered controls.
pub const TOTAL_KEY: &str = "";

/// One pass over every (class, descriptor, value) triple in the catalog.
/// Input order is irrelevant; the sets deduplicate.
pub fn build_trait_index(items: &[Item]) -> TraitMap {
    let mut map = TraitMap::new();
    for item in items {
        for (class, descriptors) in &item.traits {
            let class_entry = map.entry(class.clone()).or_default();
            for (descriptor, value) in descriptors {
                class_entry
                    .entry(descriptor.clone())
                    .or_default()
                    .insert(value.clone());
            }
        }
    }
    map
}

/// An item passes iff its name contains the trimmed query
/// case-insensitively (empty query always passes) and it satisfies every
/// constrained (class, descriptor) pair. Catalog order is preserved.
pub fn apply_filters<'a>(
    items: &'a [Item],
    filters: &SelectedFilters,
    query: &str,
) -> Vec<&'a Item> {
    let query = query.trim().to_lowercase();
    items
        .iter()
        .filter(|item| {
            if !query.is_empty() && !item.name.to_lowercase().contains(&query) {
                return false;
            }
            satisfies_filters(item, filters)
        })
        .collect()
}

/// The unknown sentinel requires the descriptor to be absent under that
/// class; a concrete value requires an exact match. A missing class lacks
/// every descriptor under it, so it satisfies the sentinel and fails any
/// concrete value.
fn satisfies_filters(item: &Item, filters: &SelectedFilters) -> bool {
    for (class, descriptors) in filters {
        let item_descriptors = item.traits.get(class);
        for (descriptor, chosen) in descriptors {
            if chosen == UNKNOWN_VALUE {
                if item_descriptors.is_some_and(|d| d.contains_key(descriptor)) {
                    return false;
                }
            } else if item_descriptors
                .and_then(|d| d.get(descriptor))
                .map(String::as_str)
                != Some(chosen.as_str())
            {
                return false;
            }
        }
    }
    true
}

/// Tally the filtered set against the full trait index: every known value
/// per (class, descriptor), plus the unknown tally for items lacking that
/// descriptor, plus the [`TOTAL_KEY`] total. Counts answer "what would the
/// result set look like if I additionally constrained this facet".
pub fn compute_counts(filtered: &[&Item], trait_map: &TraitMap) -> Counts {
    let mut counts = Counts::new();
    for (class, descriptors) in trait_map {
        let class_counts = counts.entry(class.clone()).or_default();
        for (descriptor, values) in descriptors {
            let mut by_value: BTreeMap<&str, usize> =
                values.iter().map(|v| (v.as_str(), 0)).collect();
            let mut unknown = 0usize;
            for item in filtered {
                match item.traits.get(class).and_then(|d| d.get(descriptor)) {
                    Some(value) => {
                        if let Some(slot) = by_value.get_mut(value.as_str()) {
                            *slot += 1;
                        }
                    }
                    None => unknown += 1,
                }
            }

            let mut tally: BTreeMap<String, usize> = by_value
                .into_iter()
                .map(|(value, n)| (value.to_string(), n))
                .collect();
            tally.insert(UNKNOWN_VALUE.to_string(), unknown);
            tally.insert(TOTAL_KEY.to_string(), filtered.len());
            class_counts.insert(descriptor.clone(), tally);
        }
    }
    counts
}

/// Distinct keys with a nonzero tally, the total excluded. The unknown
/// sentinel counts as a value when present in the filtered set.
pub fn informativeness(tally: Option<&BTreeMap<String, usize>>) -> usize {
    tally.map_or(0, |t| {
        t.iter()
            .filter(|(key, n)| key.as_str() != TOTAL_KEY && **n > 0)
            .count()
    })
}

/// Per-class descriptor order for rendering. Classes are always ordered
/// lexicographically (the outer map is sorted); within a class, descriptors
/// under an active constraint come first, then the mode's ordering applies
/// within each group (stable, ties lexicographic).
pub fn order_facets(
    trait_map: &TraitMap,
    counts: &Counts,
    filters: &SelectedFilters,
    sort: SortMode,
) -> BTreeMap<String, Vec<String>> {
    trait_map
        .iter()
        .map(|(class, descriptors)| {
            let constrained = filters.get(class);
            let is_constrained =
                |descriptor: &str| constrained.is_some_and(|c| c.contains_key(descriptor));
            let ordered: Vec<String> = match sort {
                SortMode::Alpha => descriptors
                    .keys()
                    .cloned()
                    .sorted_by_key(|d| !is_constrained(d))
                    .collect(),
                SortMode::Info => descriptors
                    .keys()
                    .cloned()
                    .sorted_by_key(|d| {
                        let tally = counts.get(class).and_then(|c| c.get(d));
                        (!is_constrained(d), Reverse(informativeness(tally)))
                    })
                    .collect(),
            };
            (class.clone(), ordered)
        })
        .collect()
}
