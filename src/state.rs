//! Application state, the action reducer, and the URL-fragment codec.
//!
//! The selection, search text, and sort mode are the only per-session
//! mutable state. They live in an explicit [`AppState`] threaded through the
//! pure filter functions; rendering consumes the state but never owns it.
//! The shareable form is a percent-encoded JSON fragment with an explicit
//! schema version.

use crate::model::{SelectedFilters, SortMode, UNKNOWN_VALUE};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Current fragment schema version. Encode always writes this; decode
/// accepts it, migrates the unversioned legacy layout, and discards
/// anything newer.
const STATE_VERSION: u64 = 1;

/// The per-session state restored from and persisted to the fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub filters: SelectedFilters,
    pub query: String,
    pub sort: SortMode,
}

/// One user interaction on the gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Check a value radio. An empty value is the "All" option and clears
    /// the constraint instead.
    Select {
        class: String,
        descriptor: String,
        value: String,
    },
    /// Reset one radio group to "All" (chip removal takes this path too).
    Clear { class: String, descriptor: String },
    /// Replace the search text.
    Search(String),
    /// Switch facet ordering.
    Sort(SortMode),
    /// The clear button: drop every constraint and the search text. The
    /// sort mode is a view preference and survives.
    ClearAll,
}

/// Pure transition: (previous state, one action) -> next state. Maintains
/// the invariant that a class key exists only while it still has at least
/// one constrained descriptor.
pub fn apply_action(mut state: AppState, action: Action) -> AppState {
    match action {
        Action::Select {
            class,
            descriptor,
            value,
        } => {
            if value.is_empty() {
                return apply_action(state, Action::Clear { class, descriptor });
            }
            state
                .filters
                .entry(class)
                .or_default()
                .insert(descriptor, value);
        }
        Action::Clear { class, descriptor } => {
            if let Some(descriptors) = state.filters.get_mut(&class) {
                descriptors.remove(&descriptor);
                if descriptors.is_empty() {
                    state.filters.remove(&class);
                }
            }
        }
        Action::Search(query) => state.query = query,
        Action::Sort(mode) => state.sort = mode,
        Action::ClearAll => {
            state.filters.clear();
            state.query.clear();
        }
    }
    state
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedState {
    v: u64,
    #[serde(default)]
    filters: SelectedFilters,
    #[serde(default)]
    q: String,
    #[serde(default)]
    sort: SortMode,
}

/// Layout written by the pre-versioning page: selection under
/// `selectedFilters`, no sort field.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyPersisted {
    #[serde(default)]
    selected_filters: SelectedFilters,
    #[serde(default)]
    q: String,
}

/// Serialize the state to its shareable fragment form (JSON, then
/// percent-encoded). Never fails: the schema is a closed set of
/// string-keyed maps and plain fields.
pub fn encode(state: &AppState) -> String {
    let persisted = PersistedState {
        v: STATE_VERSION,
        filters: state.filters.clone(),
        q: state.query.clone(),
        sort: state.sort,
    };
    let json = serde_json::to_string(&persisted).unwrap_or_default();
    urlencoding::encode(&json).into_owned()
}

/// Total inverse of [`encode`]: a leading `#` is tolerated, and any
/// malformation — bad percent-encoding, bad JSON, wrong field types, an
/// unknown future version — falls back to the defaults (empty filters,
/// empty search, alphabetical sort). Missing fields default individually.
pub fn decode(fragment: &str) -> AppState {
    let raw = fragment.strip_prefix('#').unwrap_or(fragment).trim();
    if raw.is_empty() {
        return AppState::default();
    }
    let Ok(json) = urlencoding::decode(raw) else {
        debug!("state fragment is not valid percent-encoding, using defaults");
        return AppState::default();
    };
    let Ok(value) = serde_json::from_str::<serde_json::Value>(&json) else {
        debug!("state fragment is not valid JSON, using defaults");
        return AppState::default();
    };

    let version = value.get("v").map(serde_json::Value::as_u64);
    match version {
        Some(Some(STATE_VERSION)) => serde_json::from_value::<PersistedState>(value)
            .map(|p| AppState {
                filters: normalize_filters(p.filters),
                query: p.q,
                sort: p.sort,
            })
            .unwrap_or_else(|err| {
                debug!("state fragment rejected: {err}");
                AppState::default()
            }),
        Some(other) => {
            debug!(?other, "unsupported state version, using defaults");
            AppState::default()
        }
        None => serde_json::from_value::<LegacyPersisted>(value)
            .map(|p| AppState {
                filters: normalize_filters(p.selected_filters),
                query: p.q,
                sort: SortMode::default(),
            })
            .unwrap_or_else(|err| {
                debug!("legacy state fragment rejected: {err}");
                AppState::default()
            }),
    }
}

/// Re-establish the SelectedFilters invariant on decoded input: empty
/// chosen values and emptied-out classes are dropped.
fn normalize_filters(filters: SelectedFilters) -> SelectedFilters {
    filters
        .into_iter()
        .filter_map(|(class, descriptors)| {
            let descriptors: std::collections::BTreeMap<_, _> = descriptors
                .into_iter()
                .filter(|(_, value)| !value.is_empty())
                .collect();
            (!descriptors.is_empty()).then_some((class, descriptors))
        })
        .collect()
}

/// True when the chosen value is the unknown sentinel.
pub fn is_unknown(value: &str) -> bool {
    value == UNKNOWN_VALUE
}
