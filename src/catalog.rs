//! Read-only access to the two catalog documents.
//!
//! Loads `specs.json` (page metadata) and `database.json` (the item array).
//! Either document failing to read or parse fails the whole run; there is no
//! partial-degradation path.

use crate::model::{Item, Specs};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading or validating the catalog documents.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("reading {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing {path}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("item {index} has an empty name")]
    EmptyName { index: usize },
}

/// The immutable item list plus its page metadata.
#[derive(Debug, Clone)]
pub struct Catalog {
    specs: Specs,
    items: Vec<Item>,
}

impl Catalog {
    pub fn load(specs_path: &Path, db_path: &Path) -> Result<Self, CatalogError> {
        let specs: Specs = read_json(specs_path)?;
        let items = load_items(db_path)?;
        debug!(
            title = %specs.title,
            items = items.len(),
            "catalog loaded"
        );
        Ok(Self { specs, items })
    }

    pub fn specs(&self) -> &Specs {
        &self.specs
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Patch item images from resolver output, positionally aligned with
    /// [`Catalog::items`]. `None` leaves the pre-existing fallback untouched.
    pub fn apply_images(&mut self, resolved: Vec<Option<String>>) {
        for (item, url) in self.items.iter_mut().zip(resolved) {
            if let Some(url) = url {
                item.image = url;
            }
        }
    }
}

/// Load and validate the item array on its own (the `filter` command does not
/// need the specs document).
pub fn load_items(db_path: &Path) -> Result<Vec<Item>, CatalogError> {
    let items: Vec<Item> = read_json(db_path)?;
    for (index, item) in items.iter().enumerate() {
        if item.name.trim().is_empty() {
            return Err(CatalogError::EmptyName { index });
        }
    }
    Ok(items)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
        path: path.display().to_string(),
        source,
    })
}
