//! Static page rendering for the gallery.
//!
//! The renderer consumes a catalog plus an [`AppState`] and produces the
//! complete document for that state: toolbar, class navigation, collapsible
//! radio sections with live counts, active-filter chips, and the card grid.
//! It recomputes the filtered set, counts, and facet order from scratch on
//! every call.

mod cards;
mod controls;
mod scripts;
mod styles;
mod template;

pub use template::{html_escape, slug};

use crate::catalog::Catalog;
use crate::filter::{apply_filters, build_trait_index, compute_counts, order_facets};
use crate::state::AppState;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::debug;

/// Render the full page for one catalog and state.
pub fn render_page(catalog: &Catalog, state: &AppState) -> String {
    let started = Instant::now();
    let trait_map = build_trait_index(catalog.items());
    let filtered = apply_filters(catalog.items(), &state.filters, &state.query);
    let counts = compute_counts(&filtered, &trait_map);
    let order = order_facets(&trait_map, &counts, &state.filters, state.sort);

    let mut body = String::with_capacity(16 * 1024);
    body.push_str("<div class=\"layout\">\n");
    body.push_str(&controls::render_sidebar(&trait_map, &counts, &order, state));
    body.push_str(&cards::render_cards(&filtered));
    body.push_str("</div>\n");

    let html = template::page(catalog.specs(), &body);
    debug!(
        filtered = filtered.len(),
        total = catalog.items().len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "page rendered"
    );
    html
}

/// Write the rendered document as `index.html` under `out_dir`, creating
/// the directory if needed.
pub fn write_page(out_dir: &Path, html: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;
    let path = out_dir.join("index.html");
    std::fs::write(&path, html).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}
