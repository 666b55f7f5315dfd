//! Filter sidebar markup: toolbar, class navigation, radio sections, chips.

use super::template::{html_escape, slug};
use crate::model::{Counts, SelectedFilters, SortMode, UNKNOWN_LABEL, UNKNOWN_VALUE};
use crate::state::AppState;
use std::collections::BTreeMap;

type FacetOrder = BTreeMap<String, Vec<String>>;

/// The whole left-hand panel for a given state.
pub fn render_sidebar(
    trait_map: &crate::model::TraitMap,
    counts: &Counts,
    order: &FacetOrder,
    state: &AppState,
) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str("<aside class=\"sidebar\">\n");
    html.push_str(&render_toolbar(state));
    html.push_str(&render_toc(order));
    html.push_str(&render_chips(&state.filters));
    html.push_str(&render_sections(trait_map, counts, order, &state.filters));
    html.push_str("</aside>\n");
    html
}

fn render_toolbar(state: &AppState) -> String {
    let query = html_escape(&state.query);
    let (alpha_sel, info_sel) = match state.sort {
        SortMode::Alpha => (" selected", ""),
        SortMode::Info => ("", " selected"),
    };
    format!(
        r#"<div class="toolbar">
<input id="search" type="search" placeholder="Search by name" value="{query}">
<select id="sortMode" aria-label="Filter ordering">
<option value="alpha"{alpha_sel}>A–Z</option>
<option value="info"{info_sel}>Most informative</option>
</select>
<button id="clearBtn" type="button">Clear</button>
<button id="collapseAllBtn" type="button">Collapse all</button>
</div>
"#
    )
}

fn render_toc(order: &FacetOrder) -> String {
    let mut html = String::from("<nav id=\"toc\" class=\"toc\">");
    for class in order.keys() {
        html.push_str(&format!(
            "<a href=\"#sec-{}\">{}</a>",
            slug(class),
            html_escape(class)
        ));
    }
    html.push_str("</nav>\n");
    html
}

/// One chip per active (class, descriptor) constraint. The data attributes
/// carry the machine-readable target so removal maps back to a clear
/// action on exactly that radio group.
pub fn render_chips(filters: &SelectedFilters) -> String {
    let mut html = String::from("<div id=\"activeFilters\" class=\"active-filters\">");
    for (class, descriptors) in filters {
        for (descriptor, value) in descriptors {
            let label = if crate::state::is_unknown(value) {
                UNKNOWN_LABEL
            } else {
                value.as_str()
            };
            html.push_str(&format!(
                "<span class=\"chip\" data-class=\"{}\" data-descriptor=\"{}\"><strong>{}</strong>: {} = {}<button type=\"button\" aria-label=\"Remove filter\">&times;</button></span>",
                html_escape(class),
                html_escape(descriptor),
                html_escape(class),
                html_escape(descriptor),
                html_escape(label),
            ));
        }
    }
    html.push_str("</div>\n");
    html
}

fn render_sections(
    trait_map: &crate::model::TraitMap,
    counts: &Counts,
    order: &FacetOrder,
    filters: &SelectedFilters,
) -> String {
    let mut html = String::from("<div id=\"filters\">\n");
    for (class, descriptors) in order {
        html.push_str(&format!(
            "<section id=\"sec-{}\">\n<h3 title=\"Click to collapse or expand\">{}</h3>\n<div>\n",
            slug(class),
            html_escape(&class.to_uppercase()),
        ));
        for descriptor in descriptors {
            let values = trait_map
                .get(class)
                .and_then(|d| d.get(descriptor));
            let tally = counts.get(class).and_then(|c| c.get(descriptor));
            let chosen = filters
                .get(class)
                .and_then(|d| d.get(descriptor))
                .map(String::as_str);
            html.push_str(&render_radio_group(class, descriptor, values, tally, chosen));
        }
        html.push_str("</div>\n</section>\n");
    }
    html.push_str("</div>\n");
    html
}

fn render_radio_group(
    class: &str,
    descriptor: &str,
    values: Option<&std::collections::BTreeSet<String>>,
    tally: Option<&BTreeMap<String, usize>>,
    chosen: Option<&str>,
) -> String {
    let group = format!("{class}__{descriptor}");
    let mut html = String::with_capacity(512);
    html.push_str(&format!(
        "<fieldset class=\"radio-group\">\n<legend>{}</legend>\n",
        html_escape(descriptor)
    ));

    // "All" is deliberately uncounted.
    html.push_str(&radio(&group, "", "All", chosen.is_none(), None));
    if let Some(values) = values {
        for value in values {
            let count = tally.and_then(|t| t.get(value)).copied().unwrap_or(0);
            html.push_str(&radio(
                &group,
                value,
                value,
                chosen == Some(value.as_str()),
                Some(count),
            ));
        }
    }
    let unknown_count = tally.and_then(|t| t.get(UNKNOWN_VALUE)).copied().unwrap_or(0);
    html.push_str(&radio(
        &group,
        UNKNOWN_VALUE,
        UNKNOWN_LABEL,
        chosen == Some(UNKNOWN_VALUE),
        Some(unknown_count),
    ));

    html.push_str("</fieldset>\n");
    html
}

fn radio(group: &str, value: &str, label: &str, checked: bool, count: Option<usize>) -> String {
    let id = format!(
        "{}-{}",
        group,
        if value.is_empty() { "all" } else { value }
    );
    let checked_attr = if checked { " checked" } else { "" };
    let count_span = match count {
        Some(n) => format!(" <span class=\"count\">({n})</span>"),
        None => String::new(),
    };
    format!(
        "<label for=\"{id}\"><input id=\"{id}\" type=\"radio\" name=\"{group}\" value=\"{value}\"{checked_attr}> {label}{count_span}</label>\n",
        id = html_escape(&id),
        group = html_escape(group),
        value = html_escape(value),
        checked_attr = checked_attr,
        label = html_escape(label),
    )
}
