//! Card grid and the empty-state indicator.

use super::template::html_escape;
use crate::model::Item;

/// The main panel: one card per passing item, or the empty indicator when
/// nothing passes.
pub fn render_cards(filtered: &[&Item]) -> String {
    let mut html = String::with_capacity(filtered.len() * 512 + 128);
    html.push_str("<main>\n<div id=\"cards\" class=\"cards\">\n");
    if filtered.is_empty() {
        html.push_str("<div id=\"empty\" class=\"empty\">No items match the current filters.</div>\n");
    } else {
        for item in filtered {
            html.push_str(&render_card(item));
        }
    }
    html.push_str("</div>\n</main>\n");
    html
}

fn render_card(item: &Item) -> String {
    let name = html_escape(&item.name);
    let image = if item.image.is_empty() {
        "<div class=\"no-image\">no image</div>".to_string()
    } else {
        format!(
            "<img src=\"{}\" alt=\"{}\" loading=\"lazy\">",
            html_escape(&item.image),
            name
        )
    };

    let mut tags = String::new();
    for (class, descriptors) in &item.traits {
        for (descriptor, value) in descriptors {
            tags.push_str(&format!(
                "<span class=\"tag\">{}: {} = {}</span>",
                html_escape(class),
                html_escape(descriptor),
                html_escape(value)
            ));
        }
    }

    format!(
        "<article class=\"card\">\n{image}\n<div class=\"card-content\">\n<h3>{name}</h3>\n<div class=\"tags\">{tags}</div>\n</div>\n</article>\n"
    )
}
