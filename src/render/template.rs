//! Page shell assembly and text escaping.
//!
//! No template engine: the document is assembled with `format!` and
//! `push_str`, critical CSS and the page script are inlined so the output
//! is a single self-contained file, and every interpolated string goes
//! through [`html_escape`].

use super::{scripts, styles};
use crate::model::Specs;

/// Escape text for interpolation into HTML content or attribute values.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Anchor-safe slug for section ids: lowercased, runs of anything outside
/// `[a-z0-9]` collapse to a single dash.
pub fn slug(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut dash_pending = false;
    for ch in s.to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            if dash_pending && !out.is_empty() {
                out.push('-');
            }
            dash_pending = false;
            out.push(ch);
        } else {
            dash_pending = true;
        }
    }
    out
}

/// Assemble the full document around the rendered body.
pub fn page(specs: &Specs, body: &str) -> String {
    let title = html_escape(&specs.title);
    let version = html_escape(&specs.version);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
{styles}
</style>
</head>
<body>
<header class="page-header">
  <h1 id="appTitle">{title}</h1>
  <span id="meta" class="meta">v{version}</span>
</header>
{body}
<script>
{script}
</script>
</body>
</html>
"#,
        styles = styles::page_styles(),
        script = scripts::page_script(),
    )
}
