//! Inline script for the generated page.
//!
//! Deliberately limited to view affordances: section collapse, the
//! collapse-all toggle, and smooth scrolling from the navigation links.
//! Filtering, counting, and ordering are computed before the page is
//! written; the script never re-derives them.

/// Inline JavaScript to include in the document.
pub fn page_script() -> &'static str {
    PAGE_SCRIPT
}

const PAGE_SCRIPT: &str = r#"
const $$ = (sel) => document.querySelectorAll(sel);

// Section headers collapse their own body.
$$('#filters section > h3').forEach((header) => {
  header.addEventListener('click', () => {
    const body = header.nextElementSibling;
    if (body) body.hidden = !body.hidden;
  });
});

// Collapse-all toggles every section body at once.
const collapseAllBtn = document.getElementById('collapseAllBtn');
if (collapseAllBtn) {
  collapseAllBtn.addEventListener('click', () => {
    $$('#filters section > div').forEach((body) => {
      body.hidden = !body.hidden;
    });
  });
}

// Smooth scroll from the class navigation.
const toc = document.getElementById('toc');
if (toc) {
  toc.addEventListener('click', (event) => {
    if (event.target.tagName !== 'A') return;
    event.preventDefault();
    const target = document.getElementById(event.target.getAttribute('href').slice(1));
    if (target) target.scrollIntoView({ behavior: 'smooth', block: 'start' });
  });
}
"#;
