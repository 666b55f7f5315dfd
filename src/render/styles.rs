//! Embedded stylesheet for the generated page.

/// Critical CSS inlined in the document so the page works as a single file.
pub fn page_styles() -> &'static str {
    PAGE_STYLES
}

const PAGE_STYLES: &str = r#"
:root {
  --bg: #f6f7f9;
  --panel: #ffffff;
  --ink: #1f2430;
  --muted: #6b7280;
  --accent: #2f6f4f;
  --chip: #e7efe9;
  --border: #d9dde3;
}

* { box-sizing: border-box; }

body {
  margin: 0;
  background: var(--bg);
  color: var(--ink);
  font-family: system-ui, -apple-system, "Segoe UI", sans-serif;
  line-height: 1.45;
}

.page-header {
  display: flex;
  align-items: baseline;
  gap: 0.75rem;
  padding: 1rem 1.5rem;
  background: var(--panel);
  border-bottom: 1px solid var(--border);
}

.page-header h1 { margin: 0; font-size: 1.35rem; }
.meta { color: var(--muted); font-size: 0.85rem; }

.layout {
  display: grid;
  grid-template-columns: 290px 1fr;
  gap: 1.25rem;
  padding: 1.25rem 1.5rem;
  align-items: start;
}

.sidebar {
  background: var(--panel);
  border: 1px solid var(--border);
  border-radius: 8px;
  padding: 0.75rem 1rem;
  position: sticky;
  top: 1rem;
  max-height: calc(100vh - 2rem);
  overflow-y: auto;
}

.toolbar {
  display: flex;
  flex-wrap: wrap;
  gap: 0.5rem;
  margin-bottom: 0.75rem;
}

.toolbar input[type="search"] {
  flex: 1 1 100%;
  padding: 0.45rem 0.6rem;
  border: 1px solid var(--border);
  border-radius: 6px;
}

.toolbar button, .toolbar select {
  padding: 0.35rem 0.6rem;
  border: 1px solid var(--border);
  border-radius: 6px;
  background: var(--panel);
  cursor: pointer;
}

.toc { display: flex; flex-wrap: wrap; gap: 0.4rem; margin-bottom: 0.75rem; }
.toc a { color: var(--accent); font-size: 0.85rem; text-decoration: none; }
.toc a:hover { text-decoration: underline; }

#filters section { border-top: 1px solid var(--border); padding-top: 0.5rem; }
#filters h3 { margin: 0.4rem 0; font-size: 0.85rem; letter-spacing: 0.05em; cursor: pointer; }

.radio-group {
  border: 1px solid var(--border);
  border-radius: 6px;
  margin: 0 0 0.6rem;
  padding: 0.4rem 0.6rem;
}

.radio-group legend { font-size: 0.8rem; color: var(--muted); padding: 0 0.25rem; }
.radio-group label { display: block; font-size: 0.85rem; padding: 0.1rem 0; }
.count { color: var(--muted); font-size: 0.8rem; }

.active-filters { display: flex; flex-wrap: wrap; gap: 0.4rem; margin-bottom: 0.75rem; }

.chip {
  background: var(--chip);
  border: 1px solid var(--border);
  border-radius: 999px;
  padding: 0.15rem 0.6rem;
  font-size: 0.8rem;
}

.chip button {
  border: none;
  background: none;
  cursor: pointer;
  color: var(--muted);
  font-size: 0.9rem;
  padding: 0 0 0 0.3rem;
}

.cards {
  display: grid;
  grid-template-columns: repeat(auto-fill, minmax(220px, 1fr));
  gap: 1rem;
}

.card {
  background: var(--panel);
  border: 1px solid var(--border);
  border-radius: 8px;
  overflow: hidden;
}

.card img, .card .no-image {
  width: 100%;
  height: 160px;
  object-fit: cover;
  display: block;
  background: var(--chip);
}

.card .no-image {
  display: flex;
  align-items: center;
  justify-content: center;
  color: var(--muted);
  font-size: 0.8rem;
}

.card-content { padding: 0.6rem 0.75rem 0.8rem; }
.card-content h3 { margin: 0 0 0.4rem; font-size: 1rem; }

.tags { display: flex; flex-wrap: wrap; gap: 0.3rem; }

.tag {
  background: var(--chip);
  border-radius: 4px;
  padding: 0.1rem 0.4rem;
  font-size: 0.72rem;
  color: var(--ink);
}

.empty {
  grid-column: 1 / -1;
  text-align: center;
  color: var(--muted);
  padding: 3rem 0;
}

@media (max-width: 760px) {
  .layout { grid-template-columns: 1fr; }
  .sidebar { position: static; max-height: none; }
}
"#;
