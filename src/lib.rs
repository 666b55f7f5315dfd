//! Faceted card-gallery browser over a small trait catalog.
//!
//! The pipeline: load the catalog documents, build the trait index, restore
//! the shared state fragment, hydrate item images from Wikidata
//! (best-effort, in parallel), and render a self-contained static gallery
//! page. Every piece short of the rendering layer is a pure function over
//! the catalog and an explicit [`state::AppState`], so the same engine also
//! answers `filter` and `state` queries on the command line.

pub mod catalog;
pub mod cli;
pub mod filter;
pub mod images;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod render;
pub mod state;

pub use cli::{Cli, Commands, StateCmd};

use crate::catalog::Catalog;
use crate::cli::SelectionArgs;
use crate::images::ImageResolver;
use crate::state::{Action, AppState, apply_action};
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Dispatch a parsed invocation.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Build {
            specs,
            db,
            out,
            state,
            offline,
            width,
        } => run_build(&specs, &db, &out, state.as_deref(), offline, width, cli.json).await,
        Commands::Filter {
            db,
            state,
            selection,
            counts,
        } => run_filter(&db, state.as_deref(), &selection, counts, cli.json),
        Commands::State(cmd) => run_state(cmd, cli.json),
        Commands::Resolve { qid, width } => run_resolve(&qid, width, cli.json).await,
        Commands::Ingest {
            endpoint,
            base,
            lang,
            out,
        } => run_ingest(&endpoint, &base, &lang, &out).await,
    }
}

/// Restore state from an optional fragment, then fold selection flags on
/// top. Malformed fragments fall back to defaults by design.
fn restore_state(fragment: Option<&str>, selection: &SelectionArgs) -> Result<AppState> {
    let mut state = fragment.map(state::decode).unwrap_or_default();
    for action in selection.to_actions()? {
        state = apply_action(state, action);
    }
    Ok(state)
}

async fn run_build(
    specs: &Path,
    db: &Path,
    out: &Path,
    fragment: Option<&str>,
    offline: bool,
    width: u32,
    json: bool,
) -> Result<()> {
    let mut catalog = Catalog::load(specs, db).context("loading catalog")?;
    let state = fragment.map(state::decode).unwrap_or_default();

    if offline || images::offline() {
        info!("image hydration skipped (offline)");
    } else {
        let resolver = Arc::new(ImageResolver::new(width)?);
        let resolved = resolver.hydrate(catalog.items()).await;
        let hydrated = resolved.iter().filter(|r| r.is_some()).count();
        info!(hydrated, total = catalog.items().len(), "images hydrated");
        catalog.apply_images(resolved);
    }

    let html = render::render_page(&catalog, &state);
    let path = render::write_page(out, &html).context("writing page")?;

    let shown = filter::apply_filters(catalog.items(), &state.filters, &state.query).len();
    if json {
        println!(
            "{}",
            serde_json::json!({
                "out": path,
                "shown": shown,
                "total": catalog.items().len(),
            })
        );
    } else {
        println!(
            "wrote {} ({shown} of {} items shown)",
            path.display(),
            catalog.items().len()
        );
    }
    Ok(())
}

fn run_filter(
    db: &Path,
    fragment: Option<&str>,
    selection: &SelectionArgs,
    with_counts: bool,
    json: bool,
) -> Result<()> {
    let items = catalog::load_items(db).context("loading catalog")?;
    let state = restore_state(fragment, selection)?;

    let trait_map = filter::build_trait_index(&items);
    let filtered = filter::apply_filters(&items, &state.filters, &state.query);
    let counts = with_counts.then(|| filter::compute_counts(&filtered, &trait_map));

    if json {
        let mut payload = serde_json::json!({
            "total": filtered.len(),
            "items": filtered,
            "state": serde_json::json!({
                "filters": state.filters,
                "q": state.query,
                "sort": state.sort,
            }),
        });
        if let Some(counts) = &counts {
            payload["counts"] = serde_json::to_value(counts)?;
        }
        println!("{payload}");
        return Ok(());
    }

    for item in &filtered {
        println!("{}", item.name);
    }
    if filtered.is_empty() {
        eprintln!("no items match");
    }
    if let Some(counts) = &counts {
        for (class, class_counts) in counts {
            for (descriptor, tally) in class_counts {
                let rendered = tally
                    .iter()
                    .filter(|(key, _)| !key.is_empty())
                    .map(|(key, n)| format!("{key}={n}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("# {class}:{descriptor}  {rendered}");
            }
        }
    }
    Ok(())
}

fn run_state(cmd: StateCmd, json: bool) -> Result<()> {
    match cmd {
        StateCmd::Encode { selection } => {
            let state = restore_state(None, &selection)?;
            println!("{}", state::encode(&state));
        }
        StateCmd::Decode { fragment } => {
            let state = state::decode(&fragment);
            let payload = serde_json::json!({
                "filters": state.filters,
                "q": state.query,
                "sort": state.sort,
            });
            if json {
                println!("{payload}");
            } else {
                println!("{}", serde_json::to_string_pretty(&payload)?);
            }
        }
        StateCmd::Apply {
            fragment,
            clear_all,
            selection,
            remove,
        } => {
            let mut state = state::decode(&fragment);
            if clear_all {
                state = apply_action(state, Action::ClearAll);
            }
            for action in selection.to_actions()? {
                state = apply_action(state, action);
            }
            for raw in &remove {
                let selector = cli::parse_selector(raw, false)?;
                state = apply_action(
                    state,
                    Action::Clear {
                        class: selector.class,
                        descriptor: selector.descriptor,
                    },
                );
            }
            println!("{}", state::encode(&state));
        }
    }
    Ok(())
}

async fn run_resolve(qid: &str, width: u32, json: bool) -> Result<()> {
    let resolver = ImageResolver::new(width)?;
    let resolved = resolver.resolve(qid).await;
    if json {
        println!("{}", serde_json::json!({ "qid": qid, "image": resolved }));
        return Ok(());
    }
    match resolved {
        Some(url) => println!("{url}"),
        None => println!("no image for {qid}"),
    }
    Ok(())
}

async fn run_ingest(endpoint: &str, base: &str, lang: &str, out: &Path) -> Result<()> {
    let count = ingest::run(endpoint, base, lang, out).await?;
    println!("saved {count} items to {}", out.display());
    Ok(())
}
