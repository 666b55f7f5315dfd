//! Command-line surface.

use crate::images::DEFAULT_IMAGE_WIDTH;
use crate::model::{SortMode, UNKNOWN_VALUE};
use crate::state::Action;
use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "cardex",
    version,
    about = "Faceted card-gallery browser over a small trait catalog"
)]
pub struct Cli {
    /// Verbose diagnostic logging.
    #[arg(long, global = true)]
    pub debug: bool,

    /// Machine-readable JSON output where a command prints data.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render the static gallery page.
    Build {
        /// Page metadata document (title, version).
        #[arg(long)]
        specs: PathBuf,
        /// Item array document.
        #[arg(long)]
        db: PathBuf,
        /// Output directory for index.html.
        #[arg(long, default_value = "dist")]
        out: PathBuf,
        /// Restore a shared state fragment before rendering.
        #[arg(long)]
        state: Option<String>,
        /// Skip image hydration (CARDEX_OFFLINE does the same).
        #[arg(long)]
        offline: bool,
        /// Target width for resolved images.
        #[arg(long, default_value_t = DEFAULT_IMAGE_WIDTH)]
        width: u32,
    },
    /// Apply filters to the catalog and print the passing items.
    Filter {
        /// Item array document.
        #[arg(long)]
        db: PathBuf,
        /// Start from a shared state fragment instead of defaults.
        #[arg(long)]
        state: Option<String>,
        #[command(flatten)]
        selection: SelectionArgs,
        /// Include the per-facet counts table.
        #[arg(long)]
        counts: bool,
    },
    /// Inspect or manipulate the shareable state fragment.
    #[command(subcommand)]
    State(StateCmd),
    /// Resolve one Wikidata QID to a Commons image URL.
    Resolve {
        qid: String,
        /// Target width for the derivative image.
        #[arg(long, default_value_t = DEFAULT_IMAGE_WIDTH)]
        width: u32,
    },
    /// Fetch the catalog from a Wikibase SPARQL endpoint.
    Ingest {
        /// SPARQL query service URL.
        #[arg(long)]
        endpoint: String,
        /// Wikibase entity base URL used in the query prefixes.
        #[arg(long, default_value = "https://reflora-traits-test.wikibase.cloud")]
        base: String,
        /// Label language filter.
        #[arg(long, default_value = "pt")]
        lang: String,
        /// Where to write the item array.
        #[arg(long, default_value = "database.json")]
        out: PathBuf,
    },
}

impl Commands {
    /// Commands that talk to the network get the multi-thread runtime.
    pub fn needs_network(&self) -> bool {
        matches!(
            self,
            Commands::Build { .. } | Commands::Resolve { .. } | Commands::Ingest { .. }
        )
    }
}

#[derive(Debug, Subcommand)]
pub enum StateCmd {
    /// Build a fragment from selection flags.
    Encode {
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Print the state a fragment decodes to.
    Decode { fragment: String },
    /// Apply interactions to an existing fragment and print the result.
    Apply {
        fragment: String,
        /// Drop every constraint and the search text first.
        #[arg(long)]
        clear_all: bool,
        #[command(flatten)]
        selection: SelectionArgs,
        /// Reset one radio group to "All": class:descriptor (repeatable).
        #[arg(long = "remove", value_name = "CLASS:DESC")]
        remove: Vec<String>,
    },
}

/// Selection flags shared by `filter`, `state encode`, and `state apply`.
#[derive(Debug, Args, Default)]
pub struct SelectionArgs {
    /// Constrain a facet: class:descriptor=value (repeatable).
    #[arg(long = "select", value_name = "CLASS:DESC=VALUE")]
    pub select: Vec<String>,

    /// Constrain a facet to the unknown sentinel: class:descriptor
    /// (repeatable).
    #[arg(long = "unknown", value_name = "CLASS:DESC")]
    pub unknown: Vec<String>,

    /// Case-insensitive name search.
    #[arg(long)]
    pub search: Option<String>,

    /// Facet ordering: alpha or info.
    #[arg(long)]
    pub sort: Option<SortMode>,
}

impl SelectionArgs {
    /// Translate the flags into reducer actions, selections first.
    pub fn to_actions(&self) -> Result<Vec<Action>> {
        let mut actions = Vec::new();
        for raw in &self.select {
            let selector = parse_selector(raw, true)?;
            actions.push(Action::Select {
                class: selector.class,
                descriptor: selector.descriptor,
                value: selector.value.unwrap_or_default(),
            });
        }
        for raw in &self.unknown {
            let selector = parse_selector(raw, false)?;
            actions.push(Action::Select {
                class: selector.class,
                descriptor: selector.descriptor,
                value: UNKNOWN_VALUE.to_string(),
            });
        }
        if let Some(query) = &self.search {
            actions.push(Action::Search(query.clone()));
        }
        if let Some(sort) = self.sort {
            actions.push(Action::Sort(sort));
        }
        Ok(actions)
    }
}

/// A parsed `class:descriptor[=value]` argument.
#[derive(Debug, PartialEq, Eq)]
pub struct Selector {
    pub class: String,
    pub descriptor: String,
    pub value: Option<String>,
}

/// Parse a facet selector. The value part is split off first so values may
/// contain `:`; class and descriptor may not.
pub fn parse_selector(raw: &str, expects_value: bool) -> Result<Selector> {
    let (target, value) = match raw.split_once('=') {
        Some((target, value)) => (target, Some(value)),
        None => (raw, None),
    };
    if expects_value && value.is_none() {
        bail!("selector '{raw}' is missing '=value' (expected class:descriptor=value)");
    }
    if !expects_value && value.is_some() {
        bail!("selector '{raw}' must not carry a value (expected class:descriptor)");
    }

    let Some((class, descriptor)) = target.split_once(':') else {
        bail!("selector '{raw}' is missing ':' (expected class:descriptor)");
    };
    if class.is_empty() || descriptor.is_empty() || value.is_some_and(str::is_empty) {
        bail!("selector '{raw}' has an empty part");
    }

    Ok(Selector {
        class: class.to_string(),
        descriptor: descriptor.to_string(),
        value: value.map(str::to_string),
    })
}
