//! Catalog ingestion from a Wikibase SPARQL endpoint.
//!
//! Pulls every (item, trait class, descriptor, value) statement for the
//! collection root, folds the bindings into catalog items, and writes the
//! item array `database.json` that the catalog store loads.

use crate::model::Item;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

const HTTP_TIMEOUT_SECS: u64 = 30;

/// Statement query against the collection instance. `{base}` is the
/// Wikibase entity base URL, `{lang}` the label language.
const TRAIT_QUERY: &str = r#"
PREFIX wikibase: <http://wikiba.se/ontology#>
PREFIX wd: <{base}/entity/>
PREFIX wdt: <{base}/prop/direct/>
PREFIX p: <{base}/prop/>
PREFIX ps: <{base}/prop/statement/>
PREFIX pq: <{base}/prop/qualifier/>
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>

SELECT ?item ?itemLabel ?propLabel ?descriptorLabel ?valueLabel ?image ?wikidataID
WHERE {
  wd:Q13 wdt:P6 ?item .

  ?item ?propDirect ?descriptor .
  ?prop wikibase:directClaim ?propDirect .
  ?prop wikibase:claim ?pClaim .
  ?prop wikibase:statementProperty ?psProp .

  ?item ?pClaim ?statement .
  ?statement ?psProp ?descriptor .
  ?statement pq:P4 ?value .

  OPTIONAL { ?item wdt:P11 ?image }
  OPTIONAL { ?item wdt:P12 ?wikidataID }

  ?item rdfs:label ?itemLabel .
  FILTER(LANG(?itemLabel) = "{lang}")
  ?descriptor rdfs:label ?descriptorLabel .
  FILTER(LANG(?descriptorLabel) = "{lang}")
  ?value rdfs:label ?valueLabel .
  FILTER(LANG(?valueLabel) = "{lang}")
  ?prop rdfs:label ?propLabel .
  FILTER(LANG(?propLabel) = "{lang}")
}
"#;

#[derive(Debug, Deserialize)]
struct SparqlResponse {
    results: SparqlResults,
}

#[derive(Debug, Deserialize)]
struct SparqlResults {
    bindings: Vec<Binding>,
}

type Binding = BTreeMap<String, BoundValue>;

#[derive(Debug, Deserialize)]
struct BoundValue {
    value: String,
}

/// Fetch the catalog from `endpoint` and write it to `out`. Returns the
/// number of items written.
pub async fn run(endpoint: &str, base: &str, lang: &str, out: &Path) -> Result<usize> {
    let query = TRAIT_QUERY
        .replace("{base}", base.trim_end_matches('/'))
        .replace("{lang}", lang);
    let bindings = fetch_bindings(endpoint, &query).await?;
    debug!(rows = bindings.len(), "sparql rows received");

    let items = fold_bindings(&bindings)?;
    let json = serde_json::to_string_pretty(&items).context("serializing catalog")?;
    tokio::fs::write(out, json)
        .await
        .with_context(|| format!("writing {}", out.display()))?;
    info!(items = items.len(), path = %out.display(), "catalog written");
    Ok(items.len())
}

/// POST the query (`format=json`); long queries do not fit in a URL.
async fn fetch_bindings(endpoint: &str, query: &str) -> Result<Vec<Binding>> {
    let client = Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .user_agent(concat!("cardex/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("building http client")?;

    let response = client
        .post(endpoint)
        .form(&[("query", query), ("format", "json")])
        .send()
        .await
        .context("querying sparql endpoint")?;
    if !response.status().is_success() {
        anyhow::bail!("sparql endpoint returned {}", response.status());
    }

    let parsed: SparqlResponse = response.json().await.context("parsing sparql JSON")?;
    Ok(parsed.results.bindings)
}

/// Fold statement rows into items keyed by the entity QID (last URI
/// fragment). Traits nest as class -> descriptor -> value; the first
/// observed image and external Wikidata id win. The result is sorted
/// case-insensitively by name.
fn fold_bindings(bindings: &[Binding]) -> Result<Vec<Item>> {
    let mut by_qid: BTreeMap<String, Item> = BTreeMap::new();

    for (row, binding) in bindings.iter().enumerate() {
        let qid = last_fragment(required(binding, "item", row)?).to_string();
        let name = required(binding, "itemLabel", row)?;
        let class = required(binding, "propLabel", row)?;
        let descriptor = required(binding, "descriptorLabel", row)?;
        let value = required(binding, "valueLabel", row)?;

        let item = by_qid.entry(qid).or_insert_with(|| Item {
            name: name.to_string(),
            image: String::new(),
            wikidata: None,
            traits: BTreeMap::new(),
        });
        item.traits
            .entry(class.to_string())
            .or_default()
            .insert(descriptor.to_string(), value.to_string());

        if item.image.is_empty()
            && let Some(image) = binding.get("image")
        {
            item.image = image.value.clone();
        }
        if item.wikidata.is_none()
            && let Some(xref) = binding.get("wikidataID")
        {
            item.wikidata = Some(last_fragment(&xref.value).to_string());
        }
    }

    let mut items: Vec<Item> = by_qid.into_values().collect();
    items.sort_by_key(|item| item.name.to_lowercase());
    Ok(items)
}

fn required<'a>(binding: &'a Binding, field: &str, row: usize) -> Result<&'a str> {
    binding
        .get(field)
        .map(|bound| bound.value.as_str())
        .with_context(|| format!("sparql row {row} is missing '{field}'"))
}

fn last_fragment(uri: &str) -> &str {
    uri.trim_end_matches('/').rsplit('/').next().unwrap_or(uri)
}
