//! Best-effort Wikidata image resolution.
//!
//! Given an item's QID, fetch its entity document, pull the first P18 image
//! claim, and turn the filename into a Commons FilePath URL with a fixed
//! target width. Failures of any kind resolve to `None` and never block or
//! alter filtering or rendering — a card that cannot be hydrated keeps its
//! fallback image.

use crate::model::Item;
use anyhow::{Context, Result};
use lru::LruCache;
use parking_lot::Mutex;
use reqwest::Client;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::debug;

/// Target width passed to the FilePath derivative endpoint.
pub const DEFAULT_IMAGE_WIDTH: u32 = 640;

/// Per-request timeout. Bounds the hydration join so one hung lookup
/// degrades its own card instead of stalling the whole build.
const HTTP_TIMEOUT_SECS: u64 = 5;

/// Negative results are cached too, so capacity covers the whole catalog
/// comfortably while still being bounded.
const CACHE_CAPACITY: usize = 512;

fn entity_base_url() -> String {
    dotenvy::var("CARDEX_ENTITY_BASE_URL")
        .unwrap_or_else(|_| "https://www.wikidata.org/wiki/Special:EntityData".to_string())
}

fn filepath_base_url() -> String {
    dotenvy::var("CARDEX_FILEPATH_BASE_URL")
        .unwrap_or_else(|_| "https://commons.wikimedia.org/wiki/Special:FilePath".to_string())
}

/// Escape hatch for CI and offline runs: skip hydration entirely.
pub fn offline() -> bool {
    dotenvy::var("CARDEX_OFFLINE").is_ok()
}

/// Cached, timeout-bounded QID -> image URL lookup.
pub struct ImageResolver {
    client: Client,
    cache: Mutex<LruCache<String, Option<String>>>,
    width: u32,
}

impl ImageResolver {
    pub fn new(width: u32) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .user_agent(concat!("cardex/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building http client")?;
        let capacity = NonZeroUsize::new(CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Ok(Self {
            client,
            cache: Mutex::new(LruCache::new(capacity)),
            width,
        })
    }

    /// Resolve one QID to an image URL, or `None` when the entity has no
    /// usable image claim or the lookup fails. Both outcomes are memoized
    /// so a QID is never retried within a run. The check-then-insert is not
    /// atomic across the await; duplicate lookups are idempotent and merely
    /// wasteful.
    pub async fn resolve(&self, qid: &str) -> Option<String> {
        if let Some(cached) = self.cache.lock().get(qid) {
            return cached.clone();
        }

        let resolved = match self.lookup(qid).await {
            Ok(url) => url,
            Err(err) => {
                debug!("image lookup for {qid} failed (offline?): {err:#}");
                None
            }
        };
        self.cache.lock().put(qid.to_string(), resolved.clone());
        resolved
    }

    async fn lookup(&self, qid: &str) -> Result<Option<String>> {
        let url = format!("{}/{qid}.json", entity_base_url());
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("fetching entity")?;
        if !response.status().is_success() {
            anyhow::bail!("entity lookup returned {}", response.status());
        }
        let entity: serde_json::Value = response.json().await.context("parsing entity JSON")?;

        let filename = entity
            .get("entities")
            .and_then(|entities| entities.get(qid))
            .and_then(|entity| entity.pointer("/claims/P18/0/mainsnak/datavalue/value"))
            .and_then(serde_json::Value::as_str);

        Ok(filename.map(|name| self.filepath_url(name)))
    }

    /// Commons derivative URL for a media filename, at the configured width.
    pub fn filepath_url(&self, filename: &str) -> String {
        format!(
            "{}/{}?width={}",
            filepath_base_url(),
            urlencoding::encode(filename),
            self.width
        )
    }

    /// Resolve every item in parallel, one task per item with a QID, joined
    /// before rendering. The result is positionally aligned with `items`;
    /// items without a QID resolve to `None` without a network call.
    pub async fn hydrate(self: Arc<Self>, items: &[Item]) -> Vec<Option<String>> {
        let mut tasks = JoinSet::new();
        for (index, item) in items.iter().enumerate() {
            let Some(qid) = item.wikidata.clone() else {
                continue;
            };
            let resolver = Arc::clone(&self);
            tasks.spawn(async move { (index, resolver.resolve(&qid).await) });
        }

        let mut resolved = vec![None; items.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, url)) => resolved[index] = url,
                Err(err) => debug!("image task failed: {err}"),
            }
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn filepath_url_encodes_filename_and_width() {
        let resolver = ImageResolver::new(320).unwrap();
        let url = resolver.filepath_url("Eucalyptus globulus fleurs.jpg");
        assert_eq!(
            url,
            "https://commons.wikimedia.org/wiki/Special:FilePath/Eucalyptus%20globulus%20fleurs.jpg?width=320"
        );
    }

    #[test]
    #[serial]
    fn base_urls_are_env_overridable() {
        unsafe { std::env::set_var("CARDEX_ENTITY_BASE_URL", "http://127.0.0.1:9/entity") };
        unsafe { std::env::set_var("CARDEX_FILEPATH_BASE_URL", "http://127.0.0.1:9/file") };
        let resolver = ImageResolver::new(DEFAULT_IMAGE_WIDTH).unwrap();
        assert_eq!(entity_base_url(), "http://127.0.0.1:9/entity");
        assert!(resolver.filepath_url("x.jpg").starts_with("http://127.0.0.1:9/file/"));
        unsafe { std::env::remove_var("CARDEX_ENTITY_BASE_URL") };
        unsafe { std::env::remove_var("CARDEX_FILEPATH_BASE_URL") };
    }

    #[tokio::test]
    #[serial]
    async fn failed_lookup_is_cached_as_none() {
        // An unroutable base URL makes every lookup fail fast.
        unsafe { std::env::set_var("CARDEX_ENTITY_BASE_URL", "http://127.0.0.1:1/entity") };
        let resolver = ImageResolver::new(DEFAULT_IMAGE_WIDTH).unwrap();

        assert_eq!(resolver.resolve("Q1").await, None);
        assert!(resolver.cache.lock().contains("Q1"));
        // Second resolve is served from cache (no network involved).
        assert_eq!(resolver.resolve("Q1").await, None);
        unsafe { std::env::remove_var("CARDEX_ENTITY_BASE_URL") };
    }

    #[tokio::test]
    async fn hydrate_skips_items_without_qid() {
        let items = vec![
            Item {
                name: "No lookup".to_string(),
                image: "fallback.jpg".to_string(),
                wikidata: None,
                traits: Default::default(),
            },
        ];
        let resolver = Arc::new(ImageResolver::new(DEFAULT_IMAGE_WIDTH).unwrap());

        let resolved = resolver.hydrate(&items).await;
        assert_eq!(resolved, vec![None]);
    }

    #[test]
    #[serial]
    fn offline_reads_the_env_escape_hatch() {
        assert!(!offline());
        unsafe { std::env::set_var("CARDEX_OFFLINE", "1") };
        assert!(offline());
        unsafe { std::env::remove_var("CARDEX_OFFLINE") };
    }
}
