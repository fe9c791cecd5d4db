//! Enriched-table cache keyed by table content.
//!
//! The cache holds at most one enriched table. It is recomputed when the
//! source fingerprint or the derivation options change, never on a timer.

use std::sync::Arc;

use booking_ingest::{SourceTable, TableFingerprint};
use booking_model::DerivationOptions;
use tracing::{debug, info};

use crate::error::Result;
use crate::pipeline::{EnrichedTable, derive_features};

/// Identity of a cached derivation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub fingerprint: TableFingerprint,
    pub options: DerivationOptions,
}

#[derive(Debug)]
struct CacheEntry {
    key: CacheKey,
    table: Arc<EnrichedTable>,
}

/// Holds the enriched table for the current source.
#[derive(Debug, Default)]
pub struct EnrichedCache {
    entry: Option<CacheEntry>,
    hits: u64,
    misses: u64,
}

impl EnrichedCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached enriched table for `source`, deriving it first
    /// when the source content or options differ from the cached key.
    ///
    /// # Errors
    ///
    /// Propagates derivation failures; the previous entry is kept.
    pub fn get_or_derive(
        &mut self,
        source: &SourceTable,
        options: &DerivationOptions,
    ) -> Result<Arc<EnrichedTable>> {
        let key = CacheKey {
            fingerprint: source.fingerprint().clone(),
            options: *options,
        };
        if let Some(entry) = &self.entry
            && entry.key == key
        {
            self.hits += 1;
            debug!(fingerprint = key.fingerprint.short(), "enriched table cache hit");
            return Ok(Arc::clone(&entry.table));
        }

        self.misses += 1;
        info!(fingerprint = key.fingerprint.short(), "deriving enriched table");
        let table = Arc::new(derive_features(source.frame(), options)?);
        self.entry = Some(CacheEntry {
            key,
            table: Arc::clone(&table),
        });
        Ok(table)
    }

    /// Drops the cached table.
    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            debug!("enriched table cache invalidated");
        }
    }

    pub fn key(&self) -> Option<&CacheKey> {
        self.entry.as_ref().map(|entry| &entry.key)
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
