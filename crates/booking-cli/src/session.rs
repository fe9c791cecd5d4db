//! One loaded booking file and everything computed from it.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use booking_derive::{EnrichedCache, EnrichedTable};
use booking_ingest::{SourceTable, load_bookings};
use booking_model::{DatasetProfile, DuplicateReport, FilterChoices, FilterCriteria};
use booking_profile::{CategoryValues, detect_duplicates, list_categories, profile_table};
use booking_query::{
    AggregationResult, HeadlineMetrics, ImpactEstimate, Preset, aggregate, apply_filters,
    filter_choices, headline_metrics, impact_estimate,
};
use polars::prelude::DataFrame;
use tracing::{debug, info_span};

use crate::config::DashboardConfig;

/// Owns the source table and the enriched-table cache for it.
#[derive(Debug)]
pub struct Session {
    config: DashboardConfig,
    source: SourceTable,
    cache: EnrichedCache,
    choices: FilterChoices,
}

impl Session {
    /// Loads the booking CSV at `path`.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed.
    pub fn open(path: &Path, config: DashboardConfig) -> Result<Self> {
        let source = load_bookings(path, &config.ingest)
            .with_context(|| format!("load bookings from {}", path.display()))?;
        Self::from_source(source, config)
    }

    /// Wraps an already loaded table.
    ///
    /// # Errors
    ///
    /// Fails when the filter choices cannot be read from the table.
    pub fn from_source(source: SourceTable, config: DashboardConfig) -> Result<Self> {
        let choices = filter_choices(source.frame()).context("list filter choices")?;
        Ok(Self {
            config,
            source,
            cache: EnrichedCache::new(),
            choices,
        })
    }

    pub fn source(&self) -> &SourceTable {
        &self.source
    }

    pub fn cache(&self) -> &EnrichedCache {
        &self.cache
    }

    /// Values and year bounds the filters can take.
    pub fn choices(&self) -> &FilterChoices {
        &self.choices
    }

    /// Re-reads the source file. The enriched table is re-derived on next
    /// use only if the file content changed.
    ///
    /// # Errors
    ///
    /// Fails when the session has no path or the file cannot be loaded.
    pub fn reload(&mut self) -> Result<()> {
        let path = self
            .source
            .path()
            .map(Path::to_path_buf)
            .context("session was not loaded from a file")?;
        let source = load_bookings(&path, &self.config.ingest)
            .with_context(|| format!("reload bookings from {}", path.display()))?;
        if source.fingerprint() != self.source.fingerprint() {
            debug!(fingerprint = source.fingerprint().short(), "source content changed");
        }
        self.choices = filter_choices(source.frame()).context("list filter choices")?;
        self.source = source;
        Ok(())
    }

    /// The enriched table, derived on first use and cached by content.
    ///
    /// # Errors
    ///
    /// Fails when derivation rejects an invalid arrival date.
    pub fn enriched(&mut self) -> Result<Arc<EnrichedTable>> {
        self.cache
            .get_or_derive(&self.source, &self.config.derivation)
            .context("derive booking features")
    }

    /// Profiles the raw table, or the enriched one when `enriched` is set.
    ///
    /// # Errors
    ///
    /// Fails on invalid profile options or a failed derivation.
    pub fn profile(&mut self, enriched: bool) -> Result<DatasetProfile> {
        let options = self.config.profile;
        let profile = if enriched {
            let table = self.enriched()?;
            profile_table(&table.frame, &options)
        } else {
            profile_table(self.source.frame(), &options)
        };
        profile.context("profile bookings")
    }

    /// Exact duplicate rows of the raw table.
    ///
    /// # Errors
    ///
    /// Fails when Polars cannot group the rows.
    pub fn duplicates(&self) -> Result<DuplicateReport> {
        detect_duplicates(self.source.frame()).context("detect duplicate bookings")
    }

    /// Distinct values of each text column.
    ///
    /// # Errors
    ///
    /// Fails when Polars cannot read a text column.
    pub fn categories(&self) -> Result<Vec<CategoryValues>> {
        list_categories(self.source.frame()).context("list category values")
    }

    /// The enriched records that satisfy `criteria`.
    ///
    /// # Errors
    ///
    /// Fails when the year range leaves the observed bounds or derivation
    /// fails.
    pub fn filtered(&mut self, criteria: &FilterCriteria) -> Result<DataFrame> {
        criteria
            .validate(&self.choices)
            .context("check filter criteria")?;
        let table = self.enriched()?;
        apply_filters(&table.frame, criteria).context("filter bookings")
    }

    /// Runs a preset breakdown over the filtered records.
    ///
    /// # Errors
    ///
    /// See [`Session::filtered`].
    pub fn breakdown(
        &mut self,
        preset: Preset,
        criteria: &FilterCriteria,
    ) -> Result<AggregationResult> {
        let span = info_span!("breakdown", preset = %preset);
        let _guard = span.enter();
        let filtered = self.filtered(criteria)?;
        aggregate(&filtered, &preset.breakdown()).with_context(|| format!("aggregate {preset}"))
    }

    /// Headline figures over the filtered records.
    ///
    /// # Errors
    ///
    /// See [`Session::filtered`].
    pub fn headline(&mut self, criteria: &FilterCriteria) -> Result<HeadlineMetrics> {
        let filtered = self.filtered(criteria)?;
        headline_metrics(&filtered).context("compute headline metrics")
    }

    /// Impact of lowering the cancellation rate of the filtered records.
    ///
    /// # Errors
    ///
    /// Fails on an out-of-range reduction or invalid criteria.
    pub fn impact(
        &mut self,
        reduction_points: u32,
        criteria: &FilterCriteria,
    ) -> Result<ImpactEstimate> {
        let filtered = self.filtered(criteria)?;
        impact_estimate(&filtered, reduction_points, &self.config.impact)
            .context("estimate cancellation impact")
    }
}
