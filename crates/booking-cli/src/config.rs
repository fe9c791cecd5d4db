//! Dashboard configuration file.
//!
//! Every section is optional; missing sections and fields take their
//! defaults. Command-line flags are applied on top of the loaded file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use booking_ingest::IngestOptions;
use booking_model::{DerivationOptions, ImpactAssumptions, ProfileOptions};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub ingest: IngestOptions,
    pub profile: ProfileOptions,
    pub derivation: DerivationOptions,
    pub impact: ImpactAssumptions,
}

impl DashboardConfig {
    /// Reads a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read, is not valid JSON, has unknown
    /// sections or holds invalid profile options.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parse config {}", path.display()))?;
        config
            .profile
            .validate()
            .with_context(|| format!("validate config {}", path.display()))?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Loads `path` when given, defaults otherwise.
    ///
    /// # Errors
    ///
    /// See [`DashboardConfig::load`].
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}
