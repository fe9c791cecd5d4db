//! Feature derivation for booking tables.
//!
//! [`derive_features`] adds arrival dates, stay and party totals, seasons,
//! lead-time buckets and price bands to a raw table, computing each only
//! when its source columns exist. [`EnrichedCache`] keeps the result for
//! as long as the source content and options stay the same.

pub mod cache;
pub mod capabilities;
pub mod error;
pub mod pipeline;
pub mod report;

pub use cache::{CacheKey, EnrichedCache};
pub use capabilities::{Feature, SchemaCapabilities};
pub use error::{DeriveError, Result};
pub use pipeline::{EnrichedTable, derive_features};
pub use report::{DateIssue, DerivationReport, InvalidDate, MalformedValue, SkippedFeature};
