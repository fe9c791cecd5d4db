//! Content fingerprints of booking tables.

use std::fmt;

use polars::prelude::{AnyValue, DataFrame};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::polars_utils::any_to_string;

/// Marker hashed in place of a null cell so that null and `""` differ.
const NULL_MARKER: &[u8] = b"\x00null\x00";

/// SHA-256 hex digest identifying a table's content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableFingerprint(String);

impl TableFingerprint {
    /// Fingerprint of raw file bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode(Sha256::digest(bytes)))
    }

    /// Fingerprint of an in-memory table: column names, types and cell text.
    pub fn of_frame(df: &DataFrame) -> Self {
        let mut hasher = Sha256::new();
        for column in df.get_columns() {
            hasher.update(column.name().as_bytes());
            hasher.update(b"\x1f");
            hasher.update(column.dtype().to_string().as_bytes());
            hasher.update(b"\x1e");
            for idx in 0..column.len() {
                match column.get(idx).unwrap_or(AnyValue::Null) {
                    AnyValue::Null => hasher.update(NULL_MARKER),
                    value => hasher.update(any_to_string(value).as_bytes()),
                }
                hasher.update(b"\x1f");
            }
            hasher.update(b"\x1d");
        }
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First twelve hex digits, for log lines.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for TableFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn test_bytes_fingerprint_is_sha256_hex() {
        let fp = TableFingerprint::from_bytes(b"");
        assert_eq!(
            fp.as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(fp.short(), "e3b0c44298fc");
    }

    #[test]
    fn test_frame_fingerprint_tracks_content() {
        let a = df!("hotel" => ["City Hotel", "Resort Hotel"]).unwrap();
        let b = df!("hotel" => ["City Hotel", "Resort Hotel"]).unwrap();
        let c = df!("hotel" => ["City Hotel", "City Hotel"]).unwrap();
        assert_eq!(TableFingerprint::of_frame(&a), TableFingerprint::of_frame(&b));
        assert_ne!(TableFingerprint::of_frame(&a), TableFingerprint::of_frame(&c));
    }

    #[test]
    fn test_frame_fingerprint_separates_null_from_empty() {
        let nulls = df!("country" => [None::<&str>]).unwrap();
        let empty = df!("country" => [Some("")]).unwrap();
        assert_ne!(
            TableFingerprint::of_frame(&nulls),
            TableFingerprint::of_frame(&empty)
        );
    }
}
