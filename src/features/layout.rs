//! Feature layout - centralized feature definition
//!
//! This file controls the feature schema. Any change to the names, the
//! order, or the count MUST increment [`FEATURE_VERSION`]: persisted model
//! artifacts embed the version and hash, and load refuses mismatches.

use crc32fast::Hasher;

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

/// Feature names in the exact order they appear in a row
pub const FEATURE_LAYOUT: &[&str] = &[
    // Sensor channels (0-4)
    "temperature",
    "vibration",
    "pressure",
    "humidity",
    "strain",
    // Asset metadata (5-7)
    "asset_age_months",
    "months_since_maintenance",
    "asset_type_encoded",
];

/// Total number of features per row
/// IMPORTANT: must match FEATURE_LAYOUT.len()
pub const FEATURE_COUNT: usize = 8;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over version + ordered feature names; detects layout mismatches
/// between a persisted artifact and the running code.
pub fn layout_hash() -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[FEATURE_VERSION]);
    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }
    hasher.finalize()
}

// ============================================================================
// VALIDATION
// ============================================================================

/// A persisted artifact was produced under a different feature layout
#[derive(Debug, Clone, thiserror::Error)]
#[error(
    "feature layout mismatch: expected v{expected_version} (hash {expected_hash:08x}), \
     got v{actual_version} (hash {actual_hash:08x})"
)]
pub struct LayoutMismatchError {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

pub fn validate_layout(version: u8, hash: u32) -> Result<(), LayoutMismatchError> {
    let current = layout_hash();
    if version != FEATURE_VERSION || hash != current {
        return Err(LayoutMismatchError {
            expected_version: FEATURE_VERSION,
            expected_hash: current,
            actual_version: version,
            actual_hash: hash,
        });
    }
    Ok(())
}

/// Feature index by name (O(n) but the list is tiny)
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

/// Feature name by index
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}

// ============================================================================
// TESTS
// ============================================================================
