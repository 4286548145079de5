//! Asset taxonomy and metadata context
//!
//! Data only - the feature builder derives its age/maintenance inputs from
//! `AssetContext`, the predictor never touches raw date strings.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Days assumed since installation when the context carries no date
pub const DEFAULT_INSTALLATION_AGE_DAYS: i64 = 365;

// ============================================================================
// ASSET TYPE
// ============================================================================

/// Supported infrastructure asset categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    Bridge,
    Road,
    Building,
    Tunnel,
    Unknown,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Bridge => "BRIDGE",
            AssetType::Road => "ROAD",
            AssetType::Building => "BUILDING",
            AssetType::Tunnel => "TUNNEL",
            AssetType::Unknown => "UNKNOWN",
        }
    }

    /// Fixed numeric encoding used in the feature layout
    pub fn encode(&self) -> f32 {
        match self {
            AssetType::Bridge => 1.0,
            AssetType::Road => 2.0,
            AssetType::Building => 3.0,
            AssetType::Tunnel => 4.0,
            AssetType::Unknown => 0.0,
        }
    }

    /// Lenient parse - anything unrecognized maps to `Unknown`
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "BRIDGE" => AssetType::Bridge,
            "ROAD" => AssetType::Road,
            "BUILDING" => AssetType::Building,
            "TUNNEL" => AssetType::Tunnel,
            _ => AssetType::Unknown,
        }
    }
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// DATE PARSING
// ============================================================================

/// A date string the adapter handed us that is not ISO-8601
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid ISO-8601 date: {value:?}")]
pub struct InvalidDate {
    pub value: String,
}

/// Parse an ISO-8601 date or datetime string into UTC.
///
/// Accepts full RFC 3339, a naive datetime, or a bare date (midnight UTC).
pub fn parse_iso_date(value: &str) -> Result<DateTime<Utc>, InvalidDate> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(ndt.and_utc());
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(ndt.and_utc());
    }
    if let Ok(nd) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(ndt) = nd.and_hms_opt(0, 0, 0) {
            return Ok(ndt.and_utc());
        }
    }

    Err(InvalidDate {
        value: value.to_string(),
    })
}

// ============================================================================
// ASSET CONTEXT
// ============================================================================

/// Asset metadata the feature builder and rule-based path draw from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetContext {
    pub asset_id: String,
    pub asset_type: AssetType,
    pub installation_date: Option<DateTime<Utc>>,
    pub last_maintenance: Option<DateTime<Utc>>,
}

impl AssetContext {
    pub fn new(asset_id: impl Into<String>, asset_type: AssetType) -> Self {
        Self {
            asset_id: asset_id.into(),
            asset_type,
            installation_date: None,
            last_maintenance: None,
        }
    }

    /// Installation date, defaulting to one year before `now`
    pub fn installation_or_default(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.installation_date
            .unwrap_or_else(|| now - Duration::days(DEFAULT_INSTALLATION_AGE_DAYS))
    }

    /// Maintenance date, defaulting to the installation date
    pub fn maintenance_or_default(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.last_maintenance
            .unwrap_or_else(|| self.installation_or_default(now))
    }

    /// Asset age in months (30-day months)
    pub fn age_months(&self, now: DateTime<Utc>) -> f32 {
        (now - self.installation_or_default(now)).num_days() as f32 / 30.0
    }

    /// Months since the last recorded maintenance (30-day months)
    pub fn months_since_maintenance(&self, now: DateTime<Utc>) -> f32 {
        (now - self.maintenance_or_default(now)).num_days() as f32 / 30.0
    }
}

// ============================================================================
// TESTS
// ============================================================================
