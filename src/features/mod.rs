//! Feature construction
//!
//! Turns canonical sensor records plus asset context into the fixed-shape
//! numeric input the models consume. The layout module is the single source
//! of truth for field order and count.

pub mod builder;
pub mod layout;
pub mod matrix;

pub use builder::{build_features, sequence_windows};
pub use layout::{layout_hash, validate_layout, LayoutMismatchError, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION};
pub use matrix::{FeatureMatrix, FeatureRow};
