//! Sensor preprocessing
//!
//! Everything between raw adapter-supplied readings and the canonical
//! records the feature builder consumes: validation/clipping, batch
//! ordering, simulated telemetry, statistical anomaly flags and the
//! per-asset health score.

pub mod anomaly;
pub mod health;
pub mod preprocess;
pub mod simulate;
pub mod types;

pub use anomaly::{detect_anomalies, AnomalyFlag, AnomalySeverity, DEFAULT_THRESHOLD_FACTOR};
pub use health::health_score;
pub use preprocess::{preprocess_batch, validate};
pub use simulate::{simulate, synthesize_for_asset};
pub use types::{RawSensorReading, SensorKind, SensorRecord};
