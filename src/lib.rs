//! # HeightSense
//!
//! Real-time body-height estimation over a WebSocket stream.
//!
//! Each connection gets its own measurement session: streamed body-landmark
//! observations are auto-calibrated against a torso-length reference, turned
//! into head-to-foot readings, smoothed by a 1-D Kalman filter, and scored
//! for confidence. Every inbound frame produces exactly one outbound JSON
//! message.
//!
//! ## Pipeline
//!
//! ```text
//! frame ──► LandmarkSource ──► GeometryExtractor ──► Calibrator
//!                                                ──► HeightEstimator
//!                                                ──► HeightFilter
//!                                                ──► ConfidenceScorer ──► message
//! ```
//!
//! ## Example
//!
//! ```rust
//! use heightsense::session::{FrameOutcome, Session, SessionConfig};
//! use heightsense::source::SyntheticSource;
//!
//! let mut session = Session::new(
//!     SessionConfig::default(),
//!     Box::new(SyntheticSource::default()),
//! );
//! match session.process_frame(&[]) {
//!     FrameOutcome::Calibrating { progress, .. } => assert!(progress <= 100),
//!     _ => unreachable!("first frame always calibrates"),
//! }
//! ```

pub mod api;
pub mod calibration;
pub mod confidence;
pub mod filter;
pub mod geometry;
pub mod height;
pub mod landmarks;
pub mod session;
pub mod source;

pub use api::{create_router, AppState};
pub use calibration::{CalibrationConfig, CalibrationState, Calibrator};
pub use confidence::{ConfidenceConfig, ConfidenceScorer};
pub use filter::HeightFilter;
pub use geometry::{AnatomicalReference, FootSource, GeometryConfig, GeometryExtractor};
pub use height::{format_feet_inches, HeightConfig, HeightEstimator};
pub use landmarks::{Landmark, LandmarkIndex, LandmarkSet, Point};
pub use session::{FrameOutcome, HeightReading, Session, SessionConfig};
pub use source::{Detection, LandmarkSource, SourceError, SourceFactory};

/// Crate version, reported by the banner and health endpoints.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
