//! Wire types for the measurement WebSocket protocol.
//!
//! All messages are JSON with a `type` tag in `snake_case`. Every inbound
//! frame produces exactly one outbound message, so a client can correlate
//! responses by order alone.

use serde::{Deserialize, Serialize};

use crate::session::{FrameOutcome, HeightReading};

/// Commands a client may send over the WebSocket.
///
/// ## Examples
///
/// ```json
/// {"type": "image", "data": "<base64 jpeg>"}
/// {"type": "reset"}
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// One encoded camera frame, base64-encoded.
    Image {
        /// Base64 payload. A `data:image/...;base64,` prefix is accepted.
        data: String,
    },
    /// Discard calibration and filter state for this session.
    Reset,
}

/// Messages the server sends back, one per inbound frame (plus `reset_ack`
/// and `error`).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Calibration in progress.
    ///
    /// ```json
    /// {"type": "calibrating", "progress": 55, "message": "Stand still..."}
    /// ```
    Calibrating {
        /// Sample-collection progress, whole percent (0–100).
        progress: u8,
        /// Guidance for the person in frame.
        message: String,
    },
    /// A smoothed height reading.
    ///
    /// ```json
    /// {
    ///   "type": "height_update",
    ///   "height_cm": 170.2,
    ///   "height_feet_inches": "5' 7.0\"",
    ///   "confidence": 87.5,
    ///   "method": "toe_span"
    /// }
    /// ```
    HeightUpdate {
        /// Smoothed height in centimeters.
        height_cm: f64,
        /// Feet-and-inches rendering of the same value.
        height_feet_inches: String,
        /// Confidence percentage (0–100).
        confidence: f64,
        /// `toe_span` or `ankle_extrapolated`.
        method: &'static str,
    },
    /// Calibrated but no usable measurement this frame.
    NoPerson {
        /// What was missing.
        message: String,
    },
    /// Acknowledges a reset command.
    ResetAck {
        /// Always 0 after a reset.
        progress: u8,
    },
    /// A frame or command that could not be processed. Session state is
    /// unaffected.
    Error {
        /// Stable machine-readable code.
        code: &'static str,
        /// Human-readable description.
        message: String,
    },
}

impl From<FrameOutcome> for ServerMessage {
    fn from(outcome: FrameOutcome) -> Self {
        match outcome {
            FrameOutcome::Calibrating { progress, message } => ServerMessage::Calibrating {
                progress,
                message: message.to_string(),
            },
            FrameOutcome::Measurement(reading) => reading.into(),
            FrameOutcome::NoPerson { message } => ServerMessage::NoPerson {
                message: message.to_string(),
            },
            FrameOutcome::BadFrame { message } => ServerMessage::Error {
                code: "undecodable_frame",
                message,
            },
        }
    }
}

impl From<HeightReading> for ServerMessage {
    fn from(reading: HeightReading) -> Self {
        ServerMessage::HeightUpdate {
            height_cm: reading.height_cm,
            height_feet_inches: reading.height_display,
            confidence: reading.confidence_pct,
            method: reading.method.as_str(),
        }
    }
}

/// Response body for the health endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process is serving.
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// Seconds since the server started.
    pub uptime_secs: u64,
    /// Currently open measurement sessions.
    pub active_sessions: u64,
    /// Sessions opened since startup.
    pub total_sessions: u64,
    /// Frames processed across all sessions since startup.
    pub frames_processed: u64,
}

/// Response body for the root banner endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct BannerResponse {
    /// Service name.
    pub service: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// WebSocket endpoint path.
    pub websocket: &'static str,
}
