//! Ephemeral perception snapshot of the device.

use chrono::{DateTime, Utc};

/// What the agent saw the last time it looked at the device.
///
/// Fully replaced on every perception cycle and explicitly cleared once a
/// reasoning stage has consumed it, so a stale screen never leaks into the
/// next decision. Every field except the capture timestamp is optional: the
/// decision stage must tolerate missing perception.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DeviceSnapshot {
    /// Flattened UI hierarchy of the focused screen, as delivered by the sensor.
    pub ui_hierarchy: Option<serde_json::Value>,
    /// Base64 screenshot; dropped when vision context is disabled.
    pub screenshot: Option<String>,
    /// Identifier of the focused app, when known.
    pub focused_app: Option<String>,
    /// Device-local clock string, when known.
    pub device_clock: Option<String>,
    /// When this snapshot was captured.
    pub captured_at: DateTime<Utc>,
}

impl DeviceSnapshot {
    /// Empty snapshot captured now; sensors fill in what they can.
    pub fn empty() -> Self {
        Self {
            ui_hierarchy: None,
            screenshot: None,
            focused_app: None,
            device_clock: None,
            captured_at: Utc::now(),
        }
    }

    /// Copy of this snapshot without the screenshot (vision disabled).
    pub fn without_screenshot(mut self) -> Self {
        self.screenshot = None;
        self
    }
}
