//! Perception collaborator: how the agent observes the device.
//!
//! The graph only ever asks for a full snapshot once per perceive step; the
//! transport behind it (USB bridge, network driver...) is the implementor's
//! concern. A failed snapshot is tolerated by the graph as missing perception.

use async_trait::async_trait;

use crate::error::AgentError;
use crate::state::DeviceSnapshot;

/// Device observation collaborator.
#[async_trait]
pub trait DeviceSensor: Send + Sync {
    /// Captures the current device state (UI hierarchy, screenshot, focused
    /// app, clock). Implementations should return what they can; every field
    /// of the snapshot is optional.
    async fn snapshot(&self) -> Result<DeviceSnapshot, AgentError>;
}

/// Scripted sensor for tests: replays queued snapshots, then repeats the last
/// one; can be put into a failing state.
#[derive(Default)]
pub struct MockSensor {
    snapshots: std::sync::Mutex<Vec<DeviceSnapshot>>,
    failing: std::sync::atomic::AtomicBool,
}

impl MockSensor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(self, snapshot: DeviceSnapshot) -> Self {
        self.snapshots.lock().unwrap().push(snapshot);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing
            .store(failing, std::sync::atomic::Ordering::SeqCst);
    }
}

#[async_trait]
impl DeviceSensor for MockSensor {
    async fn snapshot(&self) -> Result<DeviceSnapshot, AgentError> {
        if self.failing.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(AgentError::ExecutionFailed(
                "device snapshot unavailable".to_string(),
            ));
        }
        let mut snapshots = self.snapshots.lock().unwrap();
        if snapshots.len() > 1 {
            Ok(snapshots.remove(0))
        } else {
            Ok(snapshots
                .first()
                .cloned()
                .unwrap_or_else(DeviceSnapshot::empty))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: The mock replays snapshots in order and repeats the last one.
    #[tokio::test]
    async fn mock_sensor_replays_snapshots() {
        let first = DeviceSnapshot {
            focused_app: Some("com.example.home".to_string()),
            ..DeviceSnapshot::empty()
        };
        let second = DeviceSnapshot {
            focused_app: Some("com.example.mail".to_string()),
            ..DeviceSnapshot::empty()
        };
        let sensor = MockSensor::new()
            .with_snapshot(first)
            .with_snapshot(second);

        let a = sensor.snapshot().await.unwrap();
        assert_eq!(a.focused_app.as_deref(), Some("com.example.home"));
        let b = sensor.snapshot().await.unwrap();
        assert_eq!(b.focused_app.as_deref(), Some("com.example.mail"));
        let c = sensor.snapshot().await.unwrap();
        assert_eq!(c.focused_app.as_deref(), Some("com.example.mail"));
    }

    /// **Scenario**: A failing sensor returns an error the perceive stage tolerates.
    #[tokio::test]
    async fn mock_sensor_can_fail() {
        let sensor = MockSensor::new();
        sensor.set_failing(true);
        assert!(sensor.snapshot().await.is_err());
    }
}
