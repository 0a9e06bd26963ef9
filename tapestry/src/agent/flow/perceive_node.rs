//! Perceive node: refresh the device snapshot.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use crate::channels::Patch;
use crate::error::AgentError;
use crate::graph::Node;
use crate::perception::DeviceSensor;
use crate::state::{StateUpdate, TaskState};

/// Captures a fresh [`DeviceSnapshot`](crate::state::DeviceSnapshot) each
/// cycle. A sensor failure is tolerated: the snapshot is cleared and the
/// decision stage works without perception. The screenshot is stripped when
/// vision context is disabled.
pub struct PerceiveNode {
    sensor: Arc<dyn DeviceSensor>,
    use_vision: bool,
}

impl PerceiveNode {
    pub fn new(sensor: Arc<dyn DeviceSensor>, use_vision: bool) -> Self {
        Self { sensor, use_vision }
    }
}

#[async_trait]
impl Node<TaskState, StateUpdate> for PerceiveNode {
    fn id(&self) -> &str {
        "perceive"
    }

    async fn run(&self, _state: TaskState) -> Result<StateUpdate, AgentError> {
        let device_context = match self.sensor.snapshot().await {
            Ok(snapshot) => {
                let snapshot = if self.use_vision {
                    snapshot
                } else {
                    snapshot.without_screenshot()
                };
                Patch::Set(snapshot)
            }
            Err(e) => {
                warn!(error = %e, "device snapshot failed, continuing without perception");
                Patch::Clear
            }
        };
        Ok(StateUpdate {
            device_context,
            ..StateUpdate::default()
        })
    }
}
