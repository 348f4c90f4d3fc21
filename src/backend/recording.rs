//! In-memory backend that records calls in order

use std::time::Duration;

use parking_lot::Mutex;

use crate::backend::AudioBackend;
use crate::protocol::{LogicalDevice, VolumeTarget};

/// One recorded backend call
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    SwitchDefaultOutput,
    SetMute { device: LogicalDevice, mute: bool },
    SetDefaultDevice(String),
    SetVolume { target: VolumeTarget, level: f64 },
}

#[derive(Default)]
pub struct RecordingBackend {
    calls: Mutex<Vec<BackendCall>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all calls so far
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().clone()
    }

    /// Remove and return all calls so far
    pub fn take(&self) -> Vec<BackendCall> {
        std::mem::take(&mut *self.calls.lock())
    }

    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }

    /// Poll until at least `count` calls are recorded or `timeout` passes
    pub async fn wait_for(&self, count: usize, timeout: Duration) -> Vec<BackendCall> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let calls = self.calls();
            if calls.len() >= count || tokio::time::Instant::now() >= deadline {
                return calls;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    fn record(&self, call: BackendCall) {
        self.calls.lock().push(call);
    }
}

impl AudioBackend for RecordingBackend {
    fn switch_default_output(&self) {
        self.record(BackendCall::SwitchDefaultOutput);
    }

    fn set_mute(&self, device: LogicalDevice, mute: bool) {
        self.record(BackendCall::SetMute { device, mute });
    }

    fn set_default_device(&self, device: &str) {
        self.record(BackendCall::SetDefaultDevice(device.to_string()));
    }

    fn set_volume(&self, target: &VolumeTarget, level: f64) {
        self.record(BackendCall::SetVolume {
            target: target.clone(),
            level,
        });
    }
}
