//! Backend that only logs what it would run

use crate::backend::invocation::InvocationBuilder;
use crate::backend::AudioBackend;
use crate::protocol::{LogicalDevice, VolumeTarget};

pub struct DryRunBackend {
    builder: InvocationBuilder,
}

impl DryRunBackend {
    pub fn new(builder: InvocationBuilder) -> Self {
        Self { builder }
    }
}

impl AudioBackend for DryRunBackend {
    fn switch_default_output(&self) {
        tracing::info!("[dry-run] {}", self.builder.switch_default_output());
    }

    fn set_mute(&self, device: LogicalDevice, mute: bool) {
        tracing::info!("[dry-run] {}", self.builder.set_mute(device, mute));
    }

    fn set_default_device(&self, device: &str) {
        tracing::info!("[dry-run] {}", self.builder.set_default_device(device));
    }

    fn set_volume(&self, target: &VolumeTarget, level: f64) {
        tracing::info!("[dry-run] {}", self.builder.set_volume(target, level));
    }
}
