//! Audio control backends
//!
//! The listener only ever talks to [`AudioBackend`]. Every call is fire and
//! forget: nothing is returned, and failures are logged by the backend.

pub mod command;
pub mod dry_run;
pub mod invocation;
pub mod recording;

use std::sync::Arc;

use crate::config::{AppConfig, BackendKind};
use crate::protocol::{LogicalDevice, VolumeTarget};

pub use command::CommandBackend;
pub use dry_run::DryRunBackend;
pub use invocation::{Invocation, InvocationBuilder};
pub use recording::{BackendCall, RecordingBackend};

/// Host audio capabilities used by the dispatcher
pub trait AudioBackend: Send + Sync {
    /// Swap the default output between speakers and headphones
    fn switch_default_output(&self);

    fn set_mute(&self, device: LogicalDevice, mute: bool);

    /// Make `device` the default endpoint. The name is not validated.
    fn set_default_device(&self, device: &str);

    fn set_volume(&self, target: &VolumeTarget, level: f64);
}

impl<B: AudioBackend + ?Sized> AudioBackend for Box<B> {
    fn switch_default_output(&self) {
        (**self).switch_default_output()
    }

    fn set_mute(&self, device: LogicalDevice, mute: bool) {
        (**self).set_mute(device, mute)
    }

    fn set_default_device(&self, device: &str) {
        (**self).set_default_device(device)
    }

    fn set_volume(&self, target: &VolumeTarget, level: f64) {
        (**self).set_volume(target, level)
    }
}

impl<B: AudioBackend + ?Sized> AudioBackend for Arc<B> {
    fn switch_default_output(&self) {
        (**self).switch_default_output()
    }

    fn set_mute(&self, device: LogicalDevice, mute: bool) {
        (**self).set_mute(device, mute)
    }

    fn set_default_device(&self, device: &str) {
        (**self).set_default_device(device)
    }

    fn set_volume(&self, target: &VolumeTarget, level: f64) {
        (**self).set_volume(target, level)
    }
}

/// Build the backend selected in the configuration
pub fn from_config(config: &AppConfig) -> Box<dyn AudioBackend> {
    let builder = InvocationBuilder::from_config(config);
    match config.backend.kind {
        BackendKind::Command => {
            tracing::info!(
                "Using command backend: {} (max {} in flight)",
                config.backend.program,
                config.backend.max_in_flight
            );
            Box::new(CommandBackend::new(builder, config.backend.max_in_flight))
        }
        BackendKind::DryRun => {
            tracing::info!("Using dry-run backend, no audio changes will be made");
            Box::new(DryRunBackend::new(builder))
        }
    }
}
