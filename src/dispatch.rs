//! Routing parsed commands to the audio backend

use std::sync::Arc;

use crate::backend::AudioBackend;
use crate::config::ProcessTargets;
use crate::protocol::{resolve_mute_target, Command, LogicalDevice, VolumeTarget};

/// Stateless command router.
///
/// Each command is handled on its own. Every path logs what it did.
pub struct Dispatcher<B> {
    backend: B,
    processes: Arc<ProcessTargets>,
}

impl<B: AudioBackend> Dispatcher<B> {
    pub fn new(backend: B, processes: Arc<ProcessTargets>) -> Self {
        Self { backend, processes }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn dispatch(&self, command: &Command) {
        match command {
            Command::SetSliders(levels) => self.apply_sliders(levels),
            Command::Switch => {
                let (first, second) = LogicalDevice::SWITCH_PAIR;
                tracing::info!("Toggling default output between {} and {}", first, second);
                self.backend.switch_default_output();
            }
            Command::Mute(target) => self.set_mute(target, true),
            Command::Unmute(target) => self.set_mute(target, false),
            Command::SetDefault(device) => {
                tracing::info!("Setting default device to {}", device);
                self.backend.set_default_device(device);
            }
            Command::Unknown(raw) => {
                tracing::warn!("Unknown command: {:?}", raw);
            }
        }
    }

    /// Slider 0 drives the default output, slider `i` the `i`th process.
    /// Sliders without a process target are skipped.
    fn apply_sliders(&self, levels: &[f64]) {
        for (index, &level) in levels.iter().enumerate() {
            let target = if index == 0 {
                VolumeTarget::DefaultOutput
            } else {
                match self.processes.get(index) {
                    Some(name) => VolumeTarget::Process(name.to_string()),
                    None => {
                        tracing::warn!(
                            "Ignoring slider {} (level {}): no process target configured",
                            index,
                            level
                        );
                        continue;
                    }
                }
            };

            tracing::info!("Setting {} volume to {}", target, level);
            self.backend.set_volume(&target, level);
        }
    }

    fn set_mute(&self, target: &str, mute: bool) {
        let device = resolve_mute_target(target);
        tracing::info!(
            "{} {} ({})",
            if mute { "Muting" } else { "Unmuting" },
            target,
            device
        );
        self.backend.set_mute(device, mute);
    }
}
