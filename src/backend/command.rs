//! Backend that launches an external tool per action
//!
//! Each call renders an [`Invocation`] and spawns it on the tokio runtime.
//! The caller never waits for the process. A semaphore caps how many run at
//! once; a launch that finds no free permit is dropped, never queued.

use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::process::Command;
use tokio::sync::Semaphore;

use crate::backend::invocation::{Invocation, InvocationBuilder};
use crate::backend::AudioBackend;
use crate::protocol::{LogicalDevice, VolumeTarget};

pub struct CommandBackend {
    builder: InvocationBuilder,
    permits: Arc<Semaphore>,
    dropped: AtomicU64,
}

impl CommandBackend {
    pub fn new(builder: InvocationBuilder, max_in_flight: usize) -> Self {
        Self {
            builder,
            permits: Arc::new(Semaphore::new(max_in_flight.max(1))),
            dropped: AtomicU64::new(0),
        }
    }

    /// Launches dropped because every permit was taken
    pub fn dropped_launches(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Spawn the invocation without waiting on it
    fn launch(&self, invocation: Invocation) {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::error!("Cannot launch {}: no async runtime ({})", invocation, e);
                return;
            }
        };

        let permit = match self.permits.clone().try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("Dropping {}: too many launches in flight", invocation);
                return;
            }
        };

        handle.spawn(async move {
            let _permit = permit;

            tracing::debug!("Running {}", invocation);
            let status = Command::new(&invocation.program)
                .args(&invocation.args)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .await;

            match status {
                Ok(status) if status.success() => {
                    tracing::debug!("{} exited successfully", invocation.program);
                }
                Ok(status) => {
                    tracing::warn!("{} exited with {}", invocation, status);
                }
                Err(e) => {
                    tracing::error!("Failed to launch {}: {}", invocation.program, e);
                }
            }
        });
    }
}

impl AudioBackend for CommandBackend {
    fn switch_default_output(&self) {
        self.launch(self.builder.switch_default_output());
    }

    fn set_mute(&self, device: LogicalDevice, mute: bool) {
        self.launch(self.builder.set_mute(device, mute));
    }

    fn set_default_device(&self, device: &str) {
        self.launch(self.builder.set_default_device(device));
    }

    fn set_volume(&self, target: &VolumeTarget, level: f64) {
        self.launch(self.builder.set_volume(target, level));
    }
}
