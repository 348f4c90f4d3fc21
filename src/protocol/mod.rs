//! Wire protocol between the slider panel and the host

pub mod command;
pub mod target;

pub use command::Command;
pub use target::{resolve_mute_target, LogicalDevice, VolumeTarget, MASTER_TARGET};
