//! Logical devices and volume targets

use std::fmt;

/// Mute target that selects the default render device
pub const MASTER_TARGET: &str = "master";

/// Named audio endpoint, mapped to a backend identifier by the device registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalDevice {
    Headphones,
    Microphone,
    Speakers,
    Default,
}

impl LogicalDevice {
    /// Pair swapped by the `switch` command
    pub const SWITCH_PAIR: (LogicalDevice, LogicalDevice) =
        (LogicalDevice::Speakers, LogicalDevice::Headphones);
}

impl fmt::Display for LogicalDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogicalDevice::Headphones => "Headphones",
            LogicalDevice::Microphone => "Microphone",
            LogicalDevice::Speakers => "Speakers",
            LogicalDevice::Default => "Default",
        };
        f.write_str(name)
    }
}

/// Resolve a mute/unmute target.
///
/// `master` is the default device; every other name is the microphone.
pub fn resolve_mute_target(target: &str) -> LogicalDevice {
    if target == MASTER_TARGET {
        LogicalDevice::Default
    } else {
        LogicalDevice::Microphone
    }
}

/// What a slider level is applied to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VolumeTarget {
    /// System default output (slider 0)
    DefaultOutput,
    /// Per-application volume, by process name
    Process(String),
}

impl fmt::Display for VolumeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolumeTarget::DefaultOutput => f.write_str("default output"),
            VolumeTarget::Process(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mute_target_resolution() {
        assert_eq!(resolve_mute_target("master"), LogicalDevice::Default);
        assert_eq!(resolve_mute_target("mic"), LogicalDevice::Microphone);
        assert_eq!(resolve_mute_target("Master"), LogicalDevice::Microphone);
        assert_eq!(resolve_mute_target("speakers"), LogicalDevice::Microphone);
    }
}
