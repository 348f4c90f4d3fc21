//! Static configuration loaded once at startup
//!
//! Every section has defaults, so a partial file (or none at all) is fine:
//!
//! ```toml
//! processes = ["master", "Spotify.exe", "Discord.exe"]
//!
//! [network]
//! udp_port = 16991
//!
//! [devices]
//! speakers = "{0.0.0.00000000}.{a3ce8b3f-a28c-4cb8-b22c-af914782737e}"
//!
//! [backend]
//! kind = "command"
//! program = 'c:\nircmd\soundvolumeview\SoundVolumeView.exe'
//! ```

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BIND_ADDRESS, DEFAULT_MAX_IN_FLIGHT, DEFAULT_UDP_PORT};
use crate::error::ConfigError;
use crate::protocol::LogicalDevice;

/// Config file name inside the platform config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Full application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub processes: ProcessTargets,
    pub network: NetworkConfig,
    pub devices: DeviceRegistry,
    pub backend: BackendConfig,
}

impl AppConfig {
    /// Load and validate configuration.
    ///
    /// An explicit path must exist. Without one, the platform config file is
    /// used when present, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => {
                    tracing::debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// `<config dir>/lan-audio-control/config.toml` on this platform
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", env!("CARGO_PKG_NAME"))
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        tracing::info!("Loaded config from {}", path.display());
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.network.socket_addr()?;
        self.devices.validate()?;
        self.backend.validate()?;
        Ok(())
    }
}

/// Listening socket settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Bind address (IP only)
    pub bind_address: String,

    /// UDP port for panel commands
    pub udp_port: u16,
}

impl NetworkConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.bind_address.parse().map_err(|_| {
            ConfigError::Invalid(format!("bind_address {:?} is not an IP address", self.bind_address))
        })?;
        Ok(SocketAddr::new(ip, self.udp_port))
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            udp_port: DEFAULT_UDP_PORT,
        }
    }
}

/// Backend identifiers for each logical device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceRegistry {
    pub headphones: String,
    pub microphone: String,
    pub speakers: String,
    pub default: String,
}

impl DeviceRegistry {
    pub fn resolve(&self, device: LogicalDevice) -> &str {
        match device {
            LogicalDevice::Headphones => &self.headphones,
            LogicalDevice::Microphone => &self.microphone,
            LogicalDevice::Speakers => &self.speakers,
            LogicalDevice::Default => &self.default,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for device in [
            LogicalDevice::Headphones,
            LogicalDevice::Microphone,
            LogicalDevice::Speakers,
            LogicalDevice::Default,
        ] {
            if self.resolve(device).trim().is_empty() {
                return Err(ConfigError::Invalid(format!("device id for {} is empty", device)));
            }
        }
        Ok(())
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self {
            headphones: "{0.0.0.00000000}.{a3541ca9-97e2-4203-8572-6eb8980e70a6}".to_string(),
            microphone: "{0.0.1.00000000}.{b876065e-da28-4f14-a041-cac6a38e6e6b}".to_string(),
            speakers: "{0.0.0.00000000}.{a3ce8b3f-a28c-4cb8-b22c-af914782737e}".to_string(),
            default: "DefaultRenderDevice".to_string(),
        }
    }
}

/// Slider index to application name. Index 0 is the default output and
/// its entry is never used as a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessTargets(Vec<String>);

impl ProcessTargets {
    pub fn new(names: Vec<String>) -> Self {
        Self(names)
    }

    /// Process name for a slider index, `None` for index 0 or past the end
    pub fn get(&self, index: usize) -> Option<&str> {
        if index == 0 {
            return None;
        }
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ProcessTargets {
    fn default() -> Self {
        Self(vec!["master".to_string(), "Spotify.exe".to_string()])
    }
}

/// Which backend executes audio actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// Launch `program` once per action
    Command,
    /// Log the invocation without running anything
    DryRun,
}

impl Default for BackendKind {
    fn default() -> Self {
        if cfg!(windows) {
            BackendKind::Command
        } else {
            BackendKind::DryRun
        }
    }
}

/// Backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub kind: BackendKind,

    /// External tool launched by the command backend
    pub program: String,

    /// Upper bound on concurrently running tool processes
    pub max_in_flight: usize,

    pub templates: CommandTemplates,
}

impl BackendConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.kind == BackendKind::Command && self.program.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "backend.program is required for the command backend".to_string(),
            ));
        }
        if self.max_in_flight == 0 {
            return Err(ConfigError::Invalid(
                "backend.max_in_flight must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            program: r"c:\nircmd\soundvolumeview\SoundVolumeView.exe".to_string(),
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            templates: CommandTemplates::default(),
        }
    }
}

/// Argument templates, one per backend capability.
///
/// Placeholders: `{first}`/`{second}` (switch), `{device}` (mute, unmute,
/// set default), `{target}`/`{level}` (volume).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandTemplates {
    pub switch_default: Vec<String>,
    pub mute: Vec<String>,
    pub unmute: Vec<String>,
    pub set_default: Vec<String>,
    pub set_volume: Vec<String>,
}

impl Default for CommandTemplates {
    fn default() -> Self {
        let args = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            switch_default: args(&["/SwitchDefault", "{first}", "{second}"]),
            mute: args(&["/Mute", "{device}"]),
            unmute: args(&["/UnMute", "{device}"]),
            set_default: args(&["/SetDefault", "{device}"]),
            set_volume: args(&["/SetVolume", "{target}", "{level}"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        config.validate().unwrap();

        assert_eq!(
            config.network.socket_addr().unwrap(),
            "0.0.0.0:16991".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(config.devices.resolve(LogicalDevice::Default), "DefaultRenderDevice");
        assert_eq!(config.processes.get(1), Some("Spotify.exe"));
    }

    #[test]
    fn test_process_targets_reserve_index_zero() {
        let targets = ProcessTargets::new(vec!["master".into(), "Spotify.exe".into()]);
        assert_eq!(targets.get(0), None);
        assert_eq!(targets.get(1), Some("Spotify.exe"));
        assert_eq!(targets.get(2), None);
    }

    #[test]
    fn test_partial_toml() {
        let config = AppConfig::from_toml_str(
            r#"
            processes = ["master", "Spotify.exe", "Discord.exe"]

            [network]
            udp_port = 17000

            [backend]
            kind = "dry-run"
            "#,
        )
        .unwrap();

        assert_eq!(config.network.udp_port, 17000);
        assert_eq!(config.network.bind_address, "0.0.0.0");
        assert_eq!(config.processes.get(2), Some("Discord.exe"));
        assert_eq!(config.backend.kind, BackendKind::DryRun);
        assert_eq!(config.devices, DeviceRegistry::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = AppConfig::default();
        config.network.bind_address = "localhost".into();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = AppConfig::default();
        config.backend.max_in_flight = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = AppConfig::default();
        config.backend.kind = BackendKind::Command;
        config.backend.program = "  ".into();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = AppConfig::default();
        config.devices.microphone.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_unknown_backend_kind_is_parse_error() {
        let err = AppConfig::from_toml_str("[backend]\nkind = \"pipewire\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[network]\nbind_address = \"127.0.0.1\"\nudp_port = 0").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.network.bind_address, "127.0.0.1");
        assert_eq!(config.network.udp_port, 0);
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_rendered_toml_loads_back() {
        let config = AppConfig::default();
        let text = config.to_toml().unwrap();
        let parsed = AppConfig::from_toml_str(&text).unwrap();

        assert_eq!(parsed.devices, config.devices);
        assert_eq!(parsed.processes, config.processes);
        assert_eq!(parsed.backend.templates, config.backend.templates);
    }
}
