//! Rendering backend calls into external tool command lines

use std::fmt;

use crate::config::{AppConfig, CommandTemplates, DeviceRegistry};
use crate::protocol::{LogicalDevice, VolumeTarget};

/// A fully rendered tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Turns capability calls into [`Invocation`]s using the configured templates
/// and device registry.
#[derive(Debug, Clone)]
pub struct InvocationBuilder {
    program: String,
    templates: CommandTemplates,
    devices: DeviceRegistry,
}

impl InvocationBuilder {
    pub fn new(program: impl Into<String>, templates: CommandTemplates, devices: DeviceRegistry) -> Self {
        Self {
            program: program.into(),
            templates,
            devices,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.backend.program.clone(),
            config.backend.templates.clone(),
            config.devices.clone(),
        )
    }

    pub fn switch_default_output(&self) -> Invocation {
        let (first, second) = LogicalDevice::SWITCH_PAIR;
        self.render(
            &self.templates.switch_default,
            &[
                ("{first}", self.devices.resolve(first)),
                ("{second}", self.devices.resolve(second)),
            ],
        )
    }

    pub fn set_mute(&self, device: LogicalDevice, mute: bool) -> Invocation {
        let template = if mute {
            &self.templates.mute
        } else {
            &self.templates.unmute
        };
        self.render(template, &[("{device}", self.devices.resolve(device))])
    }

    pub fn set_default_device(&self, device: &str) -> Invocation {
        self.render(&self.templates.set_default, &[("{device}", device)])
    }

    pub fn set_volume(&self, target: &VolumeTarget, level: f64) -> Invocation {
        let target = match target {
            VolumeTarget::DefaultOutput => self.devices.resolve(LogicalDevice::Default),
            VolumeTarget::Process(name) => name.as_str(),
        };
        let level = level.to_string();
        self.render(
            &self.templates.set_volume,
            &[("{target}", target), ("{level}", level.as_str())],
        )
    }

    fn render(&self, template: &[String], values: &[(&str, &str)]) -> Invocation {
        Invocation {
            program: self.program.clone(),
            args: template.iter().map(|arg| substitute(arg, values)).collect(),
        }
    }
}

/// Replace placeholders in one pass. Substituted values are never rescanned.
fn substitute(arg: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(arg.len());
    let mut rest = arg;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match values.iter().find(|(key, _)| tail.starts_with(key)) {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}
