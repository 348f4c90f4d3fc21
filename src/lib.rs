//! # LAN Audio Control
//!
//! Receives short text commands from a remote slider panel over UDP and
//! turns them into host audio actions.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────┐
//! │    Slider Panel      │   "sliders 50|30", "switch", "mute master", ...
//! └──────────┬───────────┘
//!            │ UDP datagram (port 16991), no reply
//!            ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         HOST PC                             │
//! │  ┌───────────────────────────────────────────────────────┐  │
//! │  │        Command Listener (network::listener)           │  │
//! │  │   recv ─▶ UTF-8 decode ─▶ trim ─▶ Command::parse      │  │
//! │  └───────────────────────────┬───────────────────────────┘  │
//! │                              ▼                              │
//! │  ┌───────────────────────────────────────────────────────┐  │
//! │  │              Dispatcher (dispatch)                    │  │
//! │  │   DeviceRegistry / ProcessTargets (read-only config)  │  │
//! │  └───────────────────────────┬───────────────────────────┘  │
//! │                              ▼                              │
//! │  ┌───────────────────────────────────────────────────────┐  │
//! │  │         AudioBackend (backend) - fire and forget      │  │
//! │  │   CommandBackend │ DryRunBackend │ RecordingBackend   │  │
//! │  └───────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod backend;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod network;
pub mod protocol;

pub use error::{Error, Result};

/// Application-wide constants
pub mod constants {
    /// Default UDP port for panel commands
    pub const DEFAULT_UDP_PORT: u16 = 16991;

    /// Default bind address (all interfaces)
    pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

    /// Largest command the sender will put in one datagram
    pub const MAX_PACKET_SIZE: usize = 1472; // MTU - IP/UDP headers

    /// Listener receive buffer, the largest possible UDP payload
    pub const RECV_BUFFER_SIZE: usize = 65535;

    /// Default number of backend processes allowed in flight
    pub const DEFAULT_MAX_IN_FLIGHT: usize = 8;
}
