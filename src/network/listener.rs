//! Command listener
//!
//! Receives one command per datagram, parses it and hands it to the
//! dispatcher before receiving the next. Nothing is ever sent back.

use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::net::UdpSocket;

use crate::backend::AudioBackend;
use crate::config::NetworkConfig;
use crate::constants::RECV_BUFFER_SIZE;
use crate::dispatch::Dispatcher;
use crate::error::NetworkError;
use crate::network::udp::create_socket;
use crate::protocol::Command;

/// Windows reports a truncated datagram as an error instead of truncating
const WSAEMSGSIZE: i32 = 10040;

/// Listener counters
#[derive(Debug, Default)]
struct ListenerStats {
    packets_received: AtomicU64,
    bytes_received: AtomicU64,
    invalid_packets: AtomicU64,
    unknown_commands: AtomicU64,
}

/// Point-in-time copy of the listener counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerStatsSnapshot {
    pub packets_received: u64,
    pub bytes_received: u64,
    /// Packets dropped for bad encoding or a malformed command
    pub invalid_packets: u64,
    pub unknown_commands: u64,
}

pub struct CommandListener<B> {
    socket: UdpSocket,
    dispatcher: Dispatcher<B>,
    stats: ListenerStats,
}

impl<B: AudioBackend> CommandListener<B> {
    /// Bind the listening socket. Must be called from within a tokio runtime.
    pub fn bind(config: &NetworkConfig, dispatcher: Dispatcher<B>) -> Result<Self, NetworkError> {
        let addr = config
            .socket_addr()
            .map_err(|e| NetworkError::InvalidAddress(e.to_string()))?;
        let socket = create_socket(addr)?;

        let listener = Self {
            socket,
            dispatcher,
            stats: ListenerStats::default(),
        };
        tracing::info!("Listening for commands on {}", listener.local_addr()?);
        Ok(listener)
    }

    pub fn local_addr(&self) -> Result<SocketAddr, NetworkError> {
        self.socket
            .local_addr()
            .map_err(|e| NetworkError::InvalidAddress(e.to_string()))
    }

    pub fn dispatcher(&self) -> &Dispatcher<B> {
        &self.dispatcher
    }

    pub fn stats(&self) -> ListenerStatsSnapshot {
        ListenerStatsSnapshot {
            packets_received: self.stats.packets_received.load(Ordering::Relaxed),
            bytes_received: self.stats.bytes_received.load(Ordering::Relaxed),
            invalid_packets: self.stats.invalid_packets.load(Ordering::Relaxed),
            unknown_commands: self.stats.unknown_commands.load(Ordering::Relaxed),
        }
    }

    /// Receive loop. Returns only on an unrecoverable socket error.
    pub async fn run(&self) -> Result<(), NetworkError> {
        let mut buf = vec![0u8; RECV_BUFFER_SIZE];

        loop {
            match self.socket.recv_from(&mut buf).await {
                Ok((len, from)) => self.handle_received(&buf[..len], buf.len(), from),
                Err(e) if is_transient(&e) => {
                    tracing::debug!("Ignoring transient receive error: {}", e);
                }
                Err(e) => {
                    tracing::error!("Receive failed, stopping listener: {}", e);
                    return Err(NetworkError::ReceiveFailed(e.to_string()));
                }
            }
        }
    }

    /// Handle a datagram read into a buffer of `capacity` bytes.
    ///
    /// A datagram that fills the buffer may have been cut short by the OS and
    /// is dropped rather than parsed.
    fn handle_received(&self, datagram: &[u8], capacity: usize, from: SocketAddr) {
        if datagram.len() >= capacity {
            self.stats.packets_received.fetch_add(1, Ordering::Relaxed);
            self.stats
                .bytes_received
                .fetch_add(datagram.len() as u64, Ordering::Relaxed);
            self.stats.invalid_packets.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(
                "Dropping packet from {}: {} bytes fills the receive buffer, possibly truncated",
                from,
                datagram.len()
            );
            return;
        }
        self.handle_packet(datagram, from);
    }

    /// Decode, parse and dispatch one datagram
    pub fn handle_packet(&self, bytes: &[u8], from: SocketAddr) {
        self.stats.packets_received.fetch_add(1, Ordering::Relaxed);
        self.stats
            .bytes_received
            .fetch_add(bytes.len() as u64, Ordering::Relaxed);

        let text = match std::str::from_utf8(bytes) {
            Ok(text) => text.trim(),
            Err(e) => {
                self.stats.invalid_packets.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("Dropping packet from {}: not valid UTF-8 ({})", from, e);
                return;
            }
        };

        tracing::debug!("Received {:?} from {}", text, from);

        match Command::parse(text) {
            Ok(command) => {
                if command.is_unknown() {
                    self.stats.unknown_commands.fetch_add(1, Ordering::Relaxed);
                }
                self.dispatcher.dispatch(&command);
            }
            Err(e) => {
                self.stats.invalid_packets.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("Dropping command from {}: {}", from, e);
            }
        }
    }
}

fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionReset | io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock
    ) || (cfg!(windows) && e.raw_os_error() == Some(WSAEMSGSIZE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendCall, RecordingBackend};
    use crate::config::ProcessTargets;
    use crate::protocol::VolumeTarget;
    use std::sync::Arc;

    fn listener() -> CommandListener<RecordingBackend> {
        let config = NetworkConfig {
            bind_address: "127.0.0.1".into(),
            udp_port: 0,
        };
        let dispatcher = Dispatcher::new(RecordingBackend::new(), Arc::new(ProcessTargets::default()));
        CommandListener::bind(&config, dispatcher).unwrap()
    }

    fn peer() -> SocketAddr {
        "192.168.1.50:4210".parse().unwrap()
    }

    #[tokio::test]
    async fn test_handle_packet_trims_and_dispatches() {
        let listener = listener();
        listener.handle_packet(b"  sliders 50|30\r\n", peer());

        assert_eq!(
            listener.dispatcher().backend().calls(),
            vec![
                BackendCall::SetVolume {
                    target: VolumeTarget::DefaultOutput,
                    level: 50.0
                },
                BackendCall::SetVolume {
                    target: VolumeTarget::Process("Spotify.exe".into()),
                    level: 30.0
                },
            ]
        );
        assert_eq!(listener.stats().bytes_received, 17);
    }

    #[tokio::test]
    async fn test_datagram_filling_buffer_dropped() {
        let listener = listener();
        let datagram = b"sliders 50|10";
        listener.handle_received(datagram, datagram.len(), peer());

        assert!(listener.dispatcher().backend().is_empty());
        let stats = listener.stats();
        assert_eq!(stats.packets_received, 1);
        assert_eq!(stats.invalid_packets, 1);

        // One byte of headroom means the datagram arrived whole
        listener.handle_received(datagram, datagram.len() + 1, peer());
        assert_eq!(listener.dispatcher().backend().len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_utf8_dropped() {
        let listener = listener();
        listener.handle_packet(&[0x6d, 0x75, 0xff, 0xfe], peer());

        assert!(listener.dispatcher().backend().is_empty());
        assert_eq!(listener.stats().invalid_packets, 1);
    }

    #[tokio::test]
    async fn test_malformed_sliders_dropped() {
        let listener = listener();
        listener.handle_packet(b"sliders 50|loud", peer());

        assert!(listener.dispatcher().backend().is_empty());
        let stats = listener.stats();
        assert_eq!(stats.packets_received, 1);
        assert_eq!(stats.invalid_packets, 1);
        assert_eq!(stats.unknown_commands, 0);
    }

    #[tokio::test]
    async fn test_unknown_counted() {
        let listener = listener();
        listener.handle_packet(b"ping", peer());
        listener.handle_packet(b"switch", peer());

        assert_eq!(listener.dispatcher().backend().calls(), vec![BackendCall::SwitchDefaultOutput]);
        assert_eq!(listener.stats().unknown_commands, 1);
    }

    #[tokio::test]
    async fn test_bind_rejects_bad_address() {
        let config = NetworkConfig {
            bind_address: "not-an-ip".into(),
            udp_port: 0,
        };
        let dispatcher = Dispatcher::new(RecordingBackend::new(), Arc::new(ProcessTargets::default()));
        assert!(matches!(
            CommandListener::bind(&config, dispatcher),
            Err(NetworkError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_transient_errors() {
        assert!(is_transient(&io::Error::from(io::ErrorKind::ConnectionReset)));
        assert!(is_transient(&io::Error::from(io::ErrorKind::Interrupted)));
        assert!(!is_transient(&io::Error::from(io::ErrorKind::PermissionDenied)));
    }
}
