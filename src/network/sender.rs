//! Command sender, the host side equivalent of the slider panel

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

use tokio::net::UdpSocket;

use crate::constants::MAX_PACKET_SIZE;
use crate::error::NetworkError;
use crate::protocol::Command;

pub struct CommandSender {
    socket: UdpSocket,
    target: SocketAddr,
}

impl CommandSender {
    /// Bind an ephemeral socket for sending to `target`
    pub async fn connect(target: SocketAddr) -> Result<Self, NetworkError> {
        let local: SocketAddr = if target.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };

        let socket = UdpSocket::bind(local)
            .await
            .map_err(|e| NetworkError::BindFailed(e.to_string()))?;

        Ok(Self { socket, target })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    /// Send the command's wire text as one datagram
    pub async fn send(&self, command: &Command) -> Result<usize, NetworkError> {
        self.send_text(&command.to_string()).await
    }

    /// Send raw text as one datagram
    pub async fn send_text(&self, text: &str) -> Result<usize, NetworkError> {
        if text.len() > MAX_PACKET_SIZE {
            return Err(NetworkError::SendFailed(format!(
                "command is {} bytes, limit is {}",
                text.len(),
                MAX_PACKET_SIZE
            )));
        }

        self.socket
            .send_to(text.as_bytes(), self.target)
            .await
            .map_err(|e| NetworkError::SendFailed(e.to_string()))
    }
}
