//! Network subsystem for the UDP command transport

pub mod listener;
pub mod sender;
pub mod udp;

pub use listener::{CommandListener, ListenerStatsSnapshot};
pub use sender::CommandSender;
pub use udp::create_socket;
