//! UDP multicast notification sink
//!
//! Mirrors the wire behavior the downstream listeners expect: messages
//! are single UDP datagrams sent to a multicast group from a fixed local
//! port. A dropped notification is preferable to a monitoring loop
//! stalled on the network, so `send` is best effort and never returns an
//! error.

use std::io;
use std::net::{Ipv4Addr, SocketAddrV4, UdpSocket};

/// Multicast TTL: enough hops to cross a site network
const MULTICAST_TTL: u32 = 20;

/// Broadcast sender for notification and summary messages
pub struct DataServer {
    socket: Option<UdpSocket>,
    target: SocketAddrV4,
    send_port: u16,
}

impl DataServer {
    /// Create a sender for the given multicast group
    ///
    /// No socket is opened until [`start`](Self::start).
    pub fn new(mcast_addr: Ipv4Addr, mcast_port: u16, send_port: u16) -> Self {
        Self {
            socket: None,
            target: SocketAddrV4::new(mcast_addr, mcast_port),
            send_port,
        }
    }

    /// Open the sending socket
    pub fn start(&mut self) -> io::Result<()> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, self.send_port))?;
        socket.set_multicast_ttl_v4(MULTICAST_TTL)?;
        self.socket = Some(socket);
        Ok(())
    }

    /// Close the sending socket; `send` becomes a no-op
    pub fn stop(&mut self) {
        self.socket = None;
    }

    /// Send one message as a single datagram, best effort
    pub fn send(&self, message: &str) {
        if let Some(socket) = &self.socket {
            if let Err(err) = socket.send_to(message.as_bytes(), self.target) {
                log::warn!("notification send failed: {err}");
            }
        }
    }
}
