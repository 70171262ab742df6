//! The client's single UDP socket.
//!
//! Bound once at startup to the configured client port with broadcast
//! enabled; every transaction in the session shares it. There is no
//! delivery guarantee anywhere here: a send either reaches the network
//! stack or is reported per destination, and that is all UDP offers.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use ipnetwork::Ipv4Network;
use thiserror::Error;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// Largest reply datagram the collector accepts.
pub const MAX_DATAGRAM: usize = 512;

/// A datagram the network stack refused to take. Reported per
/// destination; sibling sends in the same batch continue.
#[derive(Debug, Error)]
#[error("send to {dest} failed: {source}")]
pub struct SendFailure {
    pub dest: Ipv4Addr,
    #[source]
    pub source: std::io::Error,
}

pub struct Transport {
    socket: UdpSocket,
    server_port: u16,
}

impl Transport {
    /// Binds the client socket and enables broadcast.
    pub async fn bind(client_port: u16, server_port: u16) -> std::io::Result<Self> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, client_port)).await?;
        socket.set_broadcast(true)?;
        Ok(Self {
            socket,
            server_port,
        })
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn set_server_port(&mut self, port: u16) {
        self.server_port = port;
    }

    /// Sends one datagram per destination, sequentially and in the
    /// order given. Failures are collected and logged, never aborting
    /// the rest of the batch.
    pub async fn send(
        &self,
        payload: &[u8],
        destinations: impl IntoIterator<Item = Ipv4Addr>,
    ) -> Vec<SendFailure> {
        let mut failures = Vec::new();
        for dest in destinations {
            let target = SocketAddrV4::new(dest, self.server_port);
            match self.socket.send_to(payload, target).await {
                Ok(_) => debug!(%dest, len = payload.len(), "sent datagram"),
                Err(source) => {
                    warn!(%dest, error = %source, "send failed");
                    failures.push(SendFailure { dest, source });
                }
            }
        }
        failures
    }

    /// Sends a single datagram to the subnet broadcast address.
    pub async fn broadcast(&self, payload: &[u8], network: Ipv4Network) -> Vec<SendFailure> {
        self.send(payload, [network.broadcast()]).await
    }

    /// One receive, used inside the collector's bounded poll loop.
    pub(crate) async fn recv_from(&self, buf: &mut [u8]) -> std::io::Result<(usize, SocketAddr)> {
        self.socket.recv_from(buf).await
    }
}
