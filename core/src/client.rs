//! # Transaction Orchestration
//!
//! Composes the parser, transport, and collector into one
//! send-then-collect round: resolve the audience, dispatch the command,
//! gather the replies. One transaction owns the socket at a time; the
//! session model is strictly sequential.

use std::collections::{BTreeMap, BTreeSet};
use std::net::Ipv4Addr;
use std::time::Duration;

use ipnetwork::Ipv4Network;
use thiserror::Error;
use tracing::{info, warn};

use camnet_common::config::Config;
use camnet_common::network::spec::{self, SpecError};

use crate::collector::{self, Audience, Collection};
use crate::protocol::{self, Command, Framerate, ReplyError, StatusReport};
use crate::registry::Registry;
use crate::transport::Transport;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Spec(#[from] SpecError),
    /// Transaction attempted with no explicit addresses and an empty
    /// registry.
    #[error("no servers defined; run \"find\" or \"add\" first")]
    NoServers,
    /// Discovery produced no valid acknowledgement.
    #[error("failed to find any servers")]
    Discovery,
    #[error("failed to bind client socket: {0}")]
    Bind(#[from] std::io::Error),
}

/// A reply map decoded per address. Decode failures stay per-address
/// and never poison sibling replies.
#[derive(Debug)]
pub struct Decoded<T> {
    pub replies: BTreeMap<Ipv4Addr, Result<T, ReplyError>>,
    pub anomalies: Vec<collector::Anomaly>,
}

/// The controlling endpoint: configuration, the shared socket, and the
/// known-servers registry. Owns no global state, so independent clients
/// can coexist in one process.
pub struct Client {
    config: Config,
    transport: Transport,
    registry: Registry,
}

impl Client {
    /// Binds the client socket per `config`, starting with an empty
    /// registry.
    pub async fn bind(config: Config) -> Result<Self, ClientError> {
        Self::with_registry(config, Registry::new()).await
    }

    /// Same, but with a caller-supplied registry.
    pub async fn with_registry(config: Config, registry: Registry) -> Result<Self, ClientError> {
        let transport = Transport::bind(config.client_port, config.server_port).await?;
        Ok(Self {
            config,
            transport,
            registry,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.config.timeout = timeout;
    }

    pub fn set_network(&mut self, network: Ipv4Network) {
        self.config.network = network;
    }

    /// Changes the destination/filter port for future transactions.
    pub fn set_server_port(&mut self, port: u16) {
        self.config.server_port = port;
        self.transport.set_server_port(port);
    }

    /// Rebinds the socket to a new local port. The registry carries
    /// over untouched.
    pub async fn set_client_port(&mut self, port: u16) -> Result<(), ClientError> {
        if port == self.config.client_port {
            return Ok(());
        }
        self.transport = Transport::bind(port, self.config.server_port).await?;
        self.config.client_port = port;
        Ok(())
    }

    pub fn servers(&self) -> &BTreeSet<Ipv4Addr> {
        self.registry.addresses()
    }

    /// Unions the parsed specification into the registry. No I/O.
    pub fn add(&mut self, spec_text: &str) -> Result<(), ClientError> {
        let addrs = spec::parse_spec(spec_text, self.config.network)?;
        self.registry.extend(addrs);
        Ok(())
    }

    /// Subtracts the parsed specification from the registry. No I/O.
    pub fn remove(&mut self, spec_text: &str) -> Result<(), ClientError> {
        let addrs = spec::parse_spec(spec_text, self.config.network)?;
        self.registry.subtract(&addrs);
        Ok(())
    }

    /// Broadcasts the discovery probe to the whole subnet and replaces
    /// the registry with every address that answered with the exact
    /// acknowledgement.
    pub async fn find(&mut self) -> Result<&BTreeSet<Ipv4Addr>, ClientError> {
        let payload = Command::Ping.encode();
        self.transport.broadcast(&payload, self.config.network).await;

        let audience = Audience::Open(self.config.network);
        let collection = collector::collect(&self.transport, &audience, self.config.timeout).await;

        let mut found = BTreeSet::new();
        for (addr, reply) in &collection.replies {
            if protocol::is_discovery_ack(reply) {
                found.insert(*addr);
            } else {
                warn!(%addr, "ignoring bogus response");
            }
        }

        if found.is_empty() {
            return Err(ClientError::Discovery);
        }
        info!(count = found.len(), "found {} servers", found.len());
        self.registry.replace(found);
        Ok(self.registry.addresses())
    }

    /// One send-then-collect round.
    ///
    /// A non-empty `spec_text` names the audience explicitly and each
    /// member is addressed with its own unicast datagram, in set order.
    /// An empty one falls back to the registry: a single broadcast
    /// datagram, with the registry as the closed expected audience.
    pub async fn transact(
        &self,
        command: &Command,
        spec_text: &str,
    ) -> Result<Collection, ClientError> {
        let payload = command.encode();

        let audience = if spec_text.trim().is_empty() {
            if self.registry.is_empty() {
                return Err(ClientError::NoServers);
            }
            self.transport.broadcast(&payload, self.config.network).await;
            Audience::Closed(self.registry.addresses().clone())
        } else {
            // Resolution failures abort before anything hits the wire.
            let addrs = spec::parse_spec(spec_text, self.config.network)?;
            self.transport.send(&payload, addrs.iter().copied()).await;
            Audience::Closed(addrs)
        };

        Ok(collector::collect(&self.transport, &audience, self.config.timeout).await)
    }

    /// `STATUS` across the audience, decoded per address.
    pub async fn status(&self, spec_text: &str) -> Result<Decoded<StatusReport>, ClientError> {
        let collection = self.transact(&Command::Status, spec_text).await?;
        Ok(decode(collection, protocol::parse_status))
    }

    /// `RESOLUTION` across the audience; per-address acknowledgements.
    pub async fn set_resolution(
        &self,
        width: u32,
        height: u32,
        spec_text: &str,
    ) -> Result<Decoded<()>, ClientError> {
        let command = Command::Resolution { width, height };
        let collection = self.transact(&command, spec_text).await?;
        Ok(decode(collection, protocol::parse_ack))
    }

    /// `FRAMERATE` across the audience; per-address acknowledgements.
    pub async fn set_framerate(
        &self,
        rate: Framerate,
        spec_text: &str,
    ) -> Result<Decoded<()>, ClientError> {
        let collection = self.transact(&Command::Framerate(rate), spec_text).await?;
        Ok(decode(collection, protocol::parse_ack))
    }

    /// `SHOOT` across the audience. Replies are returned raw; the image
    /// transfer itself happens out of band.
    pub async fn capture(&self, spec_text: &str) -> Result<Collection, ClientError> {
        self.transact(&Command::Shoot, spec_text).await
    }
}

fn decode<T>(
    collection: Collection,
    parse: impl Fn(&[u8]) -> Result<T, ReplyError>,
) -> Decoded<T> {
    Decoded {
        replies: collection
            .replies
            .iter()
            .map(|(addr, payload)| (*addr, parse(payload)))
            .collect(),
        anomalies: collection.anomalies,
    }
}
