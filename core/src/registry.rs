//! The client's working set of believed-live server addresses.

use std::collections::BTreeSet;
use std::net::Ipv4Addr;

/// Replaced wholesale by discovery and edited by `add`/`remove`;
/// consulted as the default transaction audience. Plain data, no I/O.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Registry {
    servers: BTreeSet<Ipv4Addr>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn addresses(&self) -> &BTreeSet<Ipv4Addr> {
        &self.servers
    }

    /// Discards the current set in favour of `servers`.
    pub fn replace(&mut self, servers: BTreeSet<Ipv4Addr>) {
        self.servers = servers;
    }

    /// Set union; re-adding a known address changes nothing.
    pub fn extend(&mut self, addrs: BTreeSet<Ipv4Addr>) {
        self.servers.extend(addrs);
    }

    /// Set difference; removing an unknown address changes nothing.
    pub fn subtract(&mut self, addrs: &BTreeSet<Ipv4Addr>) {
        self.servers.retain(|addr| !addrs.contains(addr));
    }
}
