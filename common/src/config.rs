use std::net::Ipv4Addr;
use std::time::Duration;

use ipnetwork::Ipv4Network;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Client settings, read once at startup and adjusted at runtime
/// through the shell's `set` command.
#[derive(Debug, Clone)]
pub struct Config {
    /// Subnet the camera servers live on. Every address in a parsed
    /// specification must belong to it.
    pub network: Ipv4Network,
    /// Local port the client socket binds to.
    pub client_port: u16,
    /// Port the servers listen on. Replies arriving from any other
    /// source port are discarded.
    pub server_port: u16,
    /// How long one transaction waits for replies.
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: Ipv4Network::new(Ipv4Addr::new(192, 168, 0, 0), 16)
                .expect("default subnet is valid"),
            client_port: DEFAULT_PORT,
            server_port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
