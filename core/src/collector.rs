//! # Response Collection
//!
//! Gathers reply datagrams for one transaction inside a bounded time
//! window, deduplicating by source address and filtering out traffic
//! the transaction never asked for. A partial reply map is a normal
//! outcome over UDP, so everything dropped or absent is surfaced as a
//! warning next to the result rather than an error.

use std::collections::{BTreeMap, BTreeSet};
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use ipnetwork::Ipv4Network;
use tokio::time::{Instant, timeout};
use tracing::warn;

use crate::transport::{MAX_DATAGRAM, Transport};

/// Socket readiness is re-checked at least this often, so the deadline
/// is honoured even when nothing arrives.
const POLL_GRANULARITY: Duration = Duration::from_secs(1);

/// The responders one transaction expects.
#[derive(Debug, Clone)]
pub enum Audience {
    /// Exact membership known; collection may stop early once every
    /// member has answered.
    Closed(BTreeSet<Ipv4Addr>),
    /// The whole subnet. The expected count is unknowable, so
    /// collection always runs to the deadline.
    Open(Ipv4Network),
}

impl Audience {
    fn contains(&self, addr: Ipv4Addr) -> bool {
        match self {
            Audience::Closed(members) => members.contains(&addr),
            Audience::Open(network) => network.contains(addr),
        }
    }

    fn expected(&self) -> Option<usize> {
        match self {
            Audience::Closed(members) => Some(members.len()),
            Audience::Open(_) => None,
        }
    }
}

/// A discarded or absent reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    /// Datagram from a source port other than the server port.
    WrongPort { addr: Ipv4Addr, port: u16 },
    /// Second datagram from an address that already answered; the
    /// first reply is kept.
    Duplicate { addr: Ipv4Addr },
    /// Datagram from an address outside a closed audience.
    UnexpectedResponder { addr: Ipv4Addr },
    /// Closed-audience members that never answered before the deadline.
    Missing { count: usize },
}

/// What one collection window produced.
#[derive(Debug, Default)]
pub struct Collection {
    pub replies: BTreeMap<Ipv4Addr, Vec<u8>>,
    pub anomalies: Vec<Anomaly>,
}

impl Collection {
    /// Count of expected members that never answered, if any.
    pub fn missing(&self) -> Option<usize> {
        self.anomalies.iter().find_map(|anomaly| match anomaly {
            Anomaly::Missing { count } => Some(*count),
            _ => None,
        })
    }
}

/// Listens until the deadline passes or, for a closed audience, every
/// member has answered. The early exit is a latency optimisation only;
/// valid replies arriving after return are simply never read.
pub async fn collect(transport: &Transport, audience: &Audience, window: Duration) -> Collection {
    let deadline = Instant::now() + window;
    let mut collection = Collection::default();
    let mut buf = [0u8; MAX_DATAGRAM];

    loop {
        if audience
            .expected()
            .is_some_and(|count| collection.replies.len() >= count)
        {
            break;
        }
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }

        match timeout(remaining.min(POLL_GRANULARITY), transport.recv_from(&mut buf)).await {
            // Poll interval elapsed with nothing to read; re-check the deadline.
            Err(_) => continue,
            Ok(Err(error)) => {
                warn!(%error, "receive failed");
                continue;
            }
            Ok(Ok((len, source))) => {
                record(&mut collection, audience, transport.server_port(), source, &buf[..len]);
            }
        }
    }

    if let Some(expected) = audience.expected() {
        let count = expected - collection.replies.len();
        if count > 0 {
            warn!(count, "missing response from {count} servers");
            collection.anomalies.push(Anomaly::Missing { count });
        }
    }

    collection
}

fn record(
    collection: &mut Collection,
    audience: &Audience,
    server_port: u16,
    source: SocketAddr,
    payload: &[u8],
) {
    // The socket is IPv4-bound.
    let SocketAddr::V4(source) = source else {
        return;
    };
    let addr = *source.ip();

    if source.port() != server_port {
        warn!(%addr, port = source.port(), "ignoring response from wrong port");
        collection.anomalies.push(Anomaly::WrongPort {
            addr,
            port: source.port(),
        });
    } else if collection.replies.contains_key(&addr) {
        warn!(%addr, "ignoring double response");
        collection.anomalies.push(Anomaly::Duplicate { addr });
    } else if !audience.contains(addr) {
        warn!(%addr, "ignoring response from unexpected address");
        collection
            .anomalies
            .push(Anomaly::UnexpectedResponder { addr });
    } else {
        collection.replies.insert(addr, payload.to_vec());
    }
}
