//! # Address Specification Parsing
//!
//! Resolves the textual address specifications a user types into a
//! concrete set of server addresses.
//!
//! A specification is a comma-separated list of tokens, each either:
//! * A single IPv4 address (e.g., `192.168.0.5`).
//! * An inclusive dash range of two full addresses
//!   (e.g., `192.168.0.1-192.168.0.10`).
//!
//! Every resolved address must belong to the configured subnet.

use std::collections::BTreeSet;
use std::net::Ipv4Addr;

use ipnetwork::Ipv4Network;
use thiserror::Error;

/// A malformed or out-of-range address specification.
///
/// Always recoverable: parsing is pure and nothing has been sent when
/// one of these surfaces.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpecError {
    #[error("invalid address \"{0}\"")]
    InvalidAddress(String),
    /// A `start-finish` token whose start sorts above its finish.
    /// Iterating such a range would silently produce nothing, so it is
    /// rejected up front.
    #[error("reversed range \"{0}\": start address is above finish")]
    ReversedRange(String),
    #[error("address \"{addr}\" does not belong to the configured network \"{network}\"")]
    OutsideNetwork {
        addr: Ipv4Addr,
        network: Ipv4Network,
    },
}

/// Resolves `text` to the set of addresses it names, scoped to `network`.
pub fn parse_spec(text: &str, network: Ipv4Network) -> Result<BTreeSet<Ipv4Addr>, SpecError> {
    let mut result = BTreeSet::new();

    for token in text.split(',') {
        let token = token.trim();
        match token.split_once('-') {
            Some((start, finish)) => {
                let start = parse_member(start, network)?;
                let finish = parse_member(finish, network)?;
                if u32::from(start) > u32::from(finish) {
                    return Err(SpecError::ReversedRange(token.to_string()));
                }
                // A CIDR block is one contiguous interval, so membership
                // of both endpoints covers everything in between.
                result.extend((u32::from(start)..=u32::from(finish)).map(Ipv4Addr::from));
            }
            None => {
                result.insert(parse_member(token, network)?);
            }
        }
    }

    Ok(result)
}

fn parse_member(text: &str, network: Ipv4Network) -> Result<Ipv4Addr, SpecError> {
    let text = text.trim();
    let addr: Ipv4Addr = text
        .parse()
        .map_err(|_| SpecError::InvalidAddress(text.to_string()))?;
    if !network.contains(addr) {
        return Err(SpecError::OutsideNetwork { addr, network });
    }
    Ok(addr)
}
