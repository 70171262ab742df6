//! Device-discovery and transaction layer for a network of
//! camera-equipped servers, driven over a newline-terminated ASCII
//! protocol on UDP.

pub mod client;
pub mod collector;
pub mod protocol;
pub mod registry;
pub mod transport;
