//! Fake camera servers on loopback addresses. Each test uses its own
//! port pair so the suite can run in parallel.

use std::net::Ipv4Addr;
use std::time::Duration;

use camnet_common::config::Config;
use tokio::net::UdpSocket;

pub fn config(client_port: u16, server_port: u16, timeout_ms: u64) -> Config {
    Config {
        network: "127.0.0.0/8".parse().unwrap(),
        client_port,
        server_port,
        timeout: Duration::from_millis(timeout_ms),
    }
}

/// A fake server on its own loopback address, answering every datagram
/// with `reply` sent `copies` times.
pub async fn spawn_responder(
    addr: &str,
    port: u16,
    reply: &'static [u8],
    copies: usize,
) -> anyhow::Result<()> {
    let addr: Ipv4Addr = addr.parse()?;
    let socket = UdpSocket::bind((addr, port)).await?;
    tokio::spawn(async move {
        let mut buf = [0u8; 512];
        while let Ok((_, src)) = socket.recv_from(&mut buf).await {
            for _ in 0..copies {
                let _ = socket.send_to(reply, src).await;
            }
        }
    });
    Ok(())
}

/// Holds the address so sends reach a live socket, but never replies.
pub async fn spawn_silent(addr: &str, port: u16) -> anyhow::Result<()> {
    let socket = UdpSocket::bind((addr.parse::<Ipv4Addr>()?, port)).await?;
    tokio::spawn(async move {
        let mut buf = [0u8; 512];
        while socket.recv_from(&mut buf).await.is_ok() {}
    });
    Ok(())
}

/// Answers from a second socket on an ephemeral port, so the reply
/// arrives with the wrong source port.
pub async fn spawn_wrong_port_responder(
    addr: &str,
    port: u16,
    reply: &'static [u8],
) -> anyhow::Result<()> {
    let addr: Ipv4Addr = addr.parse()?;
    let socket = UdpSocket::bind((addr, port)).await?;
    let rogue = UdpSocket::bind((addr, 0)).await?;
    tokio::spawn(async move {
        let mut buf = [0u8; 512];
        while let Ok((_, src)) = socket.recv_from(&mut buf).await {
            let _ = rogue.send_to(reply, src).await;
        }
    });
    Ok(())
}

/// Pushes `payload` to the client shortly after spawning, from a socket
/// bound to (`addr`, `server_port`). Broadcast datagrams do not reach
/// sockets bound to specific loopback addresses, so discovery tests
/// rely on these unprompted replies instead.
pub async fn send_unsolicited(
    addr: &str,
    server_port: u16,
    client_port: u16,
    payload: &'static [u8],
) -> anyhow::Result<()> {
    let socket = UdpSocket::bind((addr.parse::<Ipv4Addr>()?, server_port)).await?;
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        let _ = socket
            .send_to(payload, (Ipv4Addr::LOCALHOST, client_port))
            .await;
    });
    Ok(())
}
