use std::collections::BTreeSet;
use std::net::Ipv4Addr;

use camnet_core::client::{Client, ClientError};

use crate::util;

#[tokio::test]
async fn discovery_replaces_registry_with_valid_acks() {
    let mut client = Client::bind(util::config(47101, 47102, 600)).await.unwrap();

    util::send_unsolicited("127.0.0.5", 47102, 47101, b"PONG\n")
        .await
        .unwrap();
    util::send_unsolicited("127.0.0.9", 47102, 47101, b"PONG\n")
        .await
        .unwrap();
    // Garbled payloads are dropped before the registry is replaced.
    util::send_unsolicited("127.0.0.7", 47102, 47101, b"I AM A TEAPOT\n")
        .await
        .unwrap();

    let servers = client.find().await.unwrap();
    let expected: BTreeSet<Ipv4Addr> = ["127.0.0.5", "127.0.0.9"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
    assert_eq!(servers, &expected);
}

#[tokio::test]
async fn discovery_with_no_valid_acks_fails() {
    let mut client = Client::bind(util::config(47111, 47112, 300)).await.unwrap();

    util::send_unsolicited("127.0.0.7", 47112, 47111, b"GARBAGE\n")
        .await
        .unwrap();

    let err = client.find().await.unwrap_err();
    assert!(matches!(err, ClientError::Discovery));
    assert!(client.servers().is_empty());
}

#[tokio::test]
async fn repeated_discovery_does_not_merge() {
    let mut client = Client::bind(util::config(47121, 47122, 400)).await.unwrap();

    util::send_unsolicited("127.0.0.5", 47122, 47121, b"PONG\n")
        .await
        .unwrap();
    client.find().await.unwrap();

    util::send_unsolicited("127.0.0.6", 47122, 47121, b"PONG\n")
        .await
        .unwrap();
    let servers = client.find().await.unwrap();

    let expected: BTreeSet<Ipv4Addr> = ["127.0.0.6".parse().unwrap()].into_iter().collect();
    assert_eq!(servers, &expected);
}
