use std::net::Ipv4Addr;
use std::time::{Duration, Instant};

use camnet_core::client::{Client, ClientError};
use camnet_core::collector::Anomaly;
use camnet_core::protocol::Command;

use crate::util;

fn addr(s: &str) -> Ipv4Addr {
    s.parse().unwrap()
}

#[tokio::test]
async fn empty_registry_and_empty_spec_is_an_error() {
    let client = Client::bind(util::config(47201, 47202, 300)).await.unwrap();

    let err = client.transact(&Command::Status, "").await.unwrap_err();
    assert!(matches!(err, ClientError::NoServers));
}

#[tokio::test]
async fn bad_spec_aborts_before_any_network_io() {
    let client = Client::bind(util::config(47205, 47206, 300)).await.unwrap();

    // 10.0.0.1 is outside the configured 127.0.0.0/8 network.
    let err = client.transact(&Command::Status, "10.0.0.1").await.unwrap_err();
    assert!(matches!(err, ClientError::Spec(_)));
}

#[tokio::test]
async fn unicast_returns_partial_results_on_timeout() {
    util::spawn_responder("127.0.0.2", 47212, b"OK\n", 1)
        .await
        .unwrap();
    util::spawn_silent("127.0.0.3", 47212).await.unwrap();
    let client = Client::bind(util::config(47211, 47212, 700)).await.unwrap();

    let command = Command::Resolution {
        width: 640,
        height: 480,
    };
    let collection = client
        .transact(&command, "127.0.0.2,127.0.0.3")
        .await
        .unwrap();

    assert_eq!(collection.replies.len(), 1);
    assert_eq!(collection.replies[&addr("127.0.0.2")], b"OK\n");
    assert_eq!(collection.missing(), Some(1));
}

#[tokio::test]
async fn closed_audience_exits_early_once_everyone_answered() {
    util::spawn_responder("127.0.0.2", 47222, b"OK\n", 1)
        .await
        .unwrap();
    let client = Client::bind(util::config(47221, 47222, 30_000))
        .await
        .unwrap();

    let start = Instant::now();
    let collection = client.transact(&Command::Status, "127.0.0.2").await.unwrap();

    assert_eq!(collection.replies.len(), 1);
    assert_eq!(collection.missing(), None);
    assert!(
        start.elapsed() < Duration::from_secs(5),
        "collector waited out the timeout instead of exiting early"
    );
}

#[tokio::test]
async fn duplicate_replies_keep_the_first() {
    util::spawn_responder("127.0.0.4", 47232, b"OK\n", 2)
        .await
        .unwrap();
    // A second, silent member keeps the window open long enough for
    // the duplicate to arrive.
    util::spawn_silent("127.0.0.5", 47232).await.unwrap();
    let client = Client::bind(util::config(47231, 47232, 700)).await.unwrap();

    let collection = client
        .transact(&Command::Status, "127.0.0.4,127.0.0.5")
        .await
        .unwrap();

    assert_eq!(collection.replies.len(), 1);
    assert!(collection.anomalies.contains(&Anomaly::Duplicate {
        addr: addr("127.0.0.4")
    }));
}

#[tokio::test]
async fn replies_from_the_wrong_port_are_discarded() {
    util::spawn_wrong_port_responder("127.0.0.6", 47242, b"OK\n")
        .await
        .unwrap();
    let client = Client::bind(util::config(47241, 47242, 500)).await.unwrap();

    let collection = client.transact(&Command::Status, "127.0.0.6").await.unwrap();

    assert!(collection.replies.is_empty());
    assert!(collection.anomalies.iter().any(
        |anomaly| matches!(anomaly, Anomaly::WrongPort { addr: a, .. } if *a == addr("127.0.0.6"))
    ));
    assert_eq!(collection.missing(), Some(1));
}

#[tokio::test]
async fn replies_from_outside_a_closed_audience_are_discarded() {
    let client = Client::bind(util::config(47251, 47252, 700)).await.unwrap();
    util::spawn_silent("127.0.0.8", 47252).await.unwrap();
    util::send_unsolicited("127.0.0.9", 47252, 47251, b"OK\n")
        .await
        .unwrap();

    let collection = client.transact(&Command::Status, "127.0.0.8").await.unwrap();

    assert!(collection.replies.is_empty());
    assert!(collection.anomalies.contains(&Anomaly::UnexpectedResponder {
        addr: addr("127.0.0.9")
    }));
    assert_eq!(collection.missing(), Some(1));
}

#[tokio::test]
async fn empty_spec_falls_back_to_the_registry() {
    let mut client = Client::bind(util::config(47261, 47262, 700)).await.unwrap();
    client.add("127.0.0.11").unwrap();

    // Loopback broadcast does not reach the fake, so its status reply
    // is pushed unprompted; the registry still scopes the audience.
    util::send_unsolicited(
        "127.0.0.11",
        47262,
        47261,
        b"RESOLUTION 640 480\nFRAMERATE 24\nTIMESTAMP 2014-04-16 13:05:22.123456\n",
    )
    .await
    .unwrap();

    let outcome = client.status("").await.unwrap();
    assert_eq!(outcome.replies.len(), 1);

    let report = outcome.replies[&addr("127.0.0.11")].as_ref().unwrap();
    assert_eq!((report.width, report.height), (640, 480));
    assert_eq!(report.rate.as_f64(), 24.0);
}
