use camnet_core::client::{Client, Decoded};
use camnet_core::protocol::Framerate;

use crate::terminal::print;

/// `resolution <width>x<height> [addresses]`
pub async fn resolution(client: &Client, arg: &str) -> anyhow::Result<()> {
    anyhow::ensure!(!arg.is_empty(), "you must specify a resolution");
    let (res, spec_text) = split_arg(arg);

    let (width, height) = res
        .to_ascii_lowercase()
        .split_once('x')
        .and_then(|(w, h)| Some((w.parse::<u32>().ok()?, h.parse::<u32>().ok()?)))
        .ok_or_else(|| anyhow::anyhow!("invalid resolution \"{res}\""))?;

    let outcome = client.set_resolution(width, height, spec_text).await?;
    report_acks(&outcome, &format!("resolution to {width}x{height}"));
    Ok(())
}

/// `framerate <rate> [addresses]`
pub async fn framerate(client: &Client, arg: &str) -> anyhow::Result<()> {
    anyhow::ensure!(!arg.is_empty(), "you must specify a framerate");
    let (rate_text, spec_text) = split_arg(arg);

    let rate: Framerate = rate_text.parse()?;
    let outcome = client.set_framerate(rate, spec_text).await?;
    report_acks(&outcome, &format!("framerate to {rate}"));
    Ok(())
}

/// `capture [addresses]`
pub async fn capture(client: &Client, arg: &str) -> anyhow::Result<()> {
    let collection = client.capture(arg).await?;
    print::status(format!(
        "Capture triggered on {} servers",
        collection.replies.len()
    ));
    Ok(())
}

fn split_arg(arg: &str) -> (&str, &str) {
    match arg.split_once(char::is_whitespace) {
        Some((first, rest)) => (first, rest.trim()),
        None => (arg, ""),
    }
}

fn report_acks(outcome: &Decoded<()>, what: &str) {
    for (addr, ack) in &outcome.replies {
        match ack {
            Ok(()) => print::status(format!("Changed {what} on {addr}")),
            Err(e) => print::status(format!("Failed to change {what} on {addr}: {e}")),
        }
    }
}
