use std::time::Duration;

use camnet_core::client::Client;

use crate::terminal::print;

pub fn show(client: &Client) -> anyhow::Result<()> {
    let config = client.config();
    print::aligned_line("network", &config.network.to_string());
    print::aligned_line("timeout", &format!("{}s", config.timeout.as_secs()));
    print::aligned_line("client_port", &config.client_port.to_string());
    print::aligned_line("server_port", &config.server_port.to_string());
    Ok(())
}

/// `set <name> <value>`. Port changes rebind the socket; the server
/// set carries over.
pub async fn set(client: &mut Client, arg: &str) -> anyhow::Result<()> {
    let (name, value) = arg
        .split_once(char::is_whitespace)
        .map(|(name, value)| (name, value.trim()))
        .ok_or_else(|| anyhow::anyhow!("usage: set <name> <value>"))?;

    match name {
        "timeout" => {
            let secs: u64 = value.parse()?;
            client.set_timeout(Duration::from_secs(secs));
        }
        "network" => {
            let network = value
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid network \"{value}\": {e}"))?;
            client.set_network(network);
        }
        "client_port" => {
            let port: u16 = value.parse()?;
            client.set_client_port(port).await?;
        }
        "server_port" => {
            let port: u16 = value.parse()?;
            client.set_server_port(port);
        }
        _ => anyhow::bail!("unknown setting \"{name}\""),
    }
    Ok(())
}
