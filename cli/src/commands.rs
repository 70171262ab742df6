pub mod control;
pub mod find;
pub mod servers;
pub mod settings;
pub mod status;

use std::time::Duration;

use camnet_common::config::Config;
use camnet_core::client::Client;
use clap::Parser;
use ipnetwork::Ipv4Network;

#[derive(Parser)]
#[command(name = "camnet")]
#[command(about = "Controls a network of camera servers over a UDP text protocol.")]
pub struct CommandLine {
    /// Subnet the camera servers live on
    #[arg(long, default_value = "192.168.0.0/16")]
    pub network: Ipv4Network,
    /// Local port to bind the client socket to
    #[arg(long, default_value_t = 8000)]
    pub client_port: u16,
    /// Port the servers listen on
    #[arg(long, default_value_t = 8000)]
    pub server_port: u16,
    /// Seconds to wait for responses to each command
    #[arg(long, default_value_t = 5)]
    pub timeout: u64,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn to_config(&self) -> Config {
        Config {
            network: self.network,
            client_port: self.client_port,
            server_port: self.server_port,
            timeout: Duration::from_secs(self.timeout),
        }
    }
}

/// Routes one tokenized shell line to its handler.
pub async fn dispatch(client: &mut Client, command: &str, arg: &str) -> anyhow::Result<()> {
    match command {
        "find" => find::find(client).await,
        "servers" => servers::list(client, arg),
        "add" => servers::add(client, arg),
        "remove" => servers::remove(client, arg),
        "status" => status::status(client, arg).await,
        "resolution" => control::resolution(client, arg).await,
        "framerate" => control::framerate(client, arg).await,
        "capture" => control::capture(client, arg).await,
        "config" => settings::show(client),
        "set" => settings::set(client, arg).await,
        _ => anyhow::bail!("unknown command \"{command}\" (type \"help\" for a list)"),
    }
}
