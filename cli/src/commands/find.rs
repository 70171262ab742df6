use camnet_core::client::Client;

use crate::terminal::print;

pub async fn find(client: &mut Client) -> anyhow::Result<()> {
    let servers = client.find().await?;
    print::status(format!("Found {} servers", servers.len()));
    Ok(())
}
