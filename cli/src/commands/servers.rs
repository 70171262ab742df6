use camnet_core::client::Client;

use crate::terminal::print;

pub fn list(client: &Client, arg: &str) -> anyhow::Result<()> {
    anyhow::ensure!(arg.is_empty(), "unexpected argument \"{arg}\"");

    if client.servers().is_empty() {
        print::status("No servers are defined");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = std::iter::once(vec!["Address".to_string()])
        .chain(client.servers().iter().map(|addr| vec![addr.to_string()]))
        .collect();
    print::table(&rows);
    Ok(())
}

pub fn add(client: &mut Client, arg: &str) -> anyhow::Result<()> {
    anyhow::ensure!(!arg.is_empty(), "you must specify address(es) to add");
    client.add(arg)?;
    Ok(())
}

pub fn remove(client: &mut Client, arg: &str) -> anyhow::Result<()> {
    anyhow::ensure!(!arg.is_empty(), "you must specify address(es) to remove");
    client.remove(arg)?;
    Ok(())
}
