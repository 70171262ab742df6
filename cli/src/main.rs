mod commands;
mod shell;
mod terminal;

use camnet_core::client::Client;
use commands::CommandLine;
use terminal::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CommandLine::parse_args();

    logging::init();

    let client = Client::bind(args.to_config()).await?;
    shell::run(client).await
}
