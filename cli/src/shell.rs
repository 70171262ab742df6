//! The interactive session loop. Tokenizes lines, dispatches to the
//! command handlers, and keeps going on recoverable errors.

use std::io::{self, BufRead, Write};

use camnet_core::client::Client;
use tracing::error;

use crate::commands;
use crate::terminal::print;

const PROMPT: &str = "cam> ";

pub async fn run(mut client: Client) -> anyhow::Result<()> {
    print::header("camnet client");
    print::status("Type \"help\" for more information, or \"find\" to locate camera servers");

    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        print!("{PROMPT}");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let input = line.trim();
        let (command, arg) = match input.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (input, ""),
        };

        match command {
            "" => {}
            "quit" | "exit" => break,
            "help" => help(),
            _ => {
                if let Err(e) = commands::dispatch(&mut client, command, arg).await {
                    error!("{e:#}");
                }
            }
        }
    }

    Ok(())
}

fn help() {
    print::status("Available commands:");
    for (name, text) in [
        ("find", "discover servers on the subnet"),
        ("servers", "list the current server set"),
        ("add <addresses>", "add addresses to the server set"),
        ("remove <addresses>", "remove addresses from the server set"),
        ("status [addresses]", "query capture settings"),
        ("resolution <WxH> [addresses]", "set the capture resolution"),
        ("framerate <rate> [addresses]", "set the capture framerate"),
        ("capture [addresses]", "trigger an image capture"),
        ("config", "show the client configuration"),
        ("set <name> <value>", "change a configuration value"),
        ("quit", "leave the shell"),
    ] {
        print::aligned_line(name, text);
    }
    print::status("Addresses: single, dash range, or a comma-separated mix of both");
}
