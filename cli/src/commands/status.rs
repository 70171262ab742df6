use camnet_core::client::Client;

use crate::terminal::print;

pub async fn status(client: &Client, arg: &str) -> anyhow::Result<()> {
    let outcome = client.status(arg).await?;

    let mut rows = vec![vec![
        "Address".to_string(),
        "Resolution".to_string(),
        "Framerate".to_string(),
        "Timestamp".to_string(),
    ]];
    for (addr, report) in &outcome.replies {
        match report {
            Ok(report) => rows.push(vec![
                addr.to_string(),
                format!("{}x{}", report.width, report.height),
                format!("{}fps", report.rate),
                report.timestamp.format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
            ]),
            Err(e) => rows.push(vec![
                addr.to_string(),
                format!("<{e}>"),
                String::new(),
                String::new(),
            ]),
        }
    }
    print::table(&rows);
    Ok(())
}
