use colored::*;

pub const TOTAL_WIDTH: usize = 64;
const KEY_WIDTH: usize = 30;

pub fn header(msg: &str) {
    let formatted = format!("⟦ {} ⟧", msg);
    let msg_len = formatted.chars().count();

    let dash_count = TOTAL_WIDTH.saturating_sub(msg_len);
    let left = dash_count / 2;
    let right = dash_count - left;

    println!(
        "{}{}{}",
        "─".repeat(left).bright_black(),
        formatted.to_uppercase().bright_green(),
        "─".repeat(right).bright_black(),
    );
}

pub fn status<T: AsRef<str>>(msg: T) {
    println!("{} {}", ">".bright_black(), msg.as_ref());
}

pub fn aligned_line(key: &str, value: &str) {
    let dots = ".".repeat((KEY_WIDTH + 1).saturating_sub(key.chars().count()));
    println!(
        "{}{}{} {}",
        key.cyan(),
        dots.bright_black(),
        ":".bright_black(),
        value
    );
}

/// Renders rows as a plain aligned table; the first row is the header.
pub fn table(rows: &[Vec<String>]) {
    let Some(header_row) = rows.first() else {
        return;
    };

    let mut widths = vec![0usize; header_row.len()];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    for (idx, row) in rows.iter().enumerate() {
        let line = row
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect::<Vec<_>>()
            .join("  ");
        if idx == 0 {
            println!("{}", line.bold());
            println!(
                "{}",
                "─".repeat(line.chars().count()).bright_black()
            );
        } else {
            println!("{}", line);
        }
    }
}
