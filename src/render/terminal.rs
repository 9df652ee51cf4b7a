//! Plain-text layout for the terminal front-end

use super::{Body, Panel, RenderedMessage, Table};
use crate::transcript::Role;
use crate::transport::BatchInfo;
use chrono::{DateTime, Utc};

const INDENT: &str = "  ";

/// `You · 14:03` style header
pub fn header(role: Role, timestamp: DateTime<Utc>) -> String {
    format!("{} · {}", role.display_name(), timestamp.format("%H:%M"))
}

/// Display lines for one rendered message
pub fn format_message(message: &RenderedMessage) -> Vec<String> {
    let mut lines = vec![header(message.role, message.timestamp)];

    match &message.body {
        Body::Paragraph(text) => {
            lines.extend(text.lines().map(|line| format!("{INDENT}{line}")));
        }
        Body::Table(table) => lines.extend(format_table(table)),
    }

    if let Some(panel) = &message.panel {
        lines.extend(format_panel(panel));
    }

    lines
}

/// Columns padded to the widest cell, header separated by a rule
pub fn format_table(table: &Table) -> Vec<String> {
    let columns = table
        .rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(table.column_count()))
        .max()
        .unwrap_or(0);

    let mut widths = vec![0; columns];
    for row in std::iter::once(&table.header).chain(&table.rows) {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let format_row = |row: &[String]| {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect();
        format!("{INDENT}{}", cells.join(" | ").trim_end())
    };

    let rule: Vec<String> = widths
        .iter()
        .take(table.column_count())
        .map(|w| "-".repeat(*w))
        .collect();

    let mut lines = vec![format_row(&table.header), format!("{INDENT}{}", rule.join("-+-"))];
    lines.extend(table.rows.iter().map(|row| format_row(row)));
    lines
}

/// Panel title followed by `label: value` lines
pub fn format_panel(panel: &Panel) -> Vec<String> {
    let mut lines = vec![format!("{INDENT}[{}]", panel.title())];
    lines.extend(
        panel
            .fields()
            .into_iter()
            .map(|(label, value)| format!("{INDENT}{label}: {value}")),
    );

    for (i, entry) in panel.history().iter().enumerate() {
        let mut line = format!("{INDENT}{}. {} ({})", i + 1, entry.location, entry.status);
        if let Some(timestamp) = &entry.timestamp {
            line.push_str(&format!(" at {timestamp}"));
        }
        if let Some(handler) = &entry.handler {
            line.push_str(&format!(" by {handler}"));
        }
        lines.push(line);
    }

    lines
}

/// Error banner line
pub fn format_banner(text: &str) -> String {
    format!("! {text}")
}

/// Result of a direct batch lookup
pub fn format_batch_info(info: &BatchInfo) -> Vec<String> {
    let mut lines = vec![
        format!("Batch: {}", info.batch_code),
        format!("Location: {}", info.location),
        format!("Status: {}", info.status),
        format!("Updated: {}", info.timestamp),
    ];
    if let Some(handler) = &info.handler {
        lines.push(format!("Handler: {handler}"));
    }
    lines
}
