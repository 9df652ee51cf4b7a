//! Reply rendering
//!
//! Pure functions from a transcript `Message` to a display model. Nothing
//! here touches the store or the terminal; `terminal` turns the model into
//! lines of text.

mod panel;
pub mod terminal;

pub use panel::Panel;

use crate::transcript::{Message, Role};
use chrono::{DateTime, Utc};

/// Cell delimiter for tabular replies
pub const TABLE_DELIMITER: char = '|';

/// Display model for one message
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMessage {
    pub role: Role,
    pub timestamp: DateTime<Utc>,
    pub body: Body,
    pub panel: Option<Panel>,
}

/// How the message text is shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Full text, internal line breaks preserved
    Paragraph(String),
    Table(Table),
}

/// Pipe-delimited rows. Rows keep their own cell count, which may differ
/// from the header's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn column_count(&self) -> usize {
        self.header.len()
    }
}

/// Render one message. Deterministic in its input.
pub fn render_message(message: &Message) -> RenderedMessage {
    let text = message.content.display_text();

    let (body, panel) = match message.role {
        Role::User => (Body::Paragraph(text), None),
        Role::Assistant => {
            let panel = match (&message.intent, &message.data) {
                (Some(intent), Some(data)) => Panel::from_intent(intent, data),
                _ => None,
            };
            (classify(&text), panel)
        }
    };

    RenderedMessage {
        role: message.role,
        timestamp: message.timestamp,
        body,
        panel,
    }
}

/// Decide between paragraph and table for assistant text
pub fn classify(text: &str) -> Body {
    let rows: Vec<&str> = text
        .lines()
        .filter(|line| line.contains(TABLE_DELIMITER))
        .collect();

    match rows.split_first() {
        Some((header, data)) if !data.is_empty() => Body::Table(Table {
            header: split_row(header),
            rows: data.iter().map(|line| split_row(line)).collect(),
        }),
        _ => Body::Paragraph(text.to_string()),
    }
}

fn split_row(line: &str) -> Vec<String> {
    line.split(TABLE_DELIMITER)
        .map(|cell| cell.trim().to_string())
        .collect()
}
