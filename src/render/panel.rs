//! Supplementary panels for known intents

use serde_json::{Map, Value};

pub const BATCH_LOCATION: &str = "batch_location";
pub const BATCH_HANDLER: &str = "batch_handler";
pub const BATCH_INFO: &str = "batch_info";
pub const BATCH_HISTORY: &str = "batch_history";

/// Structured detail shown beneath a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Panel {
    BatchLocation {
        batch_code: Option<String>,
        location: String,
        status: String,
        handler: Option<String>,
    },
    BatchHandler {
        batch_code: Option<String>,
        handler: String,
        location: String,
        status: String,
    },
    BatchInfo {
        batch_code: String,
        location: String,
        status: String,
        product_name: Option<String>,
        quantity: Option<String>,
    },
    BatchHistory {
        batch_code: Option<String>,
        entries: Vec<HistoryEntry>,
    },
}

/// One movement in a batch's history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub location: String,
    pub status: String,
    pub timestamp: Option<String>,
    pub handler: Option<String>,
}

impl Panel {
    /// Build the panel for `intent`, or `None` if the intent is unknown or
    /// `data` lacks a required field.
    pub fn from_intent(intent: &str, data: &Map<String, Value>) -> Option<Panel> {
        let panel = match intent {
            BATCH_LOCATION => Panel::BatchLocation {
                batch_code: field(data, "batch_code"),
                location: field(data, "location")?,
                status: field(data, "status")?,
                handler: field(data, "handler"),
            },
            BATCH_HANDLER => Panel::BatchHandler {
                batch_code: field(data, "batch_code"),
                handler: field(data, "handler")?,
                location: field(data, "location")?,
                status: field(data, "status")?,
            },
            BATCH_INFO => Panel::BatchInfo {
                batch_code: field(data, "batch_code")?,
                location: field(data, "location")?,
                status: field(data, "status")?,
                product_name: field(data, "product_name"),
                quantity: field(data, "quantity"),
            },
            BATCH_HISTORY => Panel::BatchHistory {
                batch_code: field(data, "batch_code"),
                entries: history_entries(data)?,
            },
            _ => return None,
        };
        Some(panel)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Panel::BatchLocation { .. } => "Batch location",
            Panel::BatchHandler { .. } => "Batch handler",
            Panel::BatchInfo { .. } => "Batch details",
            Panel::BatchHistory { .. } => "Batch history",
        }
    }

    /// Labelled scalar fields in display order, optional ones only when set.
    /// History entries are listed separately.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        let fields: Vec<(&'static str, Option<&String>)> = match self {
            Panel::BatchLocation {
                batch_code,
                location,
                status,
                handler,
            } => vec![
                ("Batch", batch_code.as_ref()),
                ("Location", Some(location)),
                ("Status", Some(status)),
                ("Handler", handler.as_ref()),
            ],
            Panel::BatchHandler {
                batch_code,
                handler,
                location,
                status,
            } => vec![
                ("Batch", batch_code.as_ref()),
                ("Handler", Some(handler)),
                ("Location", Some(location)),
                ("Status", Some(status)),
            ],
            Panel::BatchInfo {
                batch_code,
                location,
                status,
                product_name,
                quantity,
            } => vec![
                ("Batch", Some(batch_code)),
                ("Product", product_name.as_ref()),
                ("Quantity", quantity.as_ref()),
                ("Location", Some(location)),
                ("Status", Some(status)),
            ],
            Panel::BatchHistory { batch_code, .. } => vec![("Batch", batch_code.as_ref())],
        };

        fields
            .into_iter()
            .filter_map(|(label, value)| value.map(|v| (label, v.as_str())))
            .collect()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        match self {
            Panel::BatchHistory { entries, .. } => entries,
            _ => &[],
        }
    }
}

/// Scalar field as display text. Null, arrays and objects count as missing.
fn field(data: &Map<String, Value>, key: &str) -> Option<String> {
    match data.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Every entry must carry location and status, and there must be at least
/// one entry.
fn history_entries(data: &Map<String, Value>) -> Option<Vec<HistoryEntry>> {
    let entries = data.get("history")?.as_array()?;
    if entries.is_empty() {
        return None;
    }

    entries
        .iter()
        .map(|entry| {
            let entry = entry.as_object()?;
            Some(HistoryEntry {
                location: field(entry, "location")?,
                status: field(entry, "status")?,
                timestamp: field(entry, "timestamp"),
                handler: field(entry, "handler"),
            })
        })
        .collect()
}
