use tracing::{info, warn};

use crate::error::Result;
use crate::sheet::Sheet;
use crate::sources::ProvisionalNote;

/// Read freeform notes: Date, Text, and an optional Teams audience column.
pub fn parse_notes_sheet(label: &str, body: &str) -> Result<Vec<ProvisionalNote>> {
    let sheet = Sheet::parse(label, body)?;
    sheet.require_columns(label, &["Date", "Text"])?;
    let mut notes = Vec::new();

    for row in sheet.rows() {
        let (date, text) = (row.get("Date"), row.get("Text"));
        if date.is_empty() || text.is_empty() {
            if !row.is_blank() {
                warn!(source = %label, line = row.line, "Skipping note row missing date or text");
            }
            continue;
        }
        notes.push(ProvisionalNote {
            date: date.to_string(),
            text: text.to_string(),
            audience: row.get("Teams").to_string(),
        });
    }

    info!(source = %label, notes = notes.len(), "Parsed notes sheet");
    Ok(notes)
}
