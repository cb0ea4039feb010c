use std::collections::HashMap;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::warn;

use crate::error::{Result, ScheduleError};

/// A CSV export whose columns are addressed by header name.
///
/// Rows shorter than the header are kept; absent cells read as "". Rows the
/// CSV reader rejects are logged and dropped.
#[derive(Debug)]
pub struct Sheet {
    columns: HashMap<String, usize>,
    rows: Vec<(usize, StringRecord)>,
}

/// One data row, 1-based `line` counts the header as line 1.
pub struct SheetRow<'a> {
    columns: &'a HashMap<String, usize>,
    record: &'a StringRecord,
    pub line: usize,
}

impl Sheet {
    pub fn parse(label: &str, body: &str) -> Result<Self> {
        let body = body.strip_prefix('\u{feff}').unwrap_or(body);
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::All)
            .from_reader(body.as_bytes());

        let columns = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, h)| (normalize_header(h), i))
            .collect::<HashMap<_, _>>();

        let mut rows = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let line = i + 2;
            match record {
                Ok(record) => rows.push((line, record)),
                Err(e) => warn!(source = %label, line, error = %e, "Skipping malformed CSV row"),
            }
        }
        Ok(Self { columns, rows })
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(&normalize_header(name))
    }

    /// Names the first required header the sheet lacks.
    pub fn require_columns(&self, label: &str, columns: &[&str]) -> Result<()> {
        match columns.iter().find(|c| !self.has_column(c)) {
            Some(missing) => Err(ScheduleError::MissingColumn {
                label: label.to_string(),
                column: missing.to_string(),
            }),
            None => Ok(()),
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = SheetRow<'_>> {
        self.rows.iter().map(|(line, record)| SheetRow { columns: &self.columns, record, line: *line })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl SheetRow<'_> {
    pub fn get(&self, column: &str) -> &str {
        self.columns
            .get(&normalize_header(column))
            .and_then(|&i| self.record.get(i))
            .map(str::trim)
            .unwrap_or("")
    }

    /// Like `get`, but `None` for an empty cell.
    pub fn opt(&self, column: &str) -> Option<&str> {
        Some(self.get(column)).filter(|s| !s.is_empty())
    }

    pub fn is_blank(&self) -> bool {
        self.record.iter().all(|c| c.trim().is_empty())
    }
}

fn normalize_header(h: &str) -> String {
    h.trim().to_ascii_lowercase()
}
