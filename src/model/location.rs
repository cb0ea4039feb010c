use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    /// Empty means "show the full name".
    pub abbreviation: String,
    pub address: Option<String>,
}

impl Location {
    pub fn has_abbreviation(&self) -> bool {
        !self.abbreviation.trim().is_empty()
    }

    /// Text shown in the schedule cell.
    pub fn display_name(&self) -> &str {
        if self.has_abbreviation() { &self.abbreviation } else { &self.name }
    }
}
