use serde::{Deserialize, Serialize};

pub const DEFAULT_TEAM_COLOR: &str = "#2196F3";

/// Where a team's games live on the scraped results site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsLocator {
    pub url: String,
    /// Exact team label as it appears inside the results table.
    pub html_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub slug: String,
    pub color: String,
    pub order: u32,
    pub results: Option<ResultsLocator>,
}

impl Team {
    /// URL-safe identifier derived from a display name: "12U Blue" -> "12ublue".
    pub fn slugify(name: &str) -> String {
        name.chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .map(|c| c.to_ascii_lowercase())
            .collect()
    }

    /// Badge text color readable on top of the team color.
    pub fn text_color(&self) -> &'static str {
        if relative_luminance(&self.color) < 0.5 { "white" } else { "black" }
    }

    /// White badges disappear on a white page without an outline.
    pub fn needs_border(&self) -> bool {
        matches!(parse_hex_color(&self.color), Some((255, 255, 255)))
    }
}

fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.trim().strip_prefix('#')?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        3 => {
            let mut digits = hex.chars().map(|c| format!("{c}{c}"));
            let r = channel(&digits.next()?)?;
            let g = channel(&digits.next()?)?;
            let b = channel(&digits.next()?)?;
            Some((r, g, b))
        }
        _ => None,
    }
}

/// WCAG 2.0 relative luminance; unparseable colors count as black.
fn relative_luminance(color: &str) -> f64 {
    let (r, g, b) = parse_hex_color(color).unwrap_or((0, 0, 0));
    let linear = |c: u8| {
        let s = f64::from(c) / 255.0;
        if s <= 0.03928 { s / 12.92 } else { ((s + 0.055) / 1.055).powf(2.4) }
    };
    0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
}
