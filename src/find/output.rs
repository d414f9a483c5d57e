//! Rendering hits for the terminal.
//!
//! The text format is `<file>:<line>:<col>` followed by one `(<line>)` per
//! alias traversed, outermost first. The JSON format prints one object per
//! hit.

use super::engine::Hit;
use crate::config::OutputFormat;

/// Formats a hit as `file:line:col(alias-line)...`.
pub fn format_text(hit: &Hit, show_alias_chain: bool) -> String {
    let mut line = format!("{}:{}:{}", hit.file.display(), hit.line, hit.col);
    if show_alias_chain {
        for alias in &hit.alias_lines {
            line.push_str(&format!("({})", alias));
        }
    }
    line
}

/// Formats a hit as a single-line JSON object.
pub fn format_json(hit: &Hit) -> serde_json::Result<String> {
    serde_json::to_string(hit)
}

/// Formats a hit in the requested output format.
pub fn format_hit(
    hit: &Hit,
    format: OutputFormat,
    show_alias_chain: bool,
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Text => Ok(format_text(hit, show_alias_chain)),
        OutputFormat::Json => format_json(hit),
    }
}
