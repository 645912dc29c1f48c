//! Text line source for recovered document text.

use std::fs;
use std::path::Path;

/// Trimmed, non-empty lines in source order.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Lines of a text rendition of a report. Unreadable files yield no lines.
pub fn read_text_lines(path: &Path) -> Vec<String> {
    match fs::read_to_string(path) {
        Ok(text) => {
            let lines = split_lines(&text);
            if lines.is_empty() {
                tracing::warn!(path = %path.display(), "document read but no text recovered");
            }
            lines
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "document unreadable");
            Vec::new()
        }
    }
}
