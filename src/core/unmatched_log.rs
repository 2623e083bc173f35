//! Appends texts that had no dictionary key to a plain-text log.
//!
//! Each run appends one block:
//!
//! ```text
//! # 2026-01-31 09:30:00 unmatched: 2
//! "新功能"
//! "第一行\n第二行"
//! ```

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Escapes control characters so every text stays on one line.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

pub fn format_unmatched_block(texts: &[String], timestamp: &str) -> String {
    let mut block = format!("# {} unmatched: {}\n", timestamp, texts.len());
    for text in texts {
        block.push('"');
        block.push_str(&escape_text(text));
        block.push_str("\"\n");
    }
    block.push('\n');
    block
}

/// Appends a block for `texts` to the log at `path`, creating it if needed.
///
/// An empty set is written only when `always` is set. Returns whether a block
/// was written.
pub fn append_unmatched_log(path: &Path, texts: &[String], always: bool) -> Result<bool> {
    if texts.is_empty() && !always {
        return Ok(false);
    }

    let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
    let block = format_unmatched_block(texts, &timestamp);

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open unmatched log: {:?}", path))?;
    file.write_all(block.as_bytes())
        .with_context(|| format!("Failed to write unmatched log: {:?}", path))?;

    tracing::debug!(path = %path.display(), count = texts.len(), "unmatched texts logged");
    Ok(true)
}
