//! Output formatting for the `convert` command.
//!
//! Everything goes through `*_to` functions taking a writer so the format can
//! be tested without capturing stdout.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::RegionFailure;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Unmatched texts longer than this many columns are cut in the listing.
const MAX_TEXT_WIDTH: usize = 40;

/// Totals of one `convert` run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConvertSummary {
    pub files_scanned: usize,
    pub files_changed: usize,
    pub files_failed: usize,
    pub unmatched_count: usize,
    pub apply: bool,
    /// Log the unmatched texts were appended to, if any.
    pub log_file: Option<String>,
}

pub fn print_changed_file(path: &str, apply: bool) {
    print_changed_file_to(path, apply, &mut io::stdout().lock());
}

pub fn print_changed_file_to<W: Write>(path: &str, apply: bool, writer: &mut W) {
    let label = if apply {
        "converted".green().bold()
    } else {
        "would convert".yellow().bold()
    };
    let _ = writeln!(writer, "{} {}", label, path);
}

/// Print a code region that was left unchanged because it failed to parse.
pub fn print_region_failure(path: &str, failure: &RegionFailure) {
    print_region_failure_to(path, failure, &mut io::stdout().lock());
}

pub fn print_region_failure_to<W: Write>(path: &str, failure: &RegionFailure, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{}: {}  {}",
        "error".bold().red(),
        failure.message,
        "parse-error".dimmed().cyan()
    );
    let _ = writeln!(writer, "  {} {}:{}", "-->".blue(), path, failure.line);
}

/// Print a file that could not be read or written.
pub fn print_file_error(path: &str, error: &anyhow::Error) {
    print_file_error_to(path, error, &mut io::stdout().lock());
}

pub fn print_file_error_to<W: Write>(path: &str, error: &anyhow::Error, writer: &mut W) {
    let _ = writeln!(writer, "{}: {:#}", "error".bold().red(), error);
    let _ = writeln!(writer, "  {} {}", "-->".blue(), path);
}

pub fn print_unmatched(texts: &[String]) {
    print_unmatched_to(texts, &mut io::stdout().lock());
}

/// Lists texts without a dictionary key, one per line.
pub fn print_unmatched_to<W: Write>(texts: &[String], writer: &mut W) {
    if texts.is_empty() {
        return;
    }
    let _ = writeln!(
        writer,
        "{}: {} text(s) without a dictionary key",
        "warning".bold().yellow(),
        texts.len()
    );
    for text in texts {
        let _ = writeln!(writer, "  {} {}", "|".blue(), truncate_to_width(text, MAX_TEXT_WIDTH));
    }
}

pub fn print_summary(summary: &ConvertSummary) {
    print_summary_to(summary, &mut io::stdout().lock());
}

pub fn print_summary_to<W: Write>(summary: &ConvertSummary, writer: &mut W) {
    let files = |n: usize| if n == 1 { "file" } else { "files" };

    if summary.files_changed == 0 && summary.files_failed == 0 {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "Checked {} {} - nothing to convert",
                summary.files_scanned,
                files(summary.files_scanned)
            )
            .green()
        );
    } else if summary.apply {
        let _ = writeln!(
            writer,
            "{} {} of {} {}.",
            "Converted".green().bold(),
            summary.files_changed,
            summary.files_scanned,
            files(summary.files_scanned)
        );
    } else {
        let _ = writeln!(
            writer,
            "{} {} of {} {}.",
            "Would convert".yellow().bold(),
            summary.files_changed,
            summary.files_scanned,
            files(summary.files_scanned)
        );
        if summary.files_changed > 0 {
            let _ = writeln!(writer, "Run with {} to write these changes.", "--apply".cyan());
        }
    }

    if summary.files_failed > 0 {
        let _ = writeln!(
            writer,
            "{} {} {} could not be converted.",
            FAILURE_MARK.red(),
            summary.files_failed,
            files(summary.files_failed)
        );
    }

    if let Some(log_file) = &summary.log_file {
        let _ = writeln!(
            writer,
            "Unmatched text ({}) appended to {}.",
            summary.unmatched_count, log_file
        );
    }
}

/// Cuts `text` to at most `max_width` display columns, marking the cut with `…`.
/// CJK characters count as two columns.
fn truncate_to_width(text: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut width = 0;
    for c in text.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if width + w > max_width - 1 {
            break;
        }
        width += w;
        out.push(c);
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn render<F: FnOnce(&mut Vec<u8>)>(f: F) -> String {
        colored::control::set_override(false);
        let mut out = Vec::new();
        f(&mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("短文本", 40), "短文本");
        assert_eq!(truncate_to_width("一二三四五六", 7), "一二三…");
        assert_eq!(truncate_to_width("abcdefgh", 5), "abcd…");
    }

    #[test]
    fn test_region_failure_format() {
        let failure = RegionFailure {
            line: 12,
            message: "Expected ident".to_string(),
        };
        let output = render(|w| print_region_failure_to("src/App.vue", &failure, w));
        assert_eq!(output, "error: Expected ident  parse-error\n  --> src/App.vue:12\n");
    }

    #[test]
    fn test_unmatched_listing() {
        let texts = vec!["新功能".to_string(), "第二个".to_string()];
        let output = render(|w| print_unmatched_to(&texts, w));
        assert_eq!(
            output,
            "warning: 2 text(s) without a dictionary key\n  | 新功能\n  | 第二个\n"
        );
        assert_eq!(render(|w| print_unmatched_to(&[], w)), "");
    }

    #[test]
    fn test_summary_dry_run() {
        let summary = ConvertSummary {
            files_scanned: 3,
            files_changed: 2,
            ..Default::default()
        };
        let output = render(|w| print_summary_to(&summary, w));
        assert_eq!(
            output,
            "Would convert 2 of 3 files.\nRun with --apply to write these changes.\n"
        );
    }

    #[test]
    fn test_summary_apply_with_failures_and_log() {
        let summary = ConvertSummary {
            files_scanned: 1,
            files_changed: 1,
            files_failed: 1,
            unmatched_count: 4,
            apply: true,
            log_file: Some("i18n-unmatched.log".to_string()),
        };
        let output = render(|w| print_summary_to(&summary, w));
        assert_eq!(
            output,
            "Converted 1 of 1 file.\n\u{2718} 1 file could not be converted.\nUnmatched text (4) appended to i18n-unmatched.log.\n"
        );
    }

    #[test]
    fn test_summary_nothing_to_do() {
        let summary = ConvertSummary {
            files_scanned: 1,
            ..Default::default()
        };
        let output = render(|w| print_summary_to(&summary, w));
        assert_eq!(output, "\u{2713} Checked 1 file - nothing to convert\n");
    }
}
