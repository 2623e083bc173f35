//! Syntax-tree rewriter for executable code.
//!
//! The region is parsed with swc, walked by [`ScriptRewriter`], and the
//! collected edits are spliced into the original text. Nothing outside the
//! replaced nodes is regenerated, so formatting, comments and whitespace
//! survive untouched.

mod parser;
mod rewriter;

use swc_ecma_visit::VisitWith;
use thiserror::Error;

pub use parser::{ParsedScript, ScriptLang, parse_script};
pub use rewriter::ScriptRewriter;

use crate::core::context::ConversionContext;
use crate::core::edit::apply_edits;

/// Errors raised while rewriting a code region.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// The region could not be parsed; it is left unchanged.
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// Call names and receivers that drive the code rewriter.
#[derive(Debug, Clone, Copy)]
pub struct CodeOptions<'o> {
    /// Callee emitted for converted text, e.g. `i18n.t`.
    pub callee: &'o str,
    /// Receivers whose calls carry diagnostic text, e.g. `console`.
    pub log_receivers: &'o [String],
}

/// Rewrites convertible literals in a code region.
pub fn convert_code_region(
    text: &str,
    ctx: &mut ConversionContext<'_>,
    lang: ScriptLang,
    options: &CodeOptions<'_>,
) -> Result<String, ScriptError> {
    let parsed = parse_script(text, lang)?;
    let mut rewriter = ScriptRewriter::new(ctx, options, text, parsed.start_pos);
    parsed.module.visit_with(&mut rewriter);
    Ok(apply_edits(text, rewriter.into_edits()))
}

/// Like [`convert_code_region`], but returns the region unchanged on failure
/// together with the error.
pub fn convert_code_region_or_original(
    text: &str,
    ctx: &mut ConversionContext<'_>,
    lang: ScriptLang,
    options: &CodeOptions<'_>,
) -> (String, Option<ScriptError>) {
    match convert_code_region(text, ctx, lang, options) {
        Ok(converted) => (converted, None),
        Err(err) => {
            tracing::warn!(%err, "code region left unchanged");
            (text.to_string(), Some(err))
        }
    }
}
