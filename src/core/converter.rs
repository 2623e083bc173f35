//! Per-file conversion pipeline.
//!
//! A file is split into regions, markup regions are rewritten first and code
//! regions second, and the results are spliced back. The converter never
//! writes files; callers decide what to do with a [`FileOutcome`].

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::core::context::ConversionContext;
use crate::core::edit::Edit;
use crate::core::markup::convert_markup_region;
use crate::core::script::{CodeOptions, ScriptError, convert_code_region_or_original};
use crate::core::source::{RegionKind, SourceDocument};

/// Call names used when emitting translation calls.
#[derive(Debug, Clone, Copy)]
pub struct ConvertOptions<'o> {
    pub template_callee: &'o str,
    pub script_callee: &'o str,
    pub log_receivers: &'o [String],
}

/// A code region that failed to parse and was left as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionFailure {
    /// 1-based line in the whole file.
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub output: String,
    pub changed: bool,
    pub failures: Vec<RegionFailure>,
}

impl FileOutcome {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

pub struct Converter<'c, 'a> {
    ctx: &'c mut ConversionContext<'a>,
    options: ConvertOptions<'c>,
}

impl<'c, 'a> Converter<'c, 'a> {
    pub fn new(ctx: &'c mut ConversionContext<'a>, options: ConvertOptions<'c>) -> Self {
        Self { ctx, options }
    }

    pub fn convert_file(&mut self, path: &Path) -> Result<FileOutcome> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
        Ok(self.convert_source(path, &content))
    }

    /// Converts `content` as if it were read from `path`; the extension picks
    /// the region layout.
    pub fn convert_source(&mut self, path: &Path, content: &str) -> FileOutcome {
        let document = SourceDocument::parse(path, content);
        let mut edits = Vec::new();
        let mut failures = Vec::new();

        let markup = document
            .regions()
            .iter()
            .filter(|region| region.kind == RegionKind::Markup);
        for region in markup {
            let text = document.region_text(region);
            let converted = convert_markup_region(text, self.ctx, self.options.template_callee);
            if converted != text {
                edits.push(Edit::new(region.range.clone(), converted));
            }
        }

        let code_options = CodeOptions {
            callee: self.options.script_callee,
            log_receivers: self.options.log_receivers,
        };
        for region in document.regions() {
            let RegionKind::Code(lang) = region.kind else {
                continue;
            };
            let text = document.region_text(region);
            let (converted, error) = convert_code_region_or_original(text, self.ctx, lang, &code_options);
            if let Some(ScriptError::Parse { line, message }) = error {
                let region_line = content[..region.range.start].matches('\n').count();
                failures.push(RegionFailure {
                    line: region_line + line,
                    message,
                });
            }
            if converted != text {
                edits.push(Edit::new(region.range.clone(), converted));
            }
        }

        let changed = !edits.is_empty();
        let output = document.reassemble(edits);
        tracing::debug!(path = %path.display(), changed, failures = failures.len(), "file converted");

        FileOutcome {
            path: path.to_path_buf(),
            output,
            changed,
            failures,
        }
    }
}
