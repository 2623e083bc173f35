//! Splits a source file into markup and code regions.
//!
//! Single-file components carry one top-level `<template>` and any number of
//! `<script>` blocks; plain script files are one code region and `.html`
//! files one markup region. Regions are byte ranges into the original text so
//! converted regions can be spliced back without touching anything else.

use std::ops::Range;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::edit::{Edit, apply_edits};
use crate::core::script::ScriptLang;

/// Top-level blocks of a single-file component, plus comments so that a
/// commented-out block is never picked up.
static BLOCK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!--[\s\S]*?-->|<(template|script|style)\b([^>]*)>").unwrap()
});

static TEMPLATE_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(/?)template\b[^>]*?(/?)>").unwrap());

static LANG_ATTR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\blang\s*=\s*["']([^"']*)["']"#).unwrap());

/// Kind of file, decided by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Component,
    Markup,
    Script(ScriptLang),
}

impl SourceKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        match ext {
            "vue" => Some(Self::Component),
            "html" | "htm" => Some(Self::Markup),
            _ => ScriptLang::from_extension(ext).map(Self::Script),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    Markup,
    Code(ScriptLang),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub kind: RegionKind,
    pub range: Range<usize>,
}

#[derive(Debug)]
pub struct SourceDocument<'s> {
    content: &'s str,
    regions: Vec<Region>,
}

impl<'s> SourceDocument<'s> {
    /// Splits `content` according to the kind of `path`. Unknown kinds yield no
    /// regions.
    pub fn parse(path: &Path, content: &'s str) -> Self {
        let whole = 0..content.len();
        let regions = match SourceKind::from_path(path) {
            Some(SourceKind::Component) => split_component(content),
            Some(SourceKind::Markup) => vec![Region {
                kind: RegionKind::Markup,
                range: whole,
            }],
            Some(SourceKind::Script(lang)) => vec![Region {
                kind: RegionKind::Code(lang),
                range: whole,
            }],
            None => Vec::new(),
        };
        Self { content, regions }
    }

    pub fn content(&self) -> &'s str {
        self.content
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region_text(&self, region: &Region) -> &'s str {
        &self.content[region.range.clone()]
    }

    /// Splices replacement region texts back into the document.
    pub fn reassemble(&self, replacements: Vec<Edit>) -> String {
        apply_edits(self.content, replacements)
    }
}

fn split_component(content: &str) -> Vec<Region> {
    let mut regions = Vec::new();
    let mut cursor = 0;
    let mut seen_template = false;

    while let Some(caps) = BLOCK_REGEX.captures(&content[cursor..]) {
        let Some(whole) = caps.get(0) else {
            break;
        };
        let open_end = cursor + whole.end();
        let Some(name) = caps.get(1) else {
            // comment
            cursor = open_end;
            continue;
        };
        let attrs = caps.get(2).map_or("", |m| m.as_str());
        if attrs.trim_end().ends_with('/') {
            cursor = open_end;
            continue;
        }

        match name.as_str() {
            "template" => {
                let (inner_end, next) = find_template_close(content, open_end);
                if !seen_template {
                    regions.push(Region {
                        kind: RegionKind::Markup,
                        range: open_end..inner_end,
                    });
                    seen_template = true;
                }
                cursor = next;
            }
            "script" => {
                let (inner_end, next) = find_close(content, open_end, "</script>");
                let lang = LANG_ATTR_REGEX
                    .captures(attrs)
                    .and_then(|c| c.get(1))
                    .map_or(ScriptLang::Js, |m| ScriptLang::from_lang_attr(m.as_str()));
                regions.push(Region {
                    kind: RegionKind::Code(lang),
                    range: open_end..inner_end,
                });
                cursor = next;
            }
            _ => {
                let (_, next) = find_close(content, open_end, "</style>");
                cursor = next;
            }
        }
    }

    regions
}

/// Finds the `</template>` that closes the block opened before `from`, counting
/// nested templates. Returns the end of the inner content and the position after
/// the closing tag; an unterminated block runs to the end of the file.
fn find_template_close(content: &str, from: usize) -> (usize, usize) {
    let mut depth = 1usize;
    for caps in TEMPLATE_TAG_REGEX.captures_iter(&content[from..]) {
        let Some(tag) = caps.get(0) else {
            continue;
        };
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let self_closing = caps.get(2).is_some_and(|m| !m.as_str().is_empty());
        if closing {
            depth -= 1;
            if depth == 0 {
                return (from + tag.start(), from + tag.end());
            }
        } else if !self_closing {
            depth += 1;
        }
    }
    (content.len(), content.len())
}

fn find_close(content: &str, from: usize, close_tag: &str) -> (usize, usize) {
    match content[from..].find(close_tag) {
        Some(offset) => (from + offset, from + offset + close_tag.len()),
        None => (content.len(), content.len()),
    }
}
