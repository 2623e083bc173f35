//! Pattern-based rewriter for template markup.
//!
//! There is no markup AST here. The region is rewritten by a fixed sequence of
//! passes, each of which only touches spans it can positively identify and
//! leaves everything else byte-for-byte:
//!
//! 1. hide `<!-- -->` comments behind placeholder tokens
//! 2. quoted literals inside `{{ }}`
//! 3. template literals inside `{{ }}`
//! 4. text between tags
//! 5. static attributes -> bound attributes
//! 6. quoted literals inside bound attribute expressions
//! 7. template literals inside bound attribute expressions
//! 8. restore comments
//!
//! Every pass skips literals that are already the argument of a translation
//! call, so running the rewriter on its own output changes nothing.

use std::ops::Range;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::core::context::ConversionContext;
use crate::core::segment::Segment;
use crate::core::text::{opposite_quote, skip_quoted, skip_template};

static COMMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<!--[\s\S]*?-->").unwrap());

static COMMENT_TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__I18N_COMMENT_(\d+)__").unwrap());

/// `{{ ... }}` that does not contain another `{{`.
static INTERPOLATION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(?:[^{]|\{[^{])*?\}\}").unwrap());

/// Spans inside a text node that are never converted: interpolations and
/// protected comments.
static TEXT_BREAK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{(?:[^{]|\{[^{])*?\}\}|__I18N_COMMENT_\d+__").unwrap()
});

/// `name="value"` or `name='value'` preceded by whitespace inside a tag.
static ATTRIBUTE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\s)([^\s"'<>/=]+)(\s*=\s*)(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

/// Elements whose content is never scanned for text.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "pre", "code"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LiteralKind {
    Quoted,
    Template,
}

/// A slice of the markup: a tag, a text node, or raw element content.
#[derive(Debug, Clone, PartialEq, Eq)]
enum MarkupToken {
    Tag(Range<usize>),
    Text(Range<usize>),
    Raw(Range<usize>),
}

/// Rewrites convertible text in a markup region into `callee('key')` calls.
pub fn convert_markup_region(text: &str, ctx: &mut ConversionContext<'_>, callee: &str) -> String {
    MarkupRewriter::new(ctx, callee).rewrite(text)
}

pub struct MarkupRewriter<'c, 'a> {
    ctx: &'c mut ConversionContext<'a>,
    callee: &'c str,
}

impl<'c, 'a> MarkupRewriter<'c, 'a> {
    pub fn new(ctx: &'c mut ConversionContext<'a>, callee: &'c str) -> Self {
        Self { ctx, callee }
    }

    pub fn rewrite(mut self, text: &str) -> String {
        let (text, comments) = protect_comments(text);
        let text = self.rewrite_interpolations(&text, LiteralKind::Quoted);
        let text = self.rewrite_interpolations(&text, LiteralKind::Template);
        let text = self.rewrite_text_nodes(&text);
        let text = self.rewrite_static_attributes(&text);
        let text = self.rewrite_bound_attributes(&text, LiteralKind::Quoted);
        let text = self.rewrite_bound_attributes(&text, LiteralKind::Template);
        restore_comments(&text, &comments)
    }

    /// Passes 2 and 3: literals inside `{{ ... }}`.
    fn rewrite_interpolations(&mut self, text: &str, kind: LiteralKind) -> String {
        INTERPOLATION_REGEX
            .replace_all(text, |caps: &Captures<'_>| {
                let whole = &caps[0];
                let inner = &whole[2..whole.len() - 2];
                format!("{{{{{}}}}}", self.rewrite_expression(inner, kind, '\''))
            })
            .into_owned()
    }

    /// Rewrites literals of one kind inside a JavaScript expression.
    ///
    /// `quote` is the delimiter used for emitted keys; inside an attribute value it
    /// must differ from the attribute's own quote.
    fn rewrite_expression(&mut self, expr: &str, kind: LiteralKind, quote: char) -> String {
        let mut out = String::with_capacity(expr.len());
        let mut last = 0;
        for (literal_kind, range) in scan_literals(expr) {
            if literal_kind != kind {
                continue;
            }
            let before = &expr[..range.start];
            let after = &expr[range.end..];
            if is_translation_argument(before, self.callee)
                || is_property_key(before, after)
                || is_computed_member(before)
                || (kind == LiteralKind::Template && is_tagged_template(before))
            {
                continue;
            }
            let content = &expr[range.start + 1..range.end - 1];
            let segment = match kind {
                LiteralKind::Quoted => Segment::plain(content),
                LiteralKind::Template => Segment::from_template(content),
            };
            if let Some(call) = segment.convert(self.ctx, self.callee, quote) {
                out.push_str(&expr[last..range.start]);
                out.push_str(&call);
                last = range.end;
            }
        }
        out.push_str(&expr[last..]);
        out
    }

    /// Pass 4: text nodes between tags, split around `{{ }}` spans and comments.
    fn rewrite_text_nodes(&mut self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for token in tokenize(text) {
            match token {
                MarkupToken::Text(range) => out.push_str(&self.rewrite_text_node(&text[range])),
                MarkupToken::Tag(range) | MarkupToken::Raw(range) => out.push_str(&text[range]),
            }
        }
        out
    }

    fn rewrite_text_node(&mut self, node: &str) -> String {
        let mut out = String::with_capacity(node.len());
        let mut last = 0;
        for span in TEXT_BREAK_REGEX.find_iter(node) {
            out.push_str(&self.rewrite_text_literal(&node[last..span.start()]));
            out.push_str(span.as_str());
            last = span.end();
        }
        out.push_str(&self.rewrite_text_literal(&node[last..]));
        out
    }

    /// Converts one literal run of text, keeping its surrounding whitespace.
    fn rewrite_text_literal(&mut self, literal: &str) -> String {
        let core = literal.trim();
        if core.is_empty() {
            return literal.to_string();
        }
        let Some(call) = Segment::plain(core).convert(self.ctx, self.callee, '\'') else {
            return literal.to_string();
        };
        let leading = &literal[..literal.len() - literal.trim_start().len()];
        let trailing = &literal[literal.trim_end().len()..];
        format!("{}{{{{ {} }}}}{}", leading, call, trailing)
    }

    /// Pass 5: `title="标题"` becomes `:title="$t('key')"`.
    fn rewrite_static_attributes(&mut self, text: &str) -> String {
        self.rewrite_attributes(text, |rewriter, attr| {
            if attr.is_directive() {
                return None;
            }
            let quote = opposite_quote(attr.quote);
            let call = Segment::plain(attr.value).convert(rewriter.ctx, rewriter.callee, quote)?;
            Some(format!(
                "{}:{}{}{}{}{}",
                attr.leading, attr.name, attr.equals, attr.quote, call, attr.quote
            ))
        })
    }

    /// Passes 6 and 7: literals inside `:attr` / `v-bind:attr` expressions.
    fn rewrite_bound_attributes(&mut self, text: &str, kind: LiteralKind) -> String {
        self.rewrite_attributes(text, |rewriter, attr| {
            if !attr.is_bound() {
                return None;
            }
            let value = rewriter.rewrite_expression(attr.value, kind, opposite_quote(attr.quote));
            if value == attr.value {
                return None;
            }
            Some(format!(
                "{}{}{}{}{}{}",
                attr.leading, attr.name, attr.equals, attr.quote, value, attr.quote
            ))
        })
    }

    /// Applies `rewrite` to every attribute of every opening tag.
    fn rewrite_attributes<F>(&mut self, text: &str, mut rewrite: F) -> String
    where
        F: FnMut(&mut Self, &Attribute<'_>) -> Option<String>,
    {
        let mut out = String::with_capacity(text.len());
        for token in tokenize(text) {
            let range = match token {
                MarkupToken::Tag(range) if is_opening_tag(&text[range.clone()]) => range,
                MarkupToken::Tag(range) | MarkupToken::Text(range) | MarkupToken::Raw(range) => {
                    out.push_str(&text[range]);
                    continue;
                }
            };
            let tag = &text[range];
            let rewritten = ATTRIBUTE_REGEX.replace_all(tag, |caps: &Captures<'_>| {
                let attr = Attribute::from_captures(caps);
                rewrite(self, &attr).unwrap_or_else(|| caps[0].to_string())
            });
            out.push_str(&rewritten);
        }
        out
    }
}

/// One `name="value"` attribute found inside a tag.
struct Attribute<'t> {
    leading: &'t str,
    name: &'t str,
    equals: &'t str,
    quote: char,
    value: &'t str,
}

impl<'t> Attribute<'t> {
    fn from_captures(caps: &Captures<'t>) -> Self {
        let (quote, value) = match (caps.get(4), caps.get(5)) {
            (Some(value), _) => ('"', value.as_str()),
            (None, Some(value)) => ('\'', value.as_str()),
            (None, None) => ('"', ""),
        };
        Self {
            leading: caps.get(1).map_or("", |m| m.as_str()),
            name: caps.get(2).map_or("", |m| m.as_str()),
            equals: caps.get(3).map_or("", |m| m.as_str()),
            quote,
            value,
        }
    }

    /// Directives (`:x`, `@x`, `#x`, `v-*`) are never static text.
    fn is_directive(&self) -> bool {
        self.name.starts_with([':', '@', '#', '.']) || self.name.starts_with("v-")
    }

    /// Bound attributes hold JavaScript expressions that may carry display text.
    fn is_bound(&self) -> bool {
        self.name.starts_with(':')
            || self.name.starts_with("v-bind:")
            || matches!(self.name, "v-text" | "v-html")
    }
}

/// Replaces comments with `__I18N_COMMENT_n__` tokens.
fn protect_comments(text: &str) -> (String, Vec<String>) {
    let mut comments = Vec::new();
    let protected = COMMENT_REGEX
        .replace_all(text, |caps: &Captures<'_>| {
            comments.push(caps[0].to_string());
            format!("__I18N_COMMENT_{}__", comments.len() - 1)
        })
        .into_owned();
    (protected, comments)
}

fn restore_comments(text: &str, comments: &[String]) -> String {
    COMMENT_TOKEN_REGEX
        .replace_all(text, |caps: &Captures<'_>| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| comments.get(index))
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Checks if a literal starting right after `before` is the first argument of a
/// translation call such as `$t(`, `this.$t(`, `i18n.t(` or the configured callee.
pub(crate) fn is_translation_argument(before: &str, callee: &str) -> bool {
    let Some(head) = before.trim_end().strip_suffix('(') else {
        return false;
    };
    let head = head.trim_end();
    let path_start = head
        .char_indices()
        .rev()
        .find(|&(_, c)| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.')))
        .map_or(0, |(i, c)| i + c.len_utf8());
    let path = &head[path_start..];
    if path.is_empty() {
        return false;
    }
    let last = path.rsplit('.').next().unwrap_or(path);
    path == callee || matches!(last, "t" | "$t")
}

/// Finds the string and template literals at the top level of an expression.
///
/// Quotes inside template text or inside `${}` holes belong to the enclosing
/// template and are not reported. An unterminated template ends the scan.
fn scan_literals(expr: &str) -> Vec<(LiteralKind, Range<usize>)> {
    let bytes = expr.as_bytes();
    let mut literals = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'\'' | b'"') => match skip_quoted(bytes, i + 1, quote) {
                Some(end) => {
                    literals.push((LiteralKind::Quoted, i..end + 1));
                    i = end + 1;
                }
                None => i += 1,
            },
            b'`' => {
                let Some(end) = skip_template(bytes, i + 1) else {
                    break;
                };
                literals.push((LiteralKind::Template, i..end + 1));
                i = end + 1;
            }
            _ => i += 1,
        }
    }
    literals
}

/// `{ '键': value }` or `{ a, '键': value }`: a literal used as an object key.
fn is_property_key(before: &str, after: &str) -> bool {
    before.trim_end().ends_with(['{', ',']) && after.trim_start().starts_with(':')
}

/// `obj['键']`: a literal used as a computed member key.
fn is_computed_member(before: &str) -> bool {
    before
        .trim_end()
        .strip_suffix('[')
        .and_then(|head| head.trim_end().chars().last())
        .is_some_and(|c| c.is_alphanumeric() || matches!(c, '_' | '$' | ')' | ']'))
}

/// A backtick directly after an identifier or `)` starts a tagged template.
fn is_tagged_template(before: &str) -> bool {
    before
        .chars()
        .last()
        .is_some_and(|c| c.is_alphanumeric() || matches!(c, '_' | '$' | ')' | ']'))
}

fn is_opening_tag(tag: &str) -> bool {
    tag.as_bytes().get(1).is_some_and(u8::is_ascii_alphabetic)
}

/// Lower-cased element name of an opening tag.
fn tag_name(tag: &str) -> String {
    tag[1..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Splits markup into tags, text nodes and raw element content.
///
/// Tag ends are found with quote tracking so `>` inside an attribute value does
/// not end the tag, and closed `{{ }}` spans in text are skipped whole so
/// `a < b` inside an interpolation is not read as a tag.
fn tokenize(text: &str) -> Vec<MarkupToken> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'{' && bytes.get(i + 1) == Some(&b'{') {
            // An unterminated `{{` is ordinary text.
            i = INTERPOLATION_REGEX
                .find(&text[i..])
                .filter(|span| span.start() == 0)
                .map_or(i + 2, |span| i + span.end());
            continue;
        }
        let starts_tag = bytes[i] == b'<'
            && bytes
                .get(i + 1)
                .is_some_and(|&c| c.is_ascii_alphabetic() || c == b'/' || c == b'!');
        if !starts_tag {
            i += 1;
            continue;
        }

        if text_start < i {
            tokens.push(MarkupToken::Text(text_start..i));
        }
        let end = find_tag_end(bytes, i + 1);
        let tag = &text[i..end];
        tokens.push(MarkupToken::Tag(i..end));
        i = end;

        if is_opening_tag(tag) && !tag.ends_with("/>") {
            let name = tag_name(tag);
            if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
                let closing = format!("</{}", name);
                let raw_end = text[end..]
                    .to_ascii_lowercase()
                    .find(&closing)
                    .map_or(bytes.len(), |offset| end + offset);
                if end < raw_end {
                    tokens.push(MarkupToken::Raw(end..raw_end));
                }
                i = raw_end;
            }
        }
        text_start = i;
    }
    if text_start < bytes.len() {
        tokens.push(MarkupToken::Text(text_start..bytes.len()));
    }
    tokens
}

/// Returns the index just past the `>` closing a tag.
fn find_tag_end(bytes: &[u8], start: usize) -> usize {
    let mut quote = None;
    for (offset, &c) in bytes[start..].iter().enumerate() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == b'"' || c == b'\'' => quote = Some(c),
            None if c == b'>' => return start + offset + 1,
            None => {}
        }
    }
    bytes.len()
}
