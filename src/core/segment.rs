//! The transform unit shared by the markup and script rewriters.
//!
//! A [`Segment`] is built from a plain string, from raw template text, or from
//! the parts of a `+` chain. It carries two views of its text:
//!
//! - `body`: literal text with each hole replaced by `{paramN}`
//! - `stripped`: literal text with holes removed
//!
//! Resolution tries the `body` first (dictionaries may contain `共{param1}条`),
//! then the `stripped` text, so `当前用户：${name}` can still reuse the plain
//! `当前用户` entry.

use crate::core::context::ConversionContext;
use crate::core::text::{Param, Punctuated, extract_interpolation, is_convertible, lookup_form, quote_js_string};

/// One piece of a concatenation chain or template literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text(String),
    /// Source text of a non-literal sub-expression.
    Hole(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    body: String,
    stripped: String,
    params: Vec<Param>,
}

/// A resolved segment: the key and the trailing mark to re-append, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub key: String,
    pub mark: Option<char>,
}

impl Segment {
    pub fn plain(text: &str) -> Self {
        Self {
            body: text.to_string(),
            stripped: text.to_string(),
            params: Vec::new(),
        }
    }

    /// Builds a segment from the raw text between a template's backticks.
    pub fn from_template(raw: &str) -> Self {
        let interpolation = extract_interpolation(raw);
        Self {
            body: interpolation.body,
            stripped: interpolation.stripped,
            params: interpolation.params,
        }
    }

    pub fn from_parts(parts: impl IntoIterator<Item = Part>) -> Self {
        let mut segment = Self::plain("");
        for part in parts {
            match part {
                Part::Text(text) => {
                    segment.body.push_str(&text);
                    segment.stripped.push_str(&text);
                }
                Part::Hole(source) => {
                    let param = Param::new(segment.params.len(), source);
                    segment.body.push_str(&param.placeholder());
                    segment.params.push(param);
                }
            }
        }
        segment
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Decided on the literal text alone, so holes never make a segment convertible.
    pub fn is_convertible(&self) -> bool {
        is_convertible(&self.stripped)
    }

    /// Resolves the segment to a key, recording a miss on the context.
    ///
    /// On a miss the placeholder body is recorded and, unless the context skips
    /// unmatched text, used as the key.
    pub fn resolve(&self, ctx: &mut ConversionContext<'_>) -> Option<Resolved> {
        let primary = lookup_form(&self.body);
        if let Some(resolved) = Self::lookup(ctx, primary) {
            return Some(resolved);
        }
        if !self.params.is_empty()
            && let Some(resolved) = Self::lookup(ctx, lookup_form(&self.stripped))
        {
            return Some(resolved);
        }
        ctx.miss(primary.body).map(|key| Resolved {
            key,
            mark: primary.mark,
        })
    }

    fn lookup(ctx: &ConversionContext<'_>, form: Punctuated<'_>) -> Option<Resolved> {
        ctx.lookup(form.body).key().map(|key| Resolved {
            key: key.to_string(),
            mark: form.mark,
        })
    }

    /// Convenience for the common "convertible and resolved" check.
    pub fn convert(&self, ctx: &mut ConversionContext<'_>, callee: &str, quote: char) -> Option<String> {
        if !self.is_convertible() {
            return None;
        }
        self.resolve(ctx)
            .map(|resolved| resolved.render_call(callee, &self.params, quote))
    }
}

impl Resolved {
    /// Renders `callee('key')`, `callee('key', { param1: expr })`, and appends
    /// `+ ':'` when a trailing mark was stripped.
    pub fn render_call(&self, callee: &str, params: &[Param], quote: char) -> String {
        let key = quote_js_string(&self.key, quote);
        let call = if params.is_empty() {
            format!("{}({})", callee, key)
        } else {
            let fields = params
                .iter()
                .map(|param| format!("{}: {}", param.name, param.source))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{}({}, {{ {} }})", callee, key, fields)
        };
        match self.mark {
            Some(mark) => format!("{} + {}", call, quote_js_string(&mark.to_string(), quote)),
            None => call,
        }
    }
}
