//! AST visitor that turns string literals, template literals and `+` chains
//! into translation calls.
//!
//! The visitor never mutates the tree. It records [`Edit`]s against the byte
//! spans of the nodes it replaces and stops descending into a node once it has
//! been replaced, so edits never overlap.

use std::ops::Range;

use swc_common::{BytePos, Span, Spanned};
use swc_ecma_ast::{
    BinaryOp, CallExpr, Callee, Expr, Lit, MemberProp, Str, Tpl, TsEnumMember, TsType,
};
use swc_ecma_visit::{Visit, VisitWith};

use super::CodeOptions;
use crate::core::context::ConversionContext;
use crate::core::edit::Edit;
use crate::core::segment::{Part, Segment};

/// Member names that mark a call as a translation call on any receiver.
const TRANSLATION_MEMBERS: &[&str] = &["t", "$t"];

/// One element of a flattened `+` chain.
enum ChainPart<'e> {
    Literal(&'e Str),
    Hole(&'e Expr),
}

pub struct ScriptRewriter<'c, 'a, 's> {
    ctx: &'c mut ConversionContext<'a>,
    options: &'c CodeOptions<'c>,
    source: &'s str,
    /// Source-map position of byte 0 of `source`.
    base: BytePos,
    edits: Vec<Edit>,
}

impl<'c, 'a, 's> ScriptRewriter<'c, 'a, 's> {
    pub fn new(
        ctx: &'c mut ConversionContext<'a>,
        options: &'c CodeOptions<'c>,
        source: &'s str,
        base: BytePos,
    ) -> Self {
        Self {
            ctx,
            options,
            source,
            base,
            edits: Vec::new(),
        }
    }

    pub fn into_edits(self) -> Vec<Edit> {
        self.edits
    }

    fn range(&self, span: Span) -> Range<usize> {
        (span.lo.0 - self.base.0) as usize..(span.hi.0 - self.base.0) as usize
    }

    fn source_of(&self, span: Span) -> &'s str {
        let source: &'s str = self.source;
        source.get(self.range(span)).unwrap_or_default()
    }

    /// Quote style of the literal at `span`, so replacements match the file.
    fn quote_at(&self, span: Span) -> char {
        match self.source_of(span).chars().next() {
            Some(quote @ ('\'' | '"')) => quote,
            _ => '\'',
        }
    }

    fn replace_with(&mut self, span: Span, segment: &Segment, quote: char) -> bool {
        let Some(call) = segment.convert(self.ctx, self.options.callee, quote) else {
            return false;
        };
        tracing::debug!(text = segment.body(), call = %call, "rewrite");
        self.edits.push(Edit::new(self.range(span), call));
        true
    }

    /// Plain string literal outside any `+` chain.
    fn convert_str(&mut self, node: &Str) {
        let Some(value) = node.value.as_str() else {
            return;
        };
        let quote = self.quote_at(node.span);
        self.replace_with(node.span, &Segment::plain(value), quote);
    }

    /// Template literal. Static text uses the cooked value so escapes such as
    /// `\n` are matched as the characters they denote; params keep the original
    /// expression source.
    fn convert_template(&mut self, tpl: &Tpl) -> bool {
        let mut parts = Vec::with_capacity(tpl.quasis.len() + tpl.exprs.len());
        for (position, quasi) in tpl.quasis.iter().enumerate() {
            let Some(cooked) = quasi.cooked.as_ref().and_then(|cooked| cooked.as_str()) else {
                return false;
            };
            if !cooked.is_empty() {
                parts.push(Part::Text(cooked.to_string()));
            }
            if let Some(expr) = tpl.exprs.get(position) {
                parts.push(Part::Hole(self.source_of(expr.span()).to_string()));
            }
        }
        self.replace_with(tpl.span, &Segment::from_parts(parts), '\'')
    }

    /// Whole `+` chain. The chain is folded first and decided as one unit; its
    /// literal parts are never visited on their own.
    fn convert_concat(&mut self, expr: &Expr) {
        let mut chain = Vec::new();
        flatten_concat(expr, &mut chain);

        let quote = chain
            .iter()
            .find_map(|part| match part {
                ChainPart::Literal(s) => Some(self.quote_at(s.span)),
                ChainPart::Hole(_) => None,
            })
            .unwrap_or('\'');

        let parts: Option<Vec<Part>> = chain
            .iter()
            .map(|part| match part {
                ChainPart::Literal(s) => s.value.as_str().map(|value| Part::Text(value.to_string())),
                ChainPart::Hole(hole) => Some(Part::Hole(self.source_of(hole.span()).to_string())),
            })
            .collect();

        if let Some(parts) = parts
            && self.replace_with(expr.span(), &Segment::from_parts(parts), quote)
        {
            return;
        }

        for part in &chain {
            if let ChainPart::Hole(hole) = part {
                self.visit_expr(hole);
            }
        }
    }

    /// Diagnostic and translation calls keep their textual arguments as they are.
    fn is_protected_callee(&self, callee: &Expr) -> bool {
        let Some(path) = callee_path(callee) else {
            return false;
        };
        let segments: Vec<&str> = path.split('.').collect();
        let Some((last, receivers)) = segments.split_last() else {
            return false;
        };

        let is_diagnostic = receivers
            .iter()
            .any(|receiver| self.options.log_receivers.iter().any(|name| name == receiver));
        let is_translation = path == self.options.callee || TRANSLATION_MEMBERS.contains(last);
        is_diagnostic || is_translation
    }
}

impl Visit for ScriptRewriter<'_, '_, '_> {
    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Lit(Lit::Str(s)) => self.convert_str(s),
            Expr::Tpl(tpl) => {
                if !self.convert_template(tpl) {
                    tpl.visit_children_with(self);
                }
            }
            Expr::Bin(bin) if bin.op == BinaryOp::Add && contains_string_literal(expr) => {
                self.convert_concat(expr)
            }
            _ => expr.visit_children_with(self),
        }
    }

    fn visit_call_expr(&mut self, node: &CallExpr) {
        let Callee::Expr(callee) = &node.callee else {
            node.visit_children_with(self);
            return;
        };
        if !self.is_protected_callee(callee) {
            node.visit_children_with(self);
            return;
        }

        callee.visit_with(self);
        for arg in &node.args {
            if !is_text_argument(&arg.expr) {
                arg.visit_with(self);
            }
        }
    }

    /// `obj['键']` is a lookup key, not display text.
    fn visit_member_prop(&mut self, node: &MemberProp) {
        if let MemberProp::Computed(computed) = node
            && matches!(&*computed.expr, Expr::Lit(Lit::Str(_)))
        {
            return;
        }
        node.visit_children_with(self);
    }

    fn visit_ts_type(&mut self, _: &TsType) {}

    /// Enum initializers must stay constant.
    fn visit_ts_enum_member(&mut self, _: &TsEnumMember) {}
}

/// Checks if a `+` tree holds a string literal anywhere, looking through parentheses.
fn contains_string_literal(expr: &Expr) -> bool {
    match expr {
        Expr::Lit(Lit::Str(_)) => true,
        Expr::Bin(bin) if bin.op == BinaryOp::Add => {
            contains_string_literal(&bin.left) || contains_string_literal(&bin.right)
        }
        Expr::Paren(paren) => contains_string_literal(&paren.expr),
        _ => false,
    }
}

/// Flattens a `+` chain left to right.
///
/// Nested `+` expressions are opened only while they contain a string literal;
/// `a + 1 + "元"` keeps `a + 1` as one hole so numeric addition is preserved.
fn flatten_concat<'e>(expr: &'e Expr, out: &mut Vec<ChainPart<'e>>) {
    match expr {
        Expr::Bin(bin) if bin.op == BinaryOp::Add && contains_string_literal(expr) => {
            flatten_concat(&bin.left, out);
            flatten_concat(&bin.right, out);
        }
        Expr::Paren(paren) if contains_string_literal(&paren.expr) => {
            flatten_concat(&paren.expr, out)
        }
        Expr::Lit(Lit::Str(s)) => out.push(ChainPart::Literal(s)),
        _ => out.push(ChainPart::Hole(expr)),
    }
}

/// Arguments that a protected call keeps verbatim.
fn is_text_argument(expr: &Expr) -> bool {
    match expr {
        Expr::Lit(Lit::Str(_)) | Expr::Tpl(_) => true,
        Expr::Paren(paren) => is_text_argument(&paren.expr),
        _ => contains_string_literal(expr),
    }
}

/// Dotted path of a callee such as `this.$t` or `console.log`.
fn callee_path(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Ident(ident) => Some(ident.sym.to_string()),
        Expr::This(_) => Some("this".to_string()),
        Expr::Paren(paren) => callee_path(&paren.expr),
        Expr::Member(member) => {
            let MemberProp::Ident(prop) = &member.prop else {
                return None;
            };
            let object = callee_path(&member.obj)?;
            Some(format!("{}.{}", object, prop.sym))
        }
        _ => None,
    }
}
