//! Loads the key -> text dictionary from a JSON file or from a JS/TS module
//! whose exported object literal is evaluated statically.

use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use serde_json::{Map, Number, Value};
use swc_ecma_ast::{
    AssignTarget, Decl, Expr, Lit, MemberProp, Module, ModuleDecl, ModuleItem, ObjectLit, Prop,
    PropName, PropOrSpread, SimpleAssignTarget, Stmt,
};

use crate::core::script::{ScriptLang, parse_script};

/// Reads a dictionary file into a JSON value.
///
/// `.json` files are parsed as they are. Script modules are parsed with swc and
/// the first exported object literal is evaluated: `export default {...}`,
/// `export default defineMessages({...})`, `module.exports = {...}` or
/// `export const messages = {...}`.
pub fn load_dictionary(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read dictionary: {:?}", path))?;
    let ext = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();

    let value = if ext == "json" {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON dictionary: {:?}", path))?
    } else if let Some(lang) = ScriptLang::from_extension(ext) {
        evaluate_module_source(&content, lang)
            .with_context(|| format!("Failed to evaluate dictionary module: {:?}", path))?
    } else {
        bail!("Unsupported dictionary format: {:?}", path);
    };

    Ok(unwrap_default(value))
}

/// Like [`load_dictionary`], but a failure is logged and yields `Value::Null`,
/// which builds an empty index.
pub fn load_dictionary_or_empty(path: &Path) -> Value {
    match load_dictionary(path) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!("{:#}; continuing with an empty dictionary", err);
            Value::Null
        }
    }
}

pub fn evaluate_module_source(code: &str, lang: ScriptLang) -> Result<Value> {
    let parsed = parse_script(code, lang)?;
    match exported_object(&parsed.module) {
        Some(obj) => Ok(evaluate_object(obj)),
        None => bail!("no exported object literal found"),
    }
}

/// `{ default: {...} }` as produced by some module interop layers.
fn unwrap_default(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.len() == 1 && map.get("default").is_some_and(Value::is_object) => {
            map.remove("default").unwrap_or_default()
        }
        other => other,
    }
}

fn exported_object(module: &Module) -> Option<&ObjectLit> {
    module.body.iter().find_map(|item| match item {
        ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(export)) => object_of(&export.expr),
        ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => match &export.decl {
            Decl::Var(var) => var
                .decls
                .iter()
                .find_map(|decl| decl.init.as_deref().and_then(object_of)),
            _ => None,
        },
        ModuleItem::Stmt(Stmt::Expr(stmt)) => match &*stmt.expr {
            Expr::Assign(assign) if is_module_exports(&assign.left) => object_of(&assign.right),
            _ => None,
        },
        _ => None,
    })
}

fn is_module_exports(target: &AssignTarget) -> bool {
    let AssignTarget::Simple(SimpleAssignTarget::Member(member)) = target else {
        return false;
    };
    matches!(&*member.obj, Expr::Ident(obj) if obj.sym.as_str() == "module")
        && matches!(&member.prop, MemberProp::Ident(prop) if prop.sym.as_str() == "exports")
}

/// The object literal itself, or the single argument of a wrapper call.
fn object_of(expr: &Expr) -> Option<&ObjectLit> {
    match unwrap_ts_expr(expr) {
        Expr::Object(obj) => Some(obj),
        Expr::Call(call) if call.args.len() == 1 && call.args[0].spread.is_none() => {
            object_of(&call.args[0].expr)
        }
        _ => None,
    }
}

fn unwrap_ts_expr(expr: &Expr) -> &Expr {
    match expr {
        Expr::TsAs(ts_as) => unwrap_ts_expr(&ts_as.expr),
        Expr::TsConstAssertion(ts_const) => unwrap_ts_expr(&ts_const.expr),
        Expr::TsSatisfies(ts_sat) => unwrap_ts_expr(&ts_sat.expr),
        Expr::Paren(paren) => unwrap_ts_expr(&paren.expr),
        _ => expr,
    }
}

fn evaluate_object(obj: &ObjectLit) -> Value {
    let mut map = Map::new();
    for prop in &obj.props {
        // spreads and methods carry no static text
        let PropOrSpread::Prop(prop) = prop else {
            continue;
        };
        let Prop::KeyValue(kv) = &**prop else {
            continue;
        };
        if let Some(key) = prop_name(&kv.key)
            && let Some(value) = evaluate(&kv.value)
        {
            map.insert(key, value);
        }
    }
    Value::Object(map)
}

fn evaluate(expr: &Expr) -> Option<Value> {
    match unwrap_ts_expr(expr) {
        Expr::Lit(Lit::Str(s)) => s.value.as_str().map(Value::from),
        Expr::Lit(Lit::Num(n)) => Some(number(n.value)),
        Expr::Lit(Lit::Bool(b)) => Some(Value::Bool(b.value)),
        Expr::Lit(Lit::Null(_)) => Some(Value::Null),
        Expr::Tpl(tpl) if tpl.exprs.is_empty() => tpl
            .quasis
            .first()
            .and_then(|q| q.cooked.as_ref())
            .and_then(|s| s.as_str().map(Value::from)),
        Expr::Object(obj) => Some(evaluate_object(obj)),
        Expr::Array(arr) => Some(Value::Array(
            arr.elems
                .iter()
                .flatten()
                .filter(|elem| elem.spread.is_none())
                .filter_map(|elem| evaluate(&elem.expr))
                .collect(),
        )),
        _ => None,
    }
}

fn number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Value::from(value as i64)
    } else {
        Number::from_f64(value).map_or(Value::Null, Value::Number)
    }
}

fn prop_name(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(s) => s.value.as_str().map(|s| s.to_string()),
        PropName::Num(n) => Some(n.value.to_string()),
        _ => None,
    }
}
