use swc_common::{BytePos, FileName, Globals, SourceMap, Spanned};
use swc_ecma_ast::Module;
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax, TsSyntax};

use super::ScriptError;

/// Dialect of a code region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ScriptLang {
    #[default]
    Js,
    Jsx,
    Ts,
    Tsx,
}

impl ScriptLang {
    /// Dialect implied by a file extension (`vue` and `html` have none).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "js" | "mjs" | "cjs" => Some(Self::Js),
            "jsx" => Some(Self::Jsx),
            "ts" | "mts" | "cts" => Some(Self::Ts),
            "tsx" => Some(Self::Tsx),
            _ => None,
        }
    }

    /// Dialect from a `<script lang="...">` attribute value.
    pub fn from_lang_attr(lang: &str) -> Self {
        Self::from_extension(lang.trim()).unwrap_or_default()
    }

    fn syntax(self) -> Syntax {
        match self {
            Self::Js | Self::Jsx => Syntax::Es(EsSyntax {
                jsx: self == Self::Jsx,
                decorators: true,
                ..Default::default()
            }),
            Self::Ts | Self::Tsx => Syntax::Typescript(TsSyntax {
                tsx: self == Self::Tsx,
                decorators: true,
                ..Default::default()
            }),
        }
    }
}

pub struct ParsedScript {
    pub module: Module,
    /// Position of the first byte of the region in the source map.
    pub start_pos: BytePos,
}

/// Parse a code region into a module AST.
///
/// Recoverable syntax errors are treated as failures too: a partially parsed
/// tree would produce edits at the wrong places.
pub fn parse_script(code: &str, lang: ScriptLang) -> Result<ParsedScript, ScriptError> {
    use swc_common::GLOBALS;

    GLOBALS.set(&Globals::new(), || {
        let source_map = SourceMap::default();
        let source_file = source_map.new_source_file(FileName::Anon.into(), code.to_string());

        let mut parser = Parser::new(lang.syntax(), StringInput::from(&*source_file), None);
        let parse_error = |err: swc_ecma_parser::error::Error| ScriptError::Parse {
            line: source_map.lookup_char_pos(err.span().lo).line,
            message: err.kind().msg().to_string(),
        };

        let module = parser.parse_module().map_err(parse_error)?;
        if let Some(err) = parser.take_errors().into_iter().next() {
            return Err(parse_error(err));
        }

        Ok(ParsedScript {
            module,
            start_pos: source_file.start_pos,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lang_from_extension() {
        assert_eq!(ScriptLang::from_extension("ts"), Some(ScriptLang::Ts));
        assert_eq!(ScriptLang::from_extension("mjs"), Some(ScriptLang::Js));
        assert_eq!(ScriptLang::from_extension("vue"), None);
        assert_eq!(ScriptLang::from_lang_attr("tsx"), ScriptLang::Tsx);
        assert_eq!(ScriptLang::from_lang_attr("coffee"), ScriptLang::Js);
    }

    #[test]
    fn test_parse_valid_script() {
        let parsed = parse_script("const a = '你好';\nexport default a;", ScriptLang::Js);
        assert!(parsed.is_ok());
        assert_eq!(parsed.unwrap().module.body.len(), 2);
    }

    #[test]
    fn test_parse_typescript() {
        let parsed = parse_script("const a: string = '你好' as string;", ScriptLang::Ts);
        assert!(parsed.is_ok());
    }

    #[test]
    fn test_parse_error_reports_line() {
        let result = parse_script("const a = 1;\nconst = ;", ScriptLang::Js);
        match result {
            Err(ScriptError::Parse { line, .. }) => assert_eq!(line, 2),
            Ok(_) => panic!("Expected parse error"),
        }
    }
}
