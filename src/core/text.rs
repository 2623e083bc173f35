//! Text classification and normalization shared by every rewrite path.
//!
//! Both rewriters and the dictionary index go through these functions, so a
//! string is trimmed, stripped of its trailing colon and compared in exactly
//! the same way no matter where it was found.

/// Full-width colon, the most common label suffix in Chinese UIs.
pub const FULL_WIDTH_COLON: char = '：';

/// ASCII colon.
pub const ASCII_COLON: char = ':';

/// Checks if a character is in the CJK Unified Ideographs block (U+4E00..=U+9FA5).
pub fn is_cjk_ideograph(c: char) -> bool {
    ('\u{4E00}'..='\u{9FA5}').contains(&c)
}

/// Trims leading and trailing ASCII spaces only.
///
/// Newlines, tabs and carriage returns are kept: they take part in key matching.
pub fn normalize(text: &str) -> &str {
    text.trim_matches(' ')
}

/// Checks if the text should be converted into a translation call.
///
/// The text qualifies when, after [`normalize`], it is not empty, is not made
/// only of ASCII digits, and contains at least one CJK ideograph. Mixed text such
/// as `"保存 Draft"` qualifies as a whole.
///
/// # Examples
///
/// ```
/// use i18n_convert::core::text::is_convertible;
///
/// assert!(is_convertible("保存"));
/// assert!(is_convertible("  用户 Name  "));
/// assert!(!is_convertible("Save"));
/// assert!(!is_convertible("2024"));
/// assert!(!is_convertible("   "));
/// ```
pub fn is_convertible(text: &str) -> bool {
    let text = normalize(text);
    if text.is_empty() || text.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    text.chars().any(is_cjk_ideograph)
}

/// Text with its trailing colon split off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Punctuated<'a> {
    pub body: &'a str,
    pub mark: Option<char>,
}

impl Punctuated<'_> {
    pub fn is_present(&self) -> bool {
        self.mark.is_some()
    }
}

/// Splits a single trailing `:` or `：` off the text.
///
/// The mark is re-emitted as a literal next to the translation call, so the
/// dictionary never needs a `"label："` variant of `"label"`.
pub fn detect_trailing_punctuation(text: &str) -> Punctuated<'_> {
    match text.chars().last() {
        Some(mark @ (FULL_WIDTH_COLON | ASCII_COLON)) => Punctuated {
            body: &text[..text.len() - mark.len_utf8()],
            mark: Some(mark),
        },
        _ => Punctuated {
            body: text,
            mark: None,
        },
    }
}

/// Normalized lookup form of a text: trimmed, colon stripped, trimmed again.
pub fn lookup_form(text: &str) -> Punctuated<'_> {
    let punctuated = detect_trailing_punctuation(normalize(text));
    Punctuated {
        body: normalize(punctuated.body),
        mark: punctuated.mark,
    }
}

/// An embedded expression replaced by a positional placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Synthetic name (`param1`, `param2`, ...).
    pub name: String,
    /// Expression source exactly as written.
    pub source: String,
}

impl Param {
    pub fn new(index: usize, source: impl Into<String>) -> Self {
        Self {
            name: format!("param{}", index + 1),
            source: source.into(),
        }
    }

    pub fn placeholder(&self) -> String {
        format!("{{{}}}", self.name)
    }
}

/// Result of scanning template text for `${...}` expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpolation {
    /// Text with each expression replaced by `{paramN}`.
    pub body: String,
    /// Text with each expression removed.
    pub stripped: String,
    pub params: Vec<Param>,
    /// Computed on `stripped`, never on `body`.
    pub contains_convertible_text: bool,
}

/// Extracts `${...}` expressions from the raw text of a template literal.
///
/// Expressions are numbered in order of appearance. Brace depth, nested string
/// literals and nested templates inside an expression are tracked so that
/// `${fmt({ a: "}" })}` is read as a single expression. An unterminated `${`
/// is kept as literal text.
pub fn extract_interpolation(template: &str) -> Interpolation {
    let bytes = template.as_bytes();
    let mut body = String::with_capacity(template.len());
    let mut stripped = String::with_capacity(template.len());
    let mut params = Vec::new();

    let mut literal_start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                let Some(end) = find_expression_end(bytes, i + 2) else {
                    break;
                };
                let literal = &template[literal_start..i];
                body.push_str(literal);
                stripped.push_str(literal);

                let param = Param::new(params.len(), template[i + 2..end].trim());
                body.push_str(&param.placeholder());
                params.push(param);

                i = end + 1;
                literal_start = i;
            }
            _ => i += 1,
        }
    }
    let rest = &template[literal_start.min(template.len())..];
    body.push_str(rest);
    stripped.push_str(rest);

    let contains_convertible_text = is_convertible(&stripped);
    Interpolation {
        body,
        stripped,
        params,
        contains_convertible_text,
    }
}

/// Finds the `}` closing an expression that starts at `start`.
fn find_expression_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' if depth == 0 => return Some(i),
            b'}' => depth -= 1,
            quote @ (b'\'' | b'"') => i = skip_quoted(bytes, i + 1, quote)?,
            b'`' => i = skip_template(bytes, i + 1)?,
            _ => {}
        }
        i += 1;
    }
    None
}

/// Returns the index of the closing quote.
pub(crate) fn skip_quoted(bytes: &[u8], start: usize, quote: u8) -> Option<usize> {
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            c if c == quote => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}

/// Returns the index of the closing backtick of a nested template.
pub(crate) fn skip_template(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'`' => return Some(i),
            b'$' if bytes.get(i + 1) == Some(&b'{') => i = find_expression_end(bytes, i + 2)?,
            _ => {}
        }
        i += 1;
    }
    None
}

/// Renders `text` as a JavaScript string literal delimited by `quote`.
///
/// Backslash, the delimiter, `\n`, `\r` and `\t` are escaped so a key taken from
/// raw source text always produces a valid literal.
pub fn quote_js_string(text: &str, quote: char) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push(quote);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// The other JavaScript quote character, used for literals nested in attribute values.
pub fn opposite_quote(quote: char) -> char {
    if quote == '"' { '\'' } else { '"' }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::core::text::*;

    #[test]
    fn test_is_convertible() {
        assert!(is_convertible("你好"));
        assert!(is_convertible("保存 Draft"));
        assert!(is_convertible("  标题  "));
        assert!(is_convertible("第\n二行"));

        assert!(!is_convertible(""));
        assert!(!is_convertible("     "));
        assert!(!is_convertible("12345"));
        assert!(!is_convertible("Hello"));
        assert!(!is_convertible("：:"));
        // Hiragana is outside the ideograph block.
        assert!(!is_convertible("こんにちは"));
    }

    #[test]
    fn test_normalize_keeps_inner_and_control_whitespace() {
        assert_eq!(normalize("  标题  "), "标题");
        assert_eq!(normalize("\n标题\t"), "\n标题\t");
        assert_eq!(normalize(" 第一 行 "), "第一 行");
    }

    #[test]
    fn test_detect_trailing_punctuation() {
        let full = detect_trailing_punctuation("用户名：");
        assert_eq!(full.body, "用户名");
        assert_eq!(full.mark, Some('：'));
        assert!(full.is_present());

        let ascii = detect_trailing_punctuation("用户名:");
        assert_eq!(ascii.body, "用户名");
        assert_eq!(ascii.mark, Some(':'));

        let none = detect_trailing_punctuation("用户名");
        assert_eq!(none.body, "用户名");
        assert_eq!(none.mark, None);

        // Only one trailing mark is removed.
        let double = detect_trailing_punctuation("比例::");
        assert_eq!(double.body, "比例:");
    }

    #[test]
    fn test_lookup_form_trims_around_mark() {
        let form = lookup_form(" 标题 ： ");
        assert_eq!(form.body, "标题");
        assert_eq!(form.mark, Some('：'));
    }

    #[test]
    fn test_extract_interpolation() {
        let result = extract_interpolation("当前用户：${username}");
        assert_eq!(result.body, "当前用户：{param1}");
        assert_eq!(result.stripped, "当前用户：");
        assert_eq!(result.params, vec![Param::new(0, "username")]);
        assert!(result.contains_convertible_text);
    }

    #[test]
    fn test_extract_interpolation_numbers_params_in_order() {
        let result = extract_interpolation("共${ total }条，第${page.index + 1}页");
        assert_eq!(result.body, "共{param1}条，第{param2}页");
        assert_eq!(result.params[0].source, "total");
        assert_eq!(result.params[1].name, "param2");
        assert_eq!(result.params[1].source, "page.index + 1");
    }

    #[test]
    fn test_extract_interpolation_nested_braces_and_strings() {
        let result = extract_interpolation("结果${fmt({ a: \"}\" })}完成");
        assert_eq!(result.params.len(), 1);
        assert_eq!(result.params[0].source, "fmt({ a: \"}\" })");
        assert_eq!(result.stripped, "结果完成");

        let nested = extract_interpolation("外${`内${x}`}层");
        assert_eq!(nested.params[0].source, "`内${x}`");
        assert_eq!(nested.stripped, "外层");
    }

    #[test]
    fn test_extract_interpolation_ascii_body_is_not_convertible() {
        let result = extract_interpolation("id-${value}");
        assert!(!result.contains_convertible_text);

        let punctuation_only = extract_interpolation("${a}：${b}");
        assert!(!punctuation_only.contains_convertible_text);
    }

    #[test]
    fn test_extract_interpolation_unterminated_and_escaped() {
        let result = extract_interpolation("价格\\${x}元");
        assert!(result.params.is_empty());
        assert_eq!(result.body, "价格\\${x}元");

        let open = extract_interpolation("开始${oops");
        assert!(open.params.is_empty());
        assert_eq!(open.body, "开始${oops");
    }

    #[test]
    fn test_quote_js_string() {
        assert_eq!(quote_js_string("user.name", '\''), "'user.name'");
        assert_eq!(quote_js_string("it's", '\''), "'it\\'s'");
        assert_eq!(quote_js_string("say \"hi\"", '"'), "\"say \\\"hi\\\"\"");
        assert_eq!(quote_js_string("第一行\n第二行\t", '\''), "'第一行\\n第二行\\t'");
        assert_eq!(quote_js_string("a\\b", '\''), "'a\\\\b'");
    }

    #[test]
    fn test_opposite_quote() {
        assert_eq!(opposite_quote('"'), '\'');
        assert_eq!(opposite_quote('\''), '"');
    }
}
