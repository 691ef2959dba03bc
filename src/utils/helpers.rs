//! Helper utility functions

/// Quote text as a CSS string literal (for `content:` declarations).
pub fn css_string_literal(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\A "),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Quote text as a JavaScript string literal.
///
/// JSON strings are valid JS literals; `<` is additionally escaped so an
/// embedded `</script>` cannot terminate an inline script element.
pub fn js_string_literal(text: &str) -> String {
    serde_json::to_string(text)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace('<', "\\u003c")
}
