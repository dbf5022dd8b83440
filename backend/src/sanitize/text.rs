// src/sanitize/text.rs

use serde_json::Value;

/// Escapes the six markup-significant characters for plain-text rendering.
///
/// | char | escaped   |
/// |------|-----------|
/// | `&`  | `&amp;`   |
/// | `<`  | `&lt;`    |
/// | `>`  | `&gt;`    |
/// | `"`  | `&quot;`  |
/// | `'`  | `&#x27;`  |
/// | `/`  | `&#x2F;`  |
///
/// Not idempotent: escaping an escaped string escapes the `&` again.
/// Sanitize exactly once per storage boundary.
pub fn sanitize_text(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#x27;"),
            '/' => output.push_str("&#x2F;"),
            _ => output.push(c),
        }
    }
    output
}

/// Fail-safe variant for dynamically typed input.
///
/// Anything that is not a non-empty JSON string becomes `""`.
pub fn sanitize_text_json(input: &Value) -> String {
    match input {
        Value::String(s) if !s.is_empty() => sanitize_text(s),
        _ => String::new(),
    }
}
