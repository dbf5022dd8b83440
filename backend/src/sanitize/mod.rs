// src/sanitize/mod.rs

//! Input sanitization.
//!
//! Pure functions that neutralize markup injection in untrusted strings and
//! nested values before they are stored or echoed back. Nothing here does I/O
//! or keeps state, so every function is safe to call from concurrent handlers.

pub mod markup;
pub mod text;
pub mod value;

use std::fmt;

pub use markup::{MarkupEngine, clean_html, sanitize_markup, sanitize_markup_json};
pub use text::{sanitize_text, sanitize_text_json};
pub use value::InputValue;

/// Default limit on container nesting for [`sanitize_value`].
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// How strings inside a value are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Escape every markup-significant character.
    #[default]
    Text,
    /// Remove dangerous constructs, keep benign markup.
    Markup,
}

impl Mode {
    /// Maps the boolean `htmlMode` flag used by callers.
    pub fn from_html_flag(html_mode: bool) -> Self {
        if html_mode { Mode::Markup } else { Mode::Text }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SanitizeError {
    /// Containers nested deeper than the configured maximum.
    TooDeeplyNested { max_depth: usize },
    /// A string leaf longer than the configured maximum, in bytes.
    TextTooLong { max_bytes: usize },
}

impl fmt::Display for SanitizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SanitizeError::TooDeeplyNested { max_depth } => {
                write!(f, "input too deeply nested (max depth {})", max_depth)
            }
            SanitizeError::TextTooLong { max_bytes } => {
                write!(f, "text value too long (max {} bytes)", max_bytes)
            }
        }
    }
}

impl std::error::Error for SanitizeError {}

/// Sanitizer settings: the markup engine used in [`Mode::Markup`], the
/// nesting limit for the recursive walk and an optional cap on string size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sanitizer {
    pub engine: MarkupEngine,
    pub max_depth: usize,
    /// Strings longer than this are rejected before any pattern runs.
    pub max_text_bytes: Option<usize>,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self {
            engine: MarkupEngine::Blocklist,
            max_depth: DEFAULT_MAX_DEPTH,
            max_text_bytes: None,
        }
    }
}

impl Sanitizer {
    pub fn new(engine: MarkupEngine, max_depth: usize) -> Self {
        Self {
            engine,
            max_depth,
            max_text_bytes: None,
        }
    }

    pub fn with_max_text_bytes(mut self, max_bytes: usize) -> Self {
        self.max_text_bytes = Some(max_bytes);
        self
    }

    /// Sanitizes a single string in the given mode.
    pub fn sanitize_str(&self, input: &str, mode: Mode) -> String {
        match mode {
            Mode::Text => sanitize_text(input),
            Mode::Markup => self.engine.clean(input),
        }
    }

    /// Walks `input` and sanitizes every string leaf.
    ///
    /// Shape is preserved: sequences keep length and order, mappings keep
    /// their key set, and keys themselves are not rewritten. `Absent`, `Null`
    /// and non-text scalars come back unchanged.
    ///
    /// A scalar at the top level is depth 0 and each container adds one.
    /// Anything nested past `max_depth` is rejected, as is any string over
    /// `max_text_bytes` when a cap is set.
    pub fn sanitize_value(&self, input: InputValue, mode: Mode) -> Result<InputValue, SanitizeError> {
        self.walk(input, mode, 0)
    }

    /// Like [`Sanitizer::sanitize_value`], but a top-level mapping picks the
    /// mode per member through `mode_for(key)`. Any other top-level shape is
    /// sanitized in text mode.
    pub fn sanitize_fields<F>(&self, input: InputValue, mode_for: F) -> Result<InputValue, SanitizeError>
    where
        F: Fn(&str) -> Mode,
    {
        match input {
            InputValue::Mapping(entries) => {
                let depth = self.descend(0)?;
                entries
                    .into_iter()
                    .map(|(key, val)| {
                        let mode = mode_for(&key);
                        self.walk(val, mode, depth).map(|v| (key, v))
                    })
                    .collect::<Result<_, _>>()
                    .map(InputValue::Mapping)
            }
            other => self.walk(other, Mode::Text, 0),
        }
    }

    fn walk(&self, input: InputValue, mode: Mode, depth: usize) -> Result<InputValue, SanitizeError> {
        match input {
            InputValue::Text(s) => {
                if let Some(max_bytes) = self.max_text_bytes.filter(|max| s.len() > *max) {
                    return Err(SanitizeError::TextTooLong { max_bytes });
                }
                Ok(InputValue::Text(self.sanitize_str(&s, mode)))
            }
            InputValue::Sequence(items) => {
                let depth = self.descend(depth)?;
                items
                    .into_iter()
                    .map(|item| self.walk(item, mode, depth))
                    .collect::<Result<Vec<_>, _>>()
                    .map(InputValue::Sequence)
            }
            InputValue::Mapping(entries) => {
                let depth = self.descend(depth)?;
                entries
                    .into_iter()
                    .map(|(key, val)| self.walk(val, mode, depth).map(|v| (key, v)))
                    .collect::<Result<_, _>>()
                    .map(InputValue::Mapping)
            }
            other @ (InputValue::Absent
            | InputValue::Null
            | InputValue::Bool(_)
            | InputValue::Number(_)) => Ok(other),
        }
    }

    fn descend(&self, depth: usize) -> Result<usize, SanitizeError> {
        let next = depth + 1;
        if next > self.max_depth {
            return Err(SanitizeError::TooDeeplyNested {
                max_depth: self.max_depth,
            });
        }
        Ok(next)
    }

    /// Convenience over JSON: converts, sanitizes and converts back.
    pub fn sanitize_json(
        &self,
        input: serde_json::Value,
        mode: Mode,
    ) -> Result<serde_json::Value, SanitizeError> {
        let cleaned = self.sanitize_value(InputValue::from(input), mode)?;
        Ok(cleaned.into_json().unwrap_or(serde_json::Value::Null))
    }
}

/// [`Sanitizer::sanitize_value`] with default settings (blocklist engine,
/// depth limit [`DEFAULT_MAX_DEPTH`]).
pub fn sanitize_value(input: InputValue, html_mode: bool) -> Result<InputValue, SanitizeError> {
    Sanitizer::default().sanitize_value(input, Mode::from_html_flag(html_mode))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nested_sequences(levels: usize) -> InputValue {
        let mut value = InputValue::Text("<".into());
        for _ in 0..levels {
            value = InputValue::Sequence(vec![value]);
        }
        value
    }

    #[test]
    fn markup_scenario_from_profile_form() {
        let input = InputValue::from(json!({
            "name": "<img src=x onerror=alert(1)>",
            "bio": "<script>evil()</script>hi"
        }));
        let out = sanitize_value(input, true).unwrap().into_json();
        assert_eq!(out, Some(json!({"name": "<img src=x >", "bio": "hi"})));
    }

    #[test]
    fn text_mode_escapes_instead_of_stripping() {
        let input = InputValue::from(json!(["a<script>x</script>", "b"]));
        let out = sanitize_value(input, false).unwrap().into_json();
        assert_eq!(
            out,
            Some(json!(["a&lt;script&gt;x&lt;&#x2F;script&gt;", "b"]))
        );
    }

    #[test]
    fn null_and_absent_pass_through() {
        assert_eq!(sanitize_value(InputValue::Null, false), Ok(InputValue::Null));
        assert_eq!(sanitize_value(InputValue::Absent, true), Ok(InputValue::Absent));
    }

    #[test]
    fn scalars_pass_through() {
        let n = InputValue::from(json!(3.5));
        assert_eq!(sanitize_value(n.clone(), false), Ok(n));
        assert_eq!(
            sanitize_value(InputValue::Bool(true), true),
            Ok(InputValue::Bool(true))
        );
    }

    #[test]
    fn keys_are_not_rewritten() {
        let input = InputValue::from(json!({"<k>": "<v>"}));
        let out = sanitize_value(input, false).unwrap().into_json();
        assert_eq!(out, Some(json!({"<k>": "&lt;v&gt;"})));
    }

    #[test]
    fn depth_limit_is_inclusive() {
        let sanitizer = Sanitizer::new(MarkupEngine::Blocklist, 3);
        assert!(sanitizer.sanitize_value(nested_sequences(3), Mode::Text).is_ok());
        assert_eq!(
            sanitizer.sanitize_value(nested_sequences(4), Mode::Text),
            Err(SanitizeError::TooDeeplyNested { max_depth: 3 })
        );
    }

    #[test]
    fn deep_adversarial_input_fails_cleanly() {
        let err = sanitize_value(nested_sequences(1_000), false).unwrap_err();
        assert_eq!(err.to_string(), "input too deeply nested (max depth 64)");
    }

    #[test]
    fn per_field_modes_on_top_level_mapping() {
        let sanitizer = Sanitizer::default();
        let input = InputValue::from(json!({
            "title": "<b>Quiz</b>",
            "body": "<b>Quiz</b><script>x()</script>",
            "tags": ["<i>"]
        }));
        let out = sanitizer
            .sanitize_fields(input, |key| Mode::from_html_flag(key == "body"))
            .unwrap()
            .into_json();
        assert_eq!(
            out,
            Some(json!({
                "title": "&lt;b&gt;Quiz&lt;&#x2F;b&gt;",
                "body": "<b>Quiz</b>",
                "tags": ["&lt;i&gt;"]
            }))
        );
    }

    #[test]
    fn per_field_depth_counts_the_outer_mapping() {
        let sanitizer = Sanitizer::new(MarkupEngine::Blocklist, 2);
        let ok = InputValue::from(json!({"a": ["x"]}));
        assert!(sanitizer.sanitize_fields(ok, |_| Mode::Text).is_ok());
        let deep = InputValue::from(json!({"a": [["x"]]}));
        assert!(sanitizer.sanitize_fields(deep, |_| Mode::Text).is_err());
    }

    #[test]
    fn allowlist_engine_applies_in_markup_mode_only() {
        let sanitizer = Sanitizer::new(MarkupEngine::Allowlist, DEFAULT_MAX_DEPTH);
        let out = sanitizer
            .sanitize_json(json!({"a": "<b onclick=\"x\">hi</b>"}), Mode::Markup)
            .unwrap();
        assert_eq!(out, json!({"a": "<b>hi</b>"}));

        let out = sanitizer
            .sanitize_json(json!({"a": "<b>hi</b>"}), Mode::Text)
            .unwrap();
        assert_eq!(out, json!({"a": "&lt;b&gt;hi&lt;&#x2F;b&gt;"}));
    }

    #[test]
    fn oversized_text_is_rejected_before_cleaning() {
        let sanitizer = Sanitizer::default().with_max_text_bytes(8);
        let ok = InputValue::from(json!({"body": "<b>1</b>"}));
        assert!(sanitizer.sanitize_fields(ok, |_| Mode::Markup).is_ok());

        let long = InputValue::from(json!({"body": ["<scr<script>ipt>"]}));
        assert_eq!(
            sanitizer.sanitize_fields(long, |_| Mode::Markup),
            Err(SanitizeError::TextTooLong { max_bytes: 8 })
        );
    }

    #[test]
    fn text_cap_is_off_by_default() {
        let long = "<".repeat(100_000);
        assert!(sanitize_value(InputValue::Text(long), false).is_ok());
    }
}
