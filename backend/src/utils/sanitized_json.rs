// src/utils/sanitized_json.rs

use axum::{
    Json,
    extract::{FromRef, FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    error::AppError,
    sanitize::{InputValue, Mode, Sanitizer},
};

/// Marks which top-level request fields carry rich text.
///
/// Those fields are sanitized in markup mode; every other field is escaped
/// as plain text.
pub trait RichText {
    const RICH_TEXT_FIELDS: &'static [&'static str] = &[];
}

/// JSON body extractor that sanitizes every field before deserializing.
///
/// Use in place of `Json<T>` for any payload that will be stored or echoed.
/// Rejects malformed JSON, over-nested bodies and strings over the
/// sanitizer's size cap with 400.
#[derive(Debug, Clone)]
pub struct SanitizedJson<T>(pub T);

impl<T, S> FromRequest<S> for SanitizedJson<T>
where
    T: DeserializeOwned + RichText,
    S: Send + Sync,
    Sanitizer: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(raw) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        let sanitizer = Sanitizer::from_ref(state);
        let cleaned = sanitize_body::<T>(&sanitizer, raw)?;

        let value = serde_json::from_value(cleaned)?;
        Ok(SanitizedJson(value))
    }
}

/// Runs the field-aware sanitization used by [`SanitizedJson`].
pub fn sanitize_body<T: RichText>(sanitizer: &Sanitizer, raw: Value) -> Result<Value, AppError> {
    let cleaned = sanitizer.sanitize_fields(InputValue::from(raw), |key| {
        Mode::from_html_flag(T::RICH_TEXT_FIELDS.iter().any(|field| *field == key))
    })?;
    Ok(cleaned.into_json().unwrap_or(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize::MarkupEngine;
    use serde_json::json;

    struct Comment;

    impl RichText for Comment {
        const RICH_TEXT_FIELDS: &'static [&'static str] = &["content"];
    }

    struct PlainOnly;

    impl RichText for PlainOnly {}

    #[test]
    fn rich_field_keeps_markup_others_escape() {
        let sanitizer = Sanitizer::new(MarkupEngine::Allowlist, 8);
        let out = sanitize_body::<Comment>(
            &sanitizer,
            json!({"author": "<b>x</b>", "content": "<b>x</b><script>y</script>"}),
        )
        .unwrap();
        assert_eq!(
            out,
            json!({"author": "&lt;b&gt;x&lt;&#x2F;b&gt;", "content": "<b>x</b>"})
        );
    }

    #[test]
    fn default_trait_escapes_everything() {
        let out = sanitize_body::<PlainOnly>(&Sanitizer::default(), json!({"content": "<p>"}))
            .unwrap();
        assert_eq!(out, json!({"content": "&lt;p&gt;"}));
    }

    #[test]
    fn over_nested_body_is_bad_request() {
        let sanitizer = Sanitizer::new(MarkupEngine::Blocklist, 1);
        let err = sanitize_body::<PlainOnly>(&sanitizer, json!({"a": {"b": 1}})).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn oversized_field_is_bad_request() {
        let sanitizer = Sanitizer::default().with_max_text_bytes(4);
        let err = sanitize_body::<Comment>(&sanitizer, json!({"content": "<scr<script>ipt>"}))
            .unwrap_err();
        match err {
            AppError::BadRequest(msg) => assert_eq!(msg, "text value too long (max 4 bytes)"),
            other => panic!("expected bad request, got {:?}", other),
        }
    }
}
