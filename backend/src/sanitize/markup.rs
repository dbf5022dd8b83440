// src/sanitize/markup.rs

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use ammonia::Builder;
use regex::Regex;
use serde_json::Value;

/// Which markup-tolerant pass to run on rich-text strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkupEngine {
    /// Ordered pattern removal. Keeps unknown markup, strips known-bad tokens.
    #[default]
    Blocklist,
    /// `ammonia` parser with an allowlist of tags, attributes and URL schemes.
    Allowlist,
}

impl MarkupEngine {
    pub fn clean(self, input: &str) -> String {
        match self {
            MarkupEngine::Blocklist => sanitize_markup(input),
            MarkupEngine::Allowlist => clean_html(input),
        }
    }
}

impl FromStr for MarkupEngine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blocklist" => Ok(MarkupEngine::Blocklist),
            "allowlist" => Ok(MarkupEngine::Allowlist),
            other => Err(format!(
                "unknown markup engine '{}' (expected 'allowlist' or 'blocklist')",
                other
            )),
        }
    }
}

impl fmt::Display for MarkupEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkupEngine::Blocklist => f.write_str("blocklist"),
            MarkupEngine::Allowlist => f.write_str("allowlist"),
        }
    }
}

/// Removal patterns, applied in order. Script elements go first so their
/// bodies are dropped together with the tags.
static BLOCKLIST: LazyLock<[Regex; 5]> = LazyLock::new(|| {
    [
        // <script ...> body </script>
        Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("script element regex"),
        // stray or unterminated script tags
        Regex::new(r"(?i)</?script[^>]*>?").expect("script tag regex"),
        // onclick="..." / onclick='...' / onerror=x
        Regex::new(r#"(?i)on\w+\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]*)"#)
            .expect("event handler regex"),
        Regex::new(r"(?i)javascript:").expect("javascript scheme regex"),
        Regex::new(r"(?i)data:text/html").expect("data url regex"),
    ]
});

/// Leftover tokens that a bounded number of removal passes can still leave
/// behind when the input splices them across removed text. Each is rewritten
/// into an inert form rather than removed, so the rewrite cannot splice a new
/// match together.
static NEUTRALIZE: LazyLock<[(Regex, &'static str); 4]> = LazyLock::new(|| {
    [
        (Regex::new(r"(?i)<(/?script)").expect("script opener regex"), "&lt;$1"),
        (Regex::new(r"(?i)(on\w+\s*)=").expect("handler opener regex"), "$1&#61;"),
        (Regex::new(r"(?i)javascript:").expect("javascript scheme regex"), "blocked:"),
        (Regex::new(r"(?i)data:text/html").expect("data url regex"), "blocked:"),
    ]
});

/// Full removal passes before leftovers are neutralized instead.
const REMOVAL_PASSES: usize = 2;

static ALLOWLIST: LazyLock<Builder<'static>> = LazyLock::new(|| {
    let mut builder = Builder::default();
    builder
        .url_schemes(HashSet::from(["http", "https", "mailto"]))
        .link_rel(Some("noopener noreferrer"));
    builder
});

/// Strips script elements, inline event handlers, `javascript:` and
/// `data:text/html` tokens from a markup string. Other tags pass through.
///
/// This is a blocklist, not a parser. It will not catch every obfuscation
/// (entity-encoded payloads, mutation XSS, exotic schemes). Use
/// [`MarkupEngine::Allowlist`] where the output is rendered as HTML.
///
/// Removal runs at most `REMOVAL_PASSES` times. Anything a removal spliced
/// together after that is escaped in one last pass (`<script` becomes
/// `&lt;script`, `onerror=` becomes `onerror&#61;`, dangerous schemes become
/// `blocked:`), so the work stays linear in the input length.
pub fn sanitize_markup(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let mut current = input.to_owned();
    for _ in 0..REMOVAL_PASSES {
        let next = blocklist_pass(&current);
        if next == current {
            break;
        }
        current = next;
    }
    let current = neutralize(current);

    if current.len() != input.len() {
        tracing::debug!(
            input_bytes = input.len(),
            output_bytes = current.len(),
            "markup blocklist rewrote content"
        );
    }
    current
}

fn blocklist_pass(input: &str) -> String {
    let mut out = input.to_owned();
    for pattern in BLOCKLIST.iter() {
        if pattern.is_match(&out) {
            out = pattern.replace_all(&out, "").into_owned();
        }
    }
    out
}

fn neutralize(mut out: String) -> String {
    for (pattern, replacement) in NEUTRALIZE.iter() {
        if pattern.is_match(&out) {
            out = pattern.replace_all(&out, *replacement).into_owned();
        }
    }
    out
}

/// Cleans HTML with the `ammonia` allowlist.
///
/// Safe tags such as `<b>` and `<p>` survive; `<script>`/`<style>` are removed
/// along with their content, `on*` attributes are dropped and links only keep
/// `http`, `https` and `mailto` URLs.
pub fn clean_html(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }
    ALLOWLIST.clean(input).to_string()
}

/// Fail-safe variant of [`sanitize_markup`] for dynamically typed input.
/// Anything that is not a non-empty JSON string becomes `""`.
pub fn sanitize_markup_json(input: &Value) -> String {
    match input {
        Value::String(s) if !s.is_empty() => sanitize_markup(s),
        _ => String::new(),
    }
}
