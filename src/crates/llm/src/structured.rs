//! Structured output: coerce a free-text completion into a typed value.
//!
//! Models asked for "ONLY JSON" still wrap their answer in markdown fences
//! or a sentence of preamble often enough that strict `from_str` on the raw
//! completion would fail on healthy responses. [`parse_structured`] extracts
//! the outermost JSON object before deserializing; anything that still does
//! not parse is an [`LlmError::Parse`] for the caller to handle.

use serde::de::DeserializeOwned;

use crate::client::Generator;
use crate::error::{LlmError, Result};

/// Generate at temperature 0 and parse the completion into `T`.
///
/// # Errors
///
/// Propagates transport errors from the generator and returns
/// [`LlmError::Parse`] when the completion is not valid JSON for `T`.
pub async fn generate_structured<T: DeserializeOwned>(
    generator: &dyn Generator,
    prompt: &str,
) -> Result<T> {
    let raw = generator.generate(prompt, 0.0).await?;
    parse_structured(&raw)
}

/// Parse a completion into `T`, tolerating fences and surrounding prose.
pub fn parse_structured<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let json = extract_json(raw)
        .ok_or_else(|| LlmError::Parse(format!("no JSON object in completion: {}", preview(raw))))?;
    serde_json::from_str(json).map_err(|e| LlmError::Parse(e.to_string()))
}

/// Slice out the outermost `{ … }` of the completion, if any.
fn extract_json(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

fn preview(raw: &str) -> String {
    let trimmed = raw.trim();
    let cut = trimmed
        .char_indices()
        .nth(80)
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    trimmed[..cut].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Verdict {
        ok: bool,
        reason: String,
    }

    #[test]
    fn parses_bare_json() {
        let verdict: Verdict = parse_structured(r#"{"ok": true, "reason": "fine"}"#).unwrap();
        assert!(verdict.ok);
        assert_eq!(verdict.reason, "fine");
    }

    #[test]
    fn parses_fenced_json() {
        let raw = "Here you go:\n```json\n{\"ok\": false, \"reason\": \"nope\"}\n```\nHope that helps!";
        let verdict: Verdict = parse_structured(raw).unwrap();
        assert!(!verdict.ok);
    }

    #[test]
    fn rejects_prose_without_json() {
        let err = parse_structured::<Verdict>("I cannot answer that.").unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
    }

    #[test]
    fn rejects_json_with_wrong_shape() {
        let err = parse_structured::<Verdict>(r#"{"ok": "maybe"}"#).unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
    }
}
