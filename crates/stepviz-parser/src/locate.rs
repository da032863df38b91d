//! Finds source spans for values of an already decoded document.
//!
//! `serde_json` only reports positions for decoding failures. Structural
//! checks run on decoded values, so their spans are recovered by searching
//! the source text for the relevant JSON keys.

use crate::span::Span;

/// Spans of every object key `"key"`, in source order.
pub(crate) fn key_spans(source: &str, key: &str) -> Vec<Span> {
    let quoted = format!("\"{key}\"");
    source
        .match_indices(&quoted)
        .filter(|(index, _)| next_non_whitespace(source, index + quoted.len()) == Some(':'))
        .map(|(index, _)| Span::new(index..index + quoted.len()))
        .collect()
}

/// Spans of every string value `"value"` stored under `"key"`, in source order.
pub(crate) fn value_spans(source: &str, key: &str, value: &str) -> Vec<Span> {
    let quoted_value = format!("\"{value}\"");
    key_spans(source, key)
        .into_iter()
        .filter_map(|key_span| {
            let after_key = &source[key_span.end()..];
            let colon = after_key.find(':')?;
            let rest = &after_key[colon + 1..];
            let value_start = rest.len() - rest.trim_start().len();
            rest[value_start..].starts_with(&quoted_value).then(|| {
                let start = key_span.end() + colon + 1 + value_start;
                Span::new(start..start + quoted_value.len())
            })
        })
        .collect()
}

/// First key span, or an empty span at the start of the source.
pub(crate) fn first_key_span(source: &str, key: &str) -> Span {
    key_spans(source, key).into_iter().next().unwrap_or_default()
}

fn next_non_whitespace(source: &str, from: usize) -> Option<char> {
    source[from..].chars().find(|c| !c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"{
  "StartAt": "A",
  "States": {
    "A": { "Type": "Pass", "Next": "B" },
    "B": { "Type": "Succeed" }
  }
}"#;

    #[test]
    fn test_key_spans_skip_values() {
        // "B" appears as a value before it appears as a key
        let spans = key_spans(SOURCE, "B");
        assert_eq!(spans.len(), 1);
        assert_eq!(&SOURCE[spans[0].start()..spans[0].end()], "\"B\"");
        assert_eq!(next_non_whitespace(SOURCE, spans[0].end()), Some(':'));
    }

    #[test]
    fn test_value_spans() {
        let spans = value_spans(SOURCE, "Next", "B");
        assert_eq!(spans.len(), 1);
        assert_eq!(&SOURCE[spans[0].start()..spans[0].end()], "\"B\"");
        assert!(value_spans(SOURCE, "Next", "Z").is_empty());
    }

    #[test]
    fn test_first_key_span_missing() {
        assert!(first_key_span(SOURCE, "Nope").is_empty());
    }
}
