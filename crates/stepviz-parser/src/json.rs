//! `serde_json` decoding with diagnostics.

use serde::de::DeserializeOwned;
use serde_json::error::Category;

use crate::{
    error::{Diagnostic, ErrorCode},
    span::Span,
};

/// Decodes `source` into `T`, turning a decoding failure into a located
/// [`Diagnostic`].
pub(crate) fn decode<T: DeserializeOwned>(source: &str, what: &str) -> Result<T, Diagnostic> {
    serde_json::from_str(source).map_err(|err| to_diagnostic(source, what, &err))
}

fn to_diagnostic(source: &str, what: &str, err: &serde_json::Error) -> Diagnostic {
    let offset = Span::offset_of(source, err.line(), err.column());
    let span = Span::at(source, offset);
    let detail = strip_position(err);

    match err.classify() {
        Category::Eof => Diagnostic::error(format!("unexpected end of {what}"))
            .with_code(ErrorCode::E002)
            .with_label(span, detail)
            .with_help("check for a missing closing bracket or quote"),
        Category::Syntax | Category::Io => Diagnostic::error(format!("invalid JSON in {what}"))
            .with_code(ErrorCode::E001)
            .with_label(span, detail),
        Category::Data => Diagnostic::error(format!("invalid {what}"))
            .with_code(ErrorCode::E100)
            .with_label(span, detail),
    }
}

/// `serde_json` appends " at line L column C", the span already carries it.
fn strip_position(err: &serde_json::Error) -> String {
    let message = err.to_string();
    match message.rfind(" at line ") {
        Some(index) => message[..index].to_string(),
        None => message,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_decode_syntax_error() {
        let source = "{\n  \"a\": ?\n}";
        let diag = decode::<HashMap<String, i32>>(source, "test input").unwrap_err();

        assert_eq!(diag.code(), Some(ErrorCode::E001));
        // Points into the offending line
        let span = diag.labels()[0].span();
        let line = 2..source.rfind('\n').unwrap();
        assert!(line.contains(&span.start()));
        assert!(!diag.labels()[0].message().contains("at line"));
    }

    #[test]
    fn test_decode_eof_error() {
        let diag = decode::<HashMap<String, i32>>("{\"a\": 1", "test input").unwrap_err();
        assert_eq!(diag.code(), Some(ErrorCode::E002));
        assert!(diag.help().is_some());
    }

    #[test]
    fn test_decode_data_error() {
        let diag = decode::<HashMap<String, i32>>("{\"a\": \"x\"}", "test input").unwrap_err();
        assert_eq!(diag.code(), Some(ErrorCode::E100));
        assert_eq!(diag.message(), "invalid test input");
    }
}
