//! Messages attached to source spans.

use crate::span::Span;

/// A labelled span. Primary labels mark where the problem is, secondary
/// labels add context such as "first defined here".
#[derive(Debug, Clone)]
pub struct Label {
    span: Span,
    message: String,
    is_primary: bool,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: false,
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    pub fn is_secondary(&self) -> bool {
        !self.is_primary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_and_secondary_label() {
        let primary = Label::primary(Span::new(10..20), "duplicate id");
        assert!(primary.is_primary());
        assert_eq!(primary.span().start(), 10);
        assert_eq!(primary.message(), "duplicate id");

        let secondary = Label::secondary(Span::new(1..4), "first used here");
        assert!(secondary.is_secondary());
        assert_eq!(secondary.span().len(), 3);
    }
}
