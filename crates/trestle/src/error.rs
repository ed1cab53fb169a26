//! Error types for Trestle operations.
//!
//! [`TrestleError`] is returned by the [`RailroadBuilder`](crate::RailroadBuilder)
//! pipeline. Its `Parse` and `Transform` variants keep the grammar source so
//! that callers can render the failing span.

use std::io;

use thiserror::Error;

use trestle_parser::{ParseError, Span};

/// The main error type for Trestle operations.
#[derive(Debug, Error)]
pub enum TrestleError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("{err}")]
    Transform { err: TransformError, src: String },
}

impl TrestleError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }

    /// Create a new `Transform` error with the associated source code.
    pub fn new_transform_error(err: TransformError, src: impl Into<String>) -> Self {
        Self::Transform {
            err,
            src: src.into(),
        }
    }
}

/// A grammar construct that cannot be drawn.
///
/// Any of these aborts the whole transform; no partial output is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("{construct} is not supported")]
    UnsupportedConstruct { construct: String, span: Span },

    #[error("malformed literal {source_text}: {cause}")]
    MalformedLiteral {
        source_text: String,
        #[source]
        cause: LiteralError,
        span: Span,
    },

    #[error("unsupported repeat operator `{operator}`")]
    UnknownOperator { operator: String, span: Span },
}

impl TransformError {
    pub(crate) fn unsupported(construct: impl Into<String>, span: Span) -> Self {
        Self::UnsupportedConstruct {
            construct: construct.into(),
            span,
        }
    }

    /// The source span of the offending construct.
    pub fn span(&self) -> Span {
        match self {
            Self::UnsupportedConstruct { span, .. }
            | Self::MalformedLiteral { span, .. }
            | Self::UnknownOperator { span, .. } => *span,
        }
    }
}

/// Why a quoted literal could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiteralError {
    #[error("no closing `{quote}` found")]
    MissingClosingQuote { quote: char },

    #[error("literal opens with `{found}` but closes with `{expected}`")]
    MismatchedQuote { expected: char, found: char },

    #[error("literal ended unexpectedly after a backslash")]
    DanglingBackslash,

    #[error("invalid escape sequence `{escape}`")]
    InvalidEscape { escape: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_error_display() {
        let err = TransformError::unsupported("rule template", Span::new(0..4));
        assert_eq!(err.to_string(), "rule template is not supported");
        assert_eq!(err.span(), Span::new(0..4));

        let err = TransformError::MalformedLiteral {
            source_text: "/abc\\/".to_string(),
            cause: LiteralError::DanglingBackslash,
            span: Span::new(3..9),
        };
        assert_eq!(
            err.to_string(),
            "malformed literal /abc\\/: literal ended unexpectedly after a backslash"
        );
        assert_eq!(err.span(), Span::new(3..9));
    }

    #[test]
    fn test_trestle_error_keeps_source() {
        let err = TrestleError::new_transform_error(
            TransformError::UnknownOperator {
                operator: "!".to_string(),
                span: Span::new(1..2),
            },
            "a!",
        );
        assert_eq!(err.to_string(), "unsupported repeat operator `!`");
        assert!(matches!(err, TrestleError::Transform { src, .. } if src == "a!"));
    }
}
