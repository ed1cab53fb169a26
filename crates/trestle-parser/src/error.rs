//! Diagnostics produced while lexing and parsing a grammar.
//!
//! The error system is built around [`Diagnostic`]: a message with an
//! optional [`ErrorCode`], labelled source spans and help text.
//! Every diagnostic raised by one [`parse`](crate::GrammarParser::parse) call
//! is returned together inside a [`ParseError`].
//!
//! # Example
//!
//! ```
//! # use trestle_parser::error::{Diagnostic, ErrorCode};
//! # use trestle_parser::Span;
//! let diag = Diagnostic::error("unterminated string literal")
//!     .with_code(ErrorCode::E001)
//!     .with_label(Span::new(6..11), "string starts here")
//!     .with_help("add closing `\"`");
//! assert_eq!(diag.to_string(), "error[E001]: unterminated string literal");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
