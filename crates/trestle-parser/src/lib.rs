//! # Trestle Parser
//!
//! Parser for Lark-style grammar definitions. This crate turns grammar source
//! text into a closed, span-annotated [`ast::Grammar`].
//!
//! ## Usage
//!
//! ```
//! # use trestle_parser::{GrammarParser, ParseError, ast::Item};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"
//!         start: greeting NAME
//!         greeting: "hello" | "hi"
//!         NAME: /[a-z]+/
//!     "#;
//!
//!     let grammar = GrammarParser::new().parse(source)?;
//!     assert_eq!(grammar.items.len(), 3);
//!     assert!(matches!(grammar.items[0].inner(), Item::Rule(_)));
//!     Ok(())
//! }
//! ```

pub mod ast;
pub mod error;
mod lexer;
mod parser;
mod span;
mod tokens;

pub use error::ParseError;
pub use span::{Span, Spanned};

use log::debug;

/// Parser for grammar source text.
///
/// The parser holds no state between calls; one instance can parse any
/// number of grammars.
#[derive(Debug, Default, Clone, Copy)]
pub struct GrammarParser {
    _private: (),
}

impl GrammarParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse grammar source text into an AST.
    ///
    /// The pipeline is:
    ///
    /// 1. **Tokenize** - Convert source text to tokens
    /// 2. **Filter** - Drop whitespace and comments
    /// 3. **Parse** - Build the AST from the remaining tokens
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] holding one diagnostic per problem found.
    /// Lexical errors stop the pipeline before parsing.
    pub fn parse(&self, source: &str) -> Result<ast::Grammar, ParseError> {
        let tokens = lexer::tokenize(source)?;
        let significant: Vec<_> = tokens
            .into_iter()
            .filter(|token| !token.is_trivia())
            .collect();
        debug!(tokens = significant.len(); "Tokenized grammar source");

        parser::build_grammar(&significant)
    }
}
