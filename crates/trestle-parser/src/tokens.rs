use std::fmt;

use winnow::stream::Location;

use crate::span::Span;

/// Tokens of the grammar dialect.
///
/// Literal tokens keep their full source lexeme (quotes and flags included)
/// because the diagram labels show the literal exactly as written.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'src> {
    // Names
    Rule(&'src str),  // !?[_?]?[a-z][_a-z0-9]*
    Token(&'src str), // _?[A-Z][_A-Z0-9]*

    // Literals
    String(&'src str), // "..."i?
    Regexp(&'src str), // /.../[imslux]*
    Number(&'src str), // [+-]?[0-9]+

    // Directives
    Ignore,   // %ignore
    Import,   // %import
    Override, // %override
    Extend,   // %extend
    Declare,  // %declare

    // Operators
    Op(char), // + * ?
    Arrow,    // ->
    DotDot,   // ..
    Dot,      // .
    Tilde,    // ~
    Colon,    // :
    Pipe,     // |

    // Punctuation
    LeftParen,    // (
    RightParen,   // )
    LeftBracket,  // [
    RightBracket, // ]
    LeftBrace,    // {
    RightBrace,   // }
    Comma,        // ,

    // Trivia
    Comment(&'src str),
    Whitespace,
    Newline,
}

impl Token<'_> {
    /// Whitespace and comments carry no meaning for the parser.
    pub fn is_trivia(&self) -> bool {
        matches!(self, Token::Whitespace | Token::Comment(_))
    }
}

/// A token with position information for winnow integration
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span) -> Self {
        Self { token, span }
    }
}

impl<'src> std::ops::Deref for PositionedToken<'src> {
    type Target = Token<'src>;

    fn deref(&self) -> &Self::Target {
        &self.token
    }
}

impl fmt::Display for PositionedToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.token.fmt(f)
    }
}

impl Location for PositionedToken<'_> {
    fn previous_token_end(&self) -> usize {
        self.span.end()
    }

    fn current_token_start(&self) -> usize {
        self.span.start()
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Rule(name) | Token::Token(name) => write!(f, "{name}"),

            Token::String(lexeme) | Token::Regexp(lexeme) | Token::Number(lexeme) => {
                write!(f, "{lexeme}")
            }

            Token::Ignore => write!(f, "%ignore"),
            Token::Import => write!(f, "%import"),
            Token::Override => write!(f, "%override"),
            Token::Extend => write!(f, "%extend"),
            Token::Declare => write!(f, "%declare"),

            Token::Op(op) => write!(f, "{op}"),
            Token::Arrow => write!(f, "->"),
            Token::DotDot => write!(f, ".."),
            Token::Dot => write!(f, "."),
            Token::Tilde => write!(f, "~"),
            Token::Colon => write!(f, ":"),
            Token::Pipe => write!(f, "|"),

            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::LeftBracket => write!(f, "["),
            Token::RightBracket => write!(f, "]"),
            Token::LeftBrace => write!(f, "{{"),
            Token::RightBrace => write!(f, "}}"),
            Token::Comma => write!(f, ","),

            Token::Comment(comment) => write!(f, "{comment}"),
            Token::Whitespace => write!(f, " "),
            Token::Newline => write!(f, "\\n"),
        }
    }
}
