//! Lexical analyzer for grammar source text.
//!
//! The lexer converts source text into a stream of [`Token`]s for parsing.
//! String and regular-expression literals are kept as raw lexemes; decoding
//! their escapes is left to whoever needs the decoded value.
//!
//! The public entry point is [`tokenize`], which keeps going after an error
//! and reports every bad token in one pass.

use winnow::{
    Parser as _,
    combinator::{alt, cut_err, not, opt, peek, preceded, repeat, terminated},
    error::{ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{literal, none_of, one_of, take_while},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
    tokens::{PositionedToken, Token},
};

/// Rich diagnostic information for lexer errors.
///
/// Attached to winnow errors via `.context()`; the error span covers from
/// `start` to the position where lexing failed.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexerDiagnostic {
    code: ErrorCode,
    message: &'static str,
    help: Option<&'static str>,
    start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError<LexerDiagnostic>>;

/// Body of a quoted literal: escapes (backslash + any char) or any char
/// other than the closing quote. Only `multiline` bodies may span lines.
fn quoted_body<'a>(quote: char, multiline: bool, input: &mut Input<'a>) -> IResult<()> {
    let line_break = move |c: char| c == '\n' && !multiline;
    repeat(
        0..,
        alt((
            ('\\', none_of(line_break)).void(),
            none_of(move |c: char| c == quote || c == '\\' || line_break(c)).void(),
        )),
    )
    .parse_next(input)
}

/// Parse a string literal: `"..."` with an optional `i` flag.
fn string_literal<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let start = input.current_token_start();

    (
        '"',
        cut_err(terminated(|i: &mut Input<'a>| quoted_body('"', false, i), '"')).context(
            LexerDiagnostic {
                code: ErrorCode::E001,
                message: "unterminated string literal",
                help: Some("add closing `\"` before the end of the line"),
                start,
            },
        ),
        opt('i'),
    )
        .take()
        .map(Token::String)
        .parse_next(input)
}

/// Parse a regular expression literal: `/.../` followed by flags.
///
/// A `/` directly followed by another `/` starts a comment instead.
fn regexp_literal<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let start = input.current_token_start();

    (
        terminated('/', peek(not('/'))),
        cut_err(terminated(|i: &mut Input<'a>| quoted_body('/', true, i), '/')).context(
            LexerDiagnostic {
                code: ErrorCode::E003,
                message: "unterminated regular expression",
                help: Some("add closing `/`; a literal `/` inside the pattern is written `\\/`"),
                start,
            },
        ),
        take_while(0.., ['i', 'm', 's', 'l', 'u', 'x']),
    )
        .take()
        .map(Token::Regexp)
        .parse_next(input)
}

/// Parse a comment running to the end of the line: `// ...` or `# ...`
fn comment<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    (alt(("//", "#")), take_while(0.., |c| c != '\n'))
        .take()
        .map(Token::Comment)
        .parse_next(input)
}

/// Parse `%` directives with word boundary checking
fn directive<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    preceded(
        '%',
        terminated(
            alt((
                literal("ignore").value(Token::Ignore),
                literal("import").value(Token::Import),
                literal("override").value(Token::Override),
                literal("extend").value(Token::Extend),
                literal("declare").value(Token::Declare),
            )),
            peek(not(one_of(|c: char| c.is_ascii_alphanumeric() || c == '_'))),
        ),
    )
    .parse_next(input)
}

/// Parse a rule name: `!?[_?]?[a-z][_a-z0-9]*`
fn rule_name<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    (
        opt('!'),
        opt(one_of(['_', '?'])),
        one_of(|c: char| c.is_ascii_lowercase()),
        take_while(0.., |c: char| {
            c == '_' || c.is_ascii_lowercase() || c.is_ascii_digit()
        }),
    )
        .take()
        .map(Token::Rule)
        .parse_next(input)
}

/// Parse a token name: `_?[A-Z][_A-Z0-9]*`
fn token_name<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    (
        opt('_'),
        one_of(|c: char| c.is_ascii_uppercase()),
        take_while(0.., |c: char| {
            c == '_' || c.is_ascii_uppercase() || c.is_ascii_digit()
        }),
    )
        .take()
        .map(Token::Token)
        .parse_next(input)
}

fn number<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    take_while(1.., |c: char| c.is_ascii_digit())
        .map(Token::Number)
        .parse_next(input)
}

/// Parse a repetition operator. `?` directly followed by a lowercase letter
/// belongs to a rule name (`?expr`), so it is not an operator there.
fn operator<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        '+',
        '*',
        terminated('?', peek(not(one_of(|c: char| c.is_ascii_lowercase())))),
    ))
    .map(Token::Op)
    .parse_next(input)
}

/// Parse multi-character punctuation (longest first)
fn multi_char_token<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        literal("->").value(Token::Arrow),
        literal("..").value(Token::DotDot),
    ))
    .parse_next(input)
}

fn single_char_token<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        '.'.value(Token::Dot),
        '~'.value(Token::Tilde),
        ':'.value(Token::Colon),
        '|'.value(Token::Pipe),
        '('.value(Token::LeftParen),
        ')'.value(Token::RightParen),
        '['.value(Token::LeftBracket),
        ']'.value(Token::RightBracket),
        '{'.value(Token::LeftBrace),
        '}'.value(Token::RightBrace),
        ','.value(Token::Comma),
    ))
    .parse_next(input)
}

fn newline<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt(("\r\n", "\n")).value(Token::Newline).parse_next(input)
}

/// Parse whitespace (spaces, tabs, etc. but not newlines)
fn whitespace<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    take_while(1.., |c: char| c.is_whitespace() && c != '\n')
        .value(Token::Whitespace)
        .parse_next(input)
}

/// Parse a single token with position tracking
fn positioned_token<'a>(input: &mut Input<'a>) -> IResult<PositionedToken<'a>> {
    let start_pos = input.current_token_start();

    let token = alt((
        comment,           // Must come before regexp (`//`)
        string_literal,    // Must come before any single char
        regexp_literal,    // Must come before single chars
        directive,         // `%` prefixed keywords
        multi_char_token,  // Must come before `.`
        rule_name,         // Must come before operator (`?expr`)
        token_name,        // Uppercase names
        number,            // Repeat counts and priorities
        operator,          // + * ?
        single_char_token, // Punctuation
        newline,           // Must come before whitespace
        whitespace,        // General whitespace
    ))
    .parse_next(input)?;

    let end_pos = input.current_token_start();

    Ok(PositionedToken::new(token, Span::new(start_pos..end_pos)))
}

/// Lexer that accumulates tokens and diagnostics during tokenization.
struct Lexer<'a> {
    tokens: Vec<PositionedToken<'a>>,
    diagnostics: DiagnosticCollector,
}

impl<'a> Lexer<'a> {
    fn new() -> Self {
        Self {
            tokens: Vec::new(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    /// Tokenize the input, collecting tokens and errors.
    fn tokenize(&mut self, mut input: Input<'a>) {
        while !input.is_empty() {
            match positioned_token(&mut input) {
                Ok(token) => self.tokens.push(token),
                Err(err) => {
                    let error_pos = input.current_token_start();
                    self.diagnostics.emit(Self::convert_err_mode(err, error_pos));

                    // Skip past the offending character; a literal that ran to
                    // the end of the line resumes on the newline.
                    if !input.is_empty() {
                        input.next_token();
                    }
                }
            }
        }
    }

    fn finish(self) -> Result<Vec<PositionedToken<'a>>, ParseError> {
        self.diagnostics.finish().map(|()| self.tokens)
    }

    /// Convert an ErrMode and error position to a Diagnostic.
    ///
    /// Falls back to E002 (unexpected character) when the error carries no
    /// [`LexerDiagnostic`] context.
    fn convert_err_mode(err: ErrMode<ContextError<LexerDiagnostic>>, error_pos: usize) -> Diagnostic {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };

        if let Some(LexerDiagnostic {
            code,
            message,
            help,
            start,
        }) = context_error.context().next()
        {
            let span = Span::new(*start..error_pos);
            let mut diag = Diagnostic::error(*message)
                .with_code(*code)
                .with_label(span, code.description());
            if let Some(h) = help {
                diag = diag.with_help(*h);
            }
            return diag;
        }

        let span = Span::new(error_pos..error_pos.saturating_add(1));
        Diagnostic::error("unexpected character")
            .with_code(ErrorCode::E002)
            .with_label(span, ErrorCode::E002.description())
    }
}

/// Tokenize grammar source, collecting every lexical error.
///
/// # Returns
///
/// - `Ok(tokens)` - All tokens successfully lexed, trivia included
/// - `Err(ParseError)` - One or more errors occurred; contains all diagnostics
pub fn tokenize(input: &str) -> Result<Vec<PositionedToken<'_>>, ParseError> {
    let mut lexer = Lexer::new();
    lexer.tokenize(LocatingSlice::new(input));
    lexer.finish()
}
