//! Parser for grammar source tokens.
//!
//! This module turns the significant tokens produced by the
//! [`lexer`](super::lexer) into the [`ast`](super::ast). The public entry
//! point is [`build_grammar`].
//!
//! Sequences, alternatives, aliases and repetitions that would wrap a single
//! child are inlined, so `start: "a"` produces a bare literal body rather
//! than a one-element expansion.

use winnow::{
    Parser as _,
    combinator::{alt, cut_err, eof, opt, peek, preceded, repeat, separated},
    error::{ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use log::{debug, trace};

use crate::{
    ast::{
        Definition, Grammar, Import, ImportPath, Item, Literal, LiteralKind, Name, NameKind,
        Node, Params, Repeat,
    },
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::{Span, Spanned},
    tokens::{PositionedToken, Token},
};

/// Context type for parser errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// Description of what the parser expected at the failure point
    Label(&'static str),
}

type Input<'a> = TokenSlice<'a, PositionedToken<'a>>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<Context>>>;

/// Match one token equal to `expected` and return its span.
fn punct<'a>(expected: Token<'a>) -> impl FnMut(&mut Input<'a>) -> IResult<Span> {
    move |input: &mut Input<'a>| {
        any.verify_map(|token: &PositionedToken<'a>| {
            (token.token == expected).then_some(token.span)
        })
        .parse_next(input)
    }
}

/// Zero-length span at the next token, used for empty constructs.
fn position<'a>(input: &mut Input<'a>) -> Span {
    let next: IResult<Option<&PositionedToken<'a>>> = opt(peek(any)).parse_next(input);
    match next {
        Ok(Some(token)) => Span::new(token.span.start()..token.span.start()),
        _ => Span::default(),
    }
}

fn newlines0<'a>(input: &mut Input<'a>) -> IResult<()> {
    repeat(0.., punct(Token::Newline)).parse_next(input)
}

/// Parse a rule or token name
fn name<'a>(input: &mut Input<'a>) -> IResult<Spanned<Name>> {
    any.verify_map(|token: &PositionedToken<'a>| match &token.token {
        Token::Rule(value) => Some(Spanned::new(Name::rule(*value), token.span)),
        Token::Token(value) => Some(Spanned::new(Name::token(*value), token.span)),
        _ => None,
    })
    .context(Context::Label("a rule or token name"))
    .parse_next(input)
}

/// Parse a name of one specific kind
fn name_of_kind<'a>(kind: NameKind) -> impl FnMut(&mut Input<'a>) -> IResult<Spanned<Name>> {
    move |input: &mut Input<'a>| {
        name.verify(|name: &Spanned<Name>| name.kind == kind)
            .context(Context::Label(match kind {
                NameKind::Rule => "a rule name",
                NameKind::Token => "a token name",
            }))
            .parse_next(input)
    }
}

/// Parse a string or regular expression literal
fn literal<'a>(input: &mut Input<'a>) -> IResult<Spanned<Literal>> {
    any.verify_map(|token: &PositionedToken<'a>| match &token.token {
        Token::String(lexeme) => Some(Spanned::new(Literal::string(*lexeme), token.span)),
        Token::Regexp(lexeme) => Some(Spanned::new(Literal::regexp(*lexeme), token.span)),
        _ => None,
    })
    .parse_next(input)
}

fn number<'a>(input: &mut Input<'a>) -> IResult<Spanned<String>> {
    any.verify_map(|token: &PositionedToken<'a>| match &token.token {
        Token::Number(digits) => Some(Spanned::new((*digits).to_string(), token.span)),
        _ => None,
    })
    .context(Context::Label("a number"))
    .parse_next(input)
}

fn operator<'a>(input: &mut Input<'a>) -> IResult<Spanned<char>> {
    any.verify_map(|token: &PositionedToken<'a>| match &token.token {
        Token::Op(op) => Some(Spanned::new(*op, token.span)),
        _ => None,
    })
    .parse_next(input)
}

/// Parse a literal, or a string range `"a".."z"`
fn literal_value<'a>(input: &mut Input<'a>) -> IResult<Spanned<Node>> {
    let start = literal(input)?;

    if start.kind != LiteralKind::String || opt(punct(Token::DotDot)).parse_next(input)?.is_none()
    {
        return Ok(start.map(Node::Literal));
    }

    let end = cut_err(literal.verify(|end: &Spanned<Literal>| end.kind == LiteralKind::String))
        .context(Context::Label("a string literal after `..`"))
        .parse_next(input)?;

    let span = start.span().union(end.span());
    Ok(Spanned::new(
        Node::LiteralRange(start.into_inner(), end.into_inner()),
        span,
    ))
}

/// Parse a name, or a template usage `name{arg, ...}`
fn named_value<'a>(input: &mut Input<'a>) -> IResult<Spanned<Node>> {
    let name = name(input)?;

    if opt(punct(Token::LeftBrace)).parse_next(input)?.is_none() {
        return Ok(name.map(Node::Name));
    }

    let (args, close): (Vec<Spanned<Node>>, Span) = cut_err((
        separated(1.., value, punct(Token::Comma)),
        punct(Token::RightBrace),
    ))
    .context(Context::Label("template arguments closed by `}`"))
    .parse_next(input)?;

    let span = name.span().union(close);
    Ok(Spanned::new(Node::TemplateUsage(name, args), span))
}

fn value<'a>(input: &mut Input<'a>) -> IResult<Spanned<Node>> {
    alt((literal_value, named_value))
        .context(Context::Label("a name or literal"))
        .parse_next(input)
}

/// Parse `( expansions )`. The parentheses only group; the inner node is
/// returned with the span widened to include them.
fn group<'a>(input: &mut Input<'a>) -> IResult<Spanned<Node>> {
    let open = punct(Token::LeftParen).parse_next(input)?;
    let (inner, close) = cut_err((expansions, punct(Token::RightParen)))
        .context(Context::Label("`)` to close the group"))
        .parse_next(input)?;
    Ok(Spanned::new(inner.into_inner(), open.union(close)))
}

/// Parse `[ expansions ]`
fn maybe<'a>(input: &mut Input<'a>) -> IResult<Spanned<Node>> {
    let open = punct(Token::LeftBracket).parse_next(input)?;
    let (inner, close) = cut_err((expansions, punct(Token::RightBracket)))
        .context(Context::Label("`]` to close the optional group"))
        .parse_next(input)?;
    Ok(Spanned::new(Node::Maybe(Box::new(inner)), open.union(close)))
}

fn atom<'a>(input: &mut Input<'a>) -> IResult<Spanned<Node>> {
    alt((group, maybe, value)).parse_next(input)
}

/// Parse an atom with an optional repetition suffix:
/// `atom+`, `atom*`, `atom?`, `atom ~ n` or `atom ~ n..m`
fn expr<'a>(input: &mut Input<'a>) -> IResult<Spanned<Node>> {
    let atom = atom(input)?;

    if let Some(op) = opt(operator).parse_next(input)? {
        let span = atom.span().union(op.span());
        return Ok(Spanned::new(
            Node::Expr(Box::new(atom), op.map(Repeat::Op)),
            span,
        ));
    }

    let Some(tilde) = opt(punct(Token::Tilde)).parse_next(input)? else {
        return Ok(atom);
    };

    let (count, upper) = cut_err((number, opt(preceded(punct(Token::DotDot), number))))
        .context(Context::Label("a repeat count after `~`"))
        .parse_next(input)?;

    let repeat_span = tilde.union(upper.as_ref().map_or(count.span(), |max| max.span()));
    let repeat = match upper {
        Some(max) => Repeat::Range {
            min: count.into_inner(),
            max: max.into_inner(),
        },
        None => Repeat::Count(count.into_inner()),
    };

    let span = atom.span().union(repeat_span);
    Ok(Spanned::new(
        Node::Expr(Box::new(atom), Spanned::new(repeat, repeat_span)),
        span,
    ))
}

/// Parse a sequence of expressions. May be empty.
fn expansion<'a>(input: &mut Input<'a>) -> IResult<Spanned<Node>> {
    let here = position(input);
    let mut exprs: Vec<Spanned<Node>> = repeat(0.., expr).parse_next(input)?;

    if exprs.len() == 1 {
        return Ok(exprs.remove(0));
    }

    let span = match (exprs.first(), exprs.last()) {
        (Some(first), Some(last)) => first.span().union(last.span()),
        _ => here,
    };
    Ok(Spanned::new(Node::Expansion(exprs), span))
}

/// Parse an expansion with an optional `-> alias`
fn alias<'a>(input: &mut Input<'a>) -> IResult<Spanned<Node>> {
    let base = expansion(input)?;

    if opt(punct(Token::Arrow)).parse_next(input)?.is_none() {
        return Ok(base);
    }

    let name = cut_err(name_of_kind(NameKind::Rule))
        .context(Context::Label("an alias name after `->`"))
        .parse_next(input)?;

    let span = base.span().union(name.span());
    Ok(Spanned::new(Node::Alias(Box::new(base), name), span))
}

/// Parse alternatives separated by `|`. A `|` may start a new line.
fn expansions<'a>(input: &mut Input<'a>) -> IResult<Spanned<Node>> {
    let mut alternatives = vec![alias(input)?];

    loop {
        let checkpoint = input.checkpoint();
        let separator: IResult<((), Span)> = (newlines0, punct(Token::Pipe)).parse_next(input);
        if separator.is_err() {
            input.reset(&checkpoint);
            break;
        }
        alternatives.push(cut_err(alias).parse_next(input)?);
    }

    if alternatives.len() == 1 {
        return Ok(alternatives.remove(0));
    }

    let span = match (alternatives.first(), alternatives.last()) {
        (Some(first), Some(last)) => first.span().union(last.span()),
        _ => Span::default(),
    };
    Ok(Spanned::new(Node::Expansions(alternatives), span))
}

/// Parse an optional template parameter list: `{a, b}`
fn template_params<'a>(kind: NameKind) -> impl FnMut(&mut Input<'a>) -> IResult<Spanned<Params>> {
    move |input: &mut Input<'a>| {
        let here = position(input);
        let Some(open) = opt(punct(Token::LeftBrace)).parse_next(input)? else {
            return Ok(Spanned::new(Params::default(), here));
        };

        let (names, close): (Vec<Spanned<Name>>, Span) = cut_err((
            separated(1.., name_of_kind(kind), punct(Token::Comma)),
            punct(Token::RightBrace),
        ))
        .context(Context::Label("template parameters closed by `}`"))
        .parse_next(input)?;

        Ok(Spanned::new(Params { names }, open.union(close)))
    }
}

/// Parse a priority suffix: `.2`
fn priority_suffix<'a>(input: &mut Input<'a>) -> IResult<Spanned<String>> {
    preceded(punct(Token::Dot), cut_err(number)).parse_next(input)
}

/// Parse `name{params}.priority: expansions`
fn definition<'a>(kind: NameKind) -> impl FnMut(&mut Input<'a>) -> IResult<Spanned<Definition>> {
    move |input: &mut Input<'a>| {
        let name = name_of_kind(kind).parse_next(input)?;

        let (params, priority, _, body) = cut_err((
            template_params(kind),
            opt(priority_suffix),
            punct(Token::Colon).context(Context::Label("`:` after the definition name")),
            expansions,
        ))
        .parse_next(input)?;

        let span = name.span().union(body.span());
        Ok(Spanned::new(
            Definition {
                name,
                params,
                priority,
                body,
            },
            span,
        ))
    }
}

/// Parse `%ignore expansions`
fn ignore_statement<'a>(input: &mut Input<'a>) -> IResult<Spanned<Item>> {
    let start = punct(Token::Ignore).parse_next(input)?;
    let body = cut_err(expansions).parse_next(input)?;
    let span = start.union(body.span());
    Ok(Spanned::new(Item::Ignore(body), span))
}

/// Parse a dotted import path: `.`? name (`.` name)*
fn import_path<'a>(input: &mut Input<'a>) -> IResult<Spanned<ImportPath>> {
    let dot = opt(punct(Token::Dot)).parse_next(input)?;
    let first = name(input)?;
    let rest: Vec<Spanned<Name>> = repeat(0.., preceded(punct(Token::Dot), name)).parse_next(input)?;

    let start = dot.unwrap_or(first.span());
    let end = rest.last().map_or(first.span(), |last| last.span());

    let mut segments = Vec::with_capacity(rest.len() + 1);
    segments.push(first);
    segments.extend(rest);

    Ok(Spanned::new(
        ImportPath {
            relative: dot.is_some(),
            segments,
        },
        start.union(end),
    ))
}

/// Parse `%import path`, `%import path -> alias` or `%import path (a, b)`
fn import_statement<'a>(input: &mut Input<'a>) -> IResult<Spanned<Item>> {
    let start = punct(Token::Import).parse_next(input)?;
    let path = cut_err(import_path)
        .context(Context::Label("an import path"))
        .parse_next(input)?;

    if opt(punct(Token::Arrow)).parse_next(input)?.is_some() {
        let alias = cut_err(name)
            .context(Context::Label("an alias name after `->`"))
            .parse_next(input)?;
        let span = start.union(alias.span());
        return Ok(Spanned::new(
            Item::Import(Import {
                path: path.into_inner(),
                alias: Some(alias),
            }),
            span,
        ));
    }

    if opt(punct(Token::LeftParen)).parse_next(input)?.is_some() {
        let (names, close): (Vec<Spanned<Name>>, Span) = cut_err((
            separated(1.., name, punct(Token::Comma)),
            punct(Token::RightParen),
        ))
        .context(Context::Label("a name list closed by `)`"))
        .parse_next(input)?;
        return Ok(Spanned::new(
            Item::MultiImport(path.into_inner(), names),
            start.union(close),
        ));
    }

    let span = start.union(path.span());
    Ok(Spanned::new(
        Item::Import(Import {
            path: path.into_inner(),
            alias: None,
        }),
        span,
    ))
}

/// Parse `%override definition` or `%extend definition`
fn override_statement<'a>(input: &mut Input<'a>) -> IResult<Spanned<Item>> {
    let start = alt((punct(Token::Override), punct(Token::Extend))).parse_next(input)?;
    let definition = cut_err(alt((
        definition(NameKind::Rule),
        definition(NameKind::Token),
    )))
    .context(Context::Label("a rule or token definition"))
    .parse_next(input)?;

    let span = start.union(definition.span());
    Ok(Spanned::new(Item::Override(definition.into_inner()), span))
}

/// Parse `%declare NAME ...`
fn declare_statement<'a>(input: &mut Input<'a>) -> IResult<Spanned<Item>> {
    let start = punct(Token::Declare).parse_next(input)?;
    let names: Vec<Spanned<Name>> = cut_err(repeat(1.., name))
        .context(Context::Label("names to declare"))
        .parse_next(input)?;

    let span = names.last().map_or(start, |last| start.union(last.span()));
    Ok(Spanned::new(Item::Declare(names), span))
}

fn item<'a>(input: &mut Input<'a>) -> IResult<Spanned<Item>> {
    alt((
        definition(NameKind::Rule).map(|definition| definition.map(Item::Rule)),
        definition(NameKind::Token).map(|definition| definition.map(Item::Token)),
        ignore_statement,
        import_statement,
        override_statement,
        declare_statement,
    ))
    .parse_next(input)
}

/// An item ends at a newline or at the end of the input.
fn end_of_item<'a>(input: &mut Input<'a>) -> IResult<()> {
    alt((punct(Token::Newline).void(), eof.void()))
        .context(Context::Label("the end of the line"))
        .parse_next(input)
}

/// Skip the rest of the current line so parsing can resume on the next item.
fn skip_line(input: &mut Input<'_>) {
    while let Some(token) = input.next_token() {
        if token.token == Token::Newline {
            break;
        }
    }
}

/// Turn a parser error into a diagnostic pointing at the offending token.
///
/// `fallback` describes what was expected when the error carries no context.
fn diagnostic_at<'a>(
    err: ErrMode<ContextError<Context>>,
    input: &mut Input<'a>,
    end_of_source: usize,
    fallback: &'static str,
) -> Diagnostic {
    let expected = match &err {
        ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx
            .context()
            .map(|Context::Label(label)| *label)
            .next(),
        ErrMode::Incomplete(_) => None,
    }
    .unwrap_or(fallback);

    let next: IResult<Option<&PositionedToken<'a>>> = opt(peek(any)).parse_next(input);
    match next {
        Ok(Some(token)) => Diagnostic::error(format!("unexpected token `{}`", token.token))
            .with_code(ErrorCode::E100)
            .with_label(token.span, format!("expected {expected}")),
        _ => Diagnostic::error("unexpected end of input")
            .with_code(ErrorCode::E101)
            .with_label(
                Span::new(end_of_source..end_of_source),
                format!("expected {expected}"),
            ),
    }
}

/// Build a [`Grammar`] from significant tokens (no whitespace or comments).
///
/// Parsing resumes on the next line after an error, so one call reports
/// every malformed item.
pub fn build_grammar(tokens: &[PositionedToken<'_>]) -> Result<Grammar, ParseError> {
    let end_of_source = tokens.last().map_or(0, |token| token.span.end());
    let mut input = TokenSlice::new(tokens);
    let mut diagnostics = DiagnosticCollector::new();
    let mut items = Vec::new();

    loop {
        if let Err(err) = newlines0(&mut input) {
            diagnostics.emit(diagnostic_at(err, &mut input, end_of_source, "a newline"));
        }
        if input.eof_offset() == 0 {
            break;
        }

        let checkpoint = input.checkpoint();
        let item_start = input.peek_token().map(|token| token.span);
        match item(&mut input) {
            Ok(item) => {
                trace!(construct = item.construct(); "Parsed item");
                items.push(item);
                if let Err(err) = end_of_item(&mut input) {
                    diagnostics.emit(diagnostic_at(err, &mut input, end_of_source, "the end of the line"));
                    skip_line(&mut input);
                }
            }
            Err(err) => {
                let committed = matches!(err, ErrMode::Cut(_));
                if !committed {
                    input.reset(&checkpoint);
                }
                let mut diag = diagnostic_at(err, &mut input, end_of_source, "a rule, token or `%` directive");
                if let Some(start) = item_start.filter(|_| committed) {
                    diag = diag.with_secondary_label(start, "in this item");
                }
                diagnostics.emit(diag);
                skip_line(&mut input);
            }
        }
    }

    diagnostics.finish()?;

    debug!(items = items.len(); "Grammar parsed");
    Ok(Grammar { items })
}
