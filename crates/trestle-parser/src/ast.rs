//! Abstract syntax tree of a grammar definition.
//!
//! The tree is a closed set of variants: every construct the parser accepts
//! has exactly one representation here, and consumers match on it
//! exhaustively. Single-element sequences, alternatives and unmodified
//! expressions are inlined by the parser, so an [`Node::Expansion`] always has
//! zero or at least two children and an [`Node::Expansions`] at least two.

use std::fmt;

use crate::span::Spanned;

/// A parsed grammar file: its items in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grammar {
    pub items: Vec<Spanned<Item>>,
}

/// A top-level statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// `name: expansions`
    Rule(Definition),
    /// `NAME: expansions`
    Token(Definition),
    /// `%ignore expansions`
    Ignore(Spanned<Node>),
    /// `%import path [-> alias]`
    Import(Import),
    /// `%import path (a, b, ...)`
    MultiImport(ImportPath, Vec<Spanned<Name>>),
    /// `%override rule` / `%extend rule`
    Override(Definition),
    /// `%declare NAME ...`
    Declare(Vec<Spanned<Name>>),
}

impl Item {
    /// Short name of the construct, used in error messages.
    pub fn construct(&self) -> &'static str {
        match self {
            Item::Rule(_) => "rule",
            Item::Token(_) => "token",
            Item::Ignore(_) => "%ignore",
            Item::Import(_) => "%import",
            Item::MultiImport(..) => "multi-name %import",
            Item::Override(_) => "%override",
            Item::Declare(_) => "%declare",
        }
    }
}

/// Body of a rule or token definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    pub name: Spanned<Name>,
    pub params: Spanned<Params>,
    pub priority: Option<Spanned<String>>,
    pub body: Spanned<Node>,
}

/// Template parameter list of a definition (`rule{a, b}: ...`).
///
/// Present on every definition; `names` is empty when the definition has no
/// parameter list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    pub names: Vec<Spanned<Name>>,
}

/// The two identifier kinds of the grammar dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameKind {
    Rule,
    Token,
}

impl NameKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NameKind::Rule => "RULE",
            NameKind::Token => "TOKEN",
        }
    }
}

/// A rule or token identifier, as written (including `?`, `!`, `_` prefixes).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    pub kind: NameKind,
    pub value: String,
}

impl Name {
    pub fn rule(value: impl Into<String>) -> Self {
        Self {
            kind: NameKind::Rule,
            value: value.into(),
        }
    }

    pub fn token(value: impl Into<String>) -> Self {
        Self {
            kind: NameKind::Token,
            value: value.into(),
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    String,
    Regexp,
}

impl LiteralKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LiteralKind::String => "STRING",
            LiteralKind::Regexp => "REGEXP",
        }
    }

    /// The character that opens and closes a literal of this kind.
    pub fn quote(self) -> char {
        match self {
            LiteralKind::String => '"',
            LiteralKind::Regexp => '/',
        }
    }
}

/// A quoted literal with its full source lexeme, e.g. `"if"i` or `/\d+/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub lexeme: String,
}

impl Literal {
    pub fn string(lexeme: impl Into<String>) -> Self {
        Self {
            kind: LiteralKind::String,
            lexeme: lexeme.into(),
        }
    }

    pub fn regexp(lexeme: impl Into<String>) -> Self {
        Self {
            kind: LiteralKind::Regexp,
            lexeme: lexeme.into(),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lexeme)
    }
}

/// An expression inside a definition body.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Name(Name),
    Literal(Literal),
    /// `"a".."z"`
    LiteralRange(Literal, Literal),
    /// Ordered sequence: `a b c`
    Expansion(Vec<Spanned<Node>>),
    /// Alternatives: `a | b | c`
    Expansions(Vec<Spanned<Node>>),
    /// `[ expansions ]`
    Maybe(Box<Spanned<Node>>),
    /// `expansion -> alias`
    Alias(Box<Spanned<Node>>, Spanned<Name>),
    /// `atom op`, `atom ~ n` or `atom ~ n..m`
    Expr(Box<Spanned<Node>>, Spanned<Repeat>),
    /// `name{arg, ...}`
    TemplateUsage(Spanned<Name>, Vec<Spanned<Node>>),
}

impl Node {
    /// Short name of the construct, used in error messages.
    pub fn construct(&self) -> &'static str {
        match self {
            Node::Name(_) => "name",
            Node::Literal(_) => "literal",
            Node::LiteralRange(..) => "literal range",
            Node::Expansion(_) => "expansion",
            Node::Expansions(_) => "alternatives",
            Node::Maybe(_) => "optional group",
            Node::Alias(..) => "alias",
            Node::Expr(..) => "repetition",
            Node::TemplateUsage(..) => "template usage",
        }
    }
}

/// Repetition descriptor of an [`Node::Expr`].
///
/// Counts and bounds keep their source text; the diagram annotations show
/// them as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Repeat {
    /// `+`, `*` or `?`
    Op(char),
    /// `~ n`
    Count(String),
    /// `~ min..max`
    Range { min: String, max: String },
}

/// `%import path [-> alias]`
#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub path: ImportPath,
    pub alias: Option<Spanned<Name>>,
}

impl Import {
    /// The name the import is bound to: the alias if given, otherwise the
    /// last path segment.
    pub fn exported_name(&self) -> Option<&Spanned<Name>> {
        self.alias.as_ref().or_else(|| self.path.segments.last())
    }
}

/// Dotted module path of an import, e.g. `common.WS` or `.lexer.NAME`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportPath {
    /// `true` for paths starting with `.` (relative to the importing file).
    pub relative: bool,
    pub segments: Vec<Spanned<Name>>,
}

impl ImportPath {
    /// The segments before the imported name, joined with `.`, including the
    /// leading `.` of relative paths. `common.WS` gives `common`.
    pub fn module(&self) -> String {
        let count = self.segments.len().saturating_sub(1);
        let joined = self.segments[..count]
            .iter()
            .map(|s| s.value.as_str())
            .collect::<Vec<_>>()
            .join(".");
        if self.relative {
            format!(".{joined}")
        } else {
            joined
        }
    }

    /// The imported name: the last segment.
    pub fn target(&self) -> Option<&Name> {
        self.segments.last().map(|s| s.inner())
    }
}

impl fmt::Display for ImportPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.relative {
            f.write_str(".")?;
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(&segment.value)?;
        }
        Ok(())
    }
}
