//! Rewriting of a grammar AST into railroad diagrams.
//!
//! Every node is rewritten after its children, and each top-level item
//! yields at most one [`NamedDiagram`]. Items that produce no diagram
//! (`%ignore`, unresolved imports) return `None`; constructs that cannot be
//! drawn abort the whole transform with a [`TransformError`].

use log::{debug, trace};

use trestle_core::diagram::{Diagram, DiagramKind, Element, Start};
use trestle_parser::{
    Span, Spanned,
    ast::{Definition, Grammar, Item, LiteralKind, Name, NameKind, Node, Params},
};

use crate::{
    error::TransformError,
    href::{HrefStrategy, HrefTarget},
    imports::{ImportResolver, import_diagram},
    quantifier,
};

/// One rule or token and its diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedDiagram {
    name: String,
    diagram: Diagram,
}

impl NamedDiagram {
    pub fn new(name: impl Into<String>, diagram: Diagram) -> Self {
        Self {
            name: name.into(),
            diagram,
        }
    }

    /// The rule or token name as written, including `?` and `!` markers.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn into_parts(self) -> (String, Diagram) {
        (self.name, self.diagram)
    }
}

/// Grammar-to-diagram rewriter.
///
/// # Examples
///
/// ```
/// # use trestle::{href::NoLinks, imports::SuppressImports, transform::Transformer};
/// # use trestle_parser::GrammarParser;
/// let grammar = GrammarParser::new().parse("start: \"a\" \"b\"?").unwrap();
/// let diagrams = Transformer::new(&NoLinks, &SuppressImports)
///     .transform(&grammar)
///     .unwrap();
/// assert_eq!(diagrams[0].name(), "start");
/// ```
pub struct Transformer<'a> {
    href: &'a dyn HrefStrategy,
    imports: &'a dyn ImportResolver,
    css: Option<&'a str>,
}

impl<'a> Transformer<'a> {
    pub fn new(href: &'a dyn HrefStrategy, imports: &'a dyn ImportResolver) -> Self {
        Self {
            href,
            imports,
            css: None,
        }
    }

    /// Embed `css` in every produced diagram.
    pub fn with_css(mut self, css: &'a str) -> Self {
        self.css = Some(css);
        self
    }

    /// Transform every item of `grammar`, keeping source order.
    ///
    /// # Errors
    ///
    /// Returns the first [`TransformError`] met; nothing is produced then.
    pub fn transform(&self, grammar: &Grammar) -> Result<Vec<NamedDiagram>, TransformError> {
        let mut diagrams = Vec::new();
        for item in &grammar.items {
            if let Some(diagram) = self.item(item)? {
                diagrams.push(diagram);
            }
        }
        debug!(
            items = grammar.items.len(),
            diagrams = diagrams.len();
            "Grammar transformed"
        );
        Ok(diagrams)
    }

    fn item(&self, item: &Spanned<Item>) -> Result<Option<NamedDiagram>, TransformError> {
        match item.inner() {
            Item::Rule(definition) => self.definition(DiagramKind::Complex, definition).map(Some),
            Item::Token(definition) => self.definition(DiagramKind::Simple, definition).map(Some),
            Item::Ignore(_) => {
                trace!(span:? = item.span(); "Skipping %ignore");
                Ok(None)
            }
            Item::Import(import) => Ok(import_diagram(import, self.imports, self.css)),
            Item::MultiImport(..) | Item::Override(_) | Item::Declare(_) => Err(
                TransformError::unsupported(item.construct(), item.span()),
            ),
        }
    }

    fn definition(&self, kind: DiagramKind, definition: &Definition) -> Result<NamedDiagram, TransformError> {
        Self::params(&definition.name, &definition.params)?;
        let body = self.node(&definition.body)?;

        let name = definition.name.inner().value.as_str();
        trace!(name = name, kind:% = kind; "Definition transformed");

        let mut diagram = Diagram::new(Start::new(kind, name), body);
        if let Some(css) = self.css {
            diagram = diagram.with_css(css);
        }
        Ok(NamedDiagram::new(name, diagram))
    }

    /// Template parameters cannot be drawn. An empty list contributes nothing.
    fn params(name: &Spanned<Name>, params: &Spanned<Params>) -> Result<(), TransformError> {
        if params.names.is_empty() {
            return Ok(());
        }
        let construct = match name.kind {
            NameKind::Rule => "rule template",
            NameKind::Token => "token template",
        };
        Err(TransformError::unsupported(construct, params.span()))
    }

    fn node(&self, node: &Spanned<Node>) -> Result<Element, TransformError> {
        let span = node.span();
        match node.inner() {
            Node::Name(name) => self.name(name, span),
            Node::Literal(literal) => {
                let target = match literal.kind {
                    LiteralKind::String => HrefTarget::String(&literal.lexeme),
                    LiteralKind::Regexp => HrefTarget::Regexp(&literal.lexeme),
                };
                let href = self.href_for(target, &literal.lexeme, span)?;
                Ok(Element::terminal(literal.lexeme.as_str(), href))
            }
            Node::LiteralRange(start, end) => {
                let target = HrefTarget::LiteralRange(&start.lexeme, &end.lexeme);
                let href = self.href_for(target, &start.lexeme, span)?;
                Ok(Element::terminal(format!("{start}..{end}"), href))
            }
            Node::Expansion(children) => Ok(Element::sequence(self.nodes(children)?)),
            Node::Expansions(children) => Ok(Element::choice(0, self.nodes(children)?)),
            Node::Maybe(inner) => Ok(Element::optional(self.node(inner)?)),
            Node::Alias(base, alias) => Ok(Element::group(self.node(base)?, alias.inner().value.as_str())),
            Node::Expr(base, repeat) => {
                let base = self.node(base)?;
                quantifier::resolve(base, repeat.inner(), repeat.span())
            }
            Node::TemplateUsage(..) => Err(TransformError::unsupported(node.construct(), span)),
        }
    }

    fn nodes(&self, nodes: &[Spanned<Node>]) -> Result<Vec<Element>, TransformError> {
        nodes.iter().map(|node| self.node(node)).collect()
    }

    fn name(&self, name: &Name, span: Span) -> Result<Element, TransformError> {
        let value = name.value.as_str();
        match name.kind {
            NameKind::Rule => {
                let href = self.href_for(HrefTarget::Rule(value), value, span)?;
                Ok(Element::non_terminal(value, href))
            }
            NameKind::Token => {
                let href = self.href_for(HrefTarget::Token(value), value, span)?;
                Ok(Element::terminal(value, href))
            }
        }
    }

    fn href_for(
        &self,
        target: HrefTarget<'_>,
        source_text: &str,
        span: Span,
    ) -> Result<Option<String>, TransformError> {
        self.href
            .href(target)
            .map_err(|cause| TransformError::MalformedLiteral {
                source_text: source_text.to_string(),
                cause,
                span,
            })
    }
}

#[cfg(test)]
mod tests {
    use trestle_parser::GrammarParser;

    use super::*;
    use crate::{
        href::{CrossLinks, NoLinks},
        imports::{ImportSource, SuppressImports},
    };

    fn transform_with(source: &str, href: &dyn HrefStrategy) -> Result<Vec<NamedDiagram>, TransformError> {
        let grammar = GrammarParser::new().parse(source).expect("grammar should parse");
        Transformer::new(href, &SuppressImports).transform(&grammar)
    }

    fn transform(source: &str) -> Result<Vec<NamedDiagram>, TransformError> {
        transform_with(source, &NoLinks)
    }

    fn body(source: &str) -> Element {
        let diagrams = transform(source).expect("transform should succeed");
        diagrams[0].diagram().body().clone()
    }

    fn t(text: &str) -> Element {
        Element::terminal(text, None)
    }

    fn nt(text: &str) -> Element {
        Element::non_terminal(text, None)
    }

    #[test]
    fn test_sequence_with_optional() {
        let diagrams = transform(r#"start: "a" "b"?"#).unwrap();
        assert_eq!(diagrams.len(), 1);
        assert_eq!(diagrams[0].name(), "start");
        assert_eq!(diagrams[0].diagram().kind(), DiagramKind::Complex);
        assert_eq!(
            diagrams[0].diagram().body(),
            &Element::sequence(vec![t("\"a\""), Element::optional(t("\"b\""))])
        );
    }

    #[test]
    fn test_plus_has_no_comment() {
        assert_eq!(
            body(r#"foo: "x"+"#),
            Element::one_or_more(t("\"x\""), None)
        );
    }

    #[test]
    fn test_token_is_simple() {
        let diagrams = transform("NUMBER: /[0-9]+/").unwrap();
        assert_eq!(diagrams[0].diagram().kind(), DiagramKind::Simple);
        assert_eq!(diagrams[0].diagram().start().label(), Some("NUMBER"));
        assert_eq!(diagrams[0].diagram().body(), &t("/[0-9]+/"));
    }

    #[test]
    fn test_names_and_alternatives() {
        assert_eq!(
            body("value: item | NUMBER | [sign] item"),
            Element::choice(
                0,
                vec![
                    nt("item"),
                    t("NUMBER"),
                    Element::sequence(vec![Element::optional(nt("sign")), nt("item")]),
                ]
            )
        );
    }

    #[test]
    fn test_alias_becomes_group() {
        assert_eq!(
            body(r#"sum: expr "+" expr -> add | expr"#),
            Element::choice(
                0,
                vec![
                    Element::group(Element::sequence(vec![nt("expr"), t("\"+\""), nt("expr")]), "add"),
                    nt("expr"),
                ]
            )
        );
    }

    #[test]
    fn test_literal_range() {
        assert_eq!(body(r#"LETTER: "a".."z""#), t("\"a\"..\"z\""));
    }

    #[test]
    fn test_bounded_repeats() {
        assert_eq!(
            body(r#"digits: DIGIT ~ 3"#),
            Element::one_or_more(t("DIGIT"), Some("3 times".to_string()))
        );
        assert_eq!(
            body(r#"digits: DIGIT ~ 0..4"#),
            Element::zero_or_more(t("DIGIT"), Some("0..4".to_string()))
        );
        assert_eq!(
            body(r#"digits: DIGIT ~ 0..1"#),
            Element::optional(t("DIGIT"))
        );
    }

    #[test]
    fn test_empty_rule_body() {
        assert_eq!(body("empty:"), Element::sequence(vec![]));
    }

    #[test]
    fn test_source_order_and_suppression() {
        let source = r#"
            %import common.WS
            start: a b
            %ignore WS
            a: "a"
            B: "b"
        "#;
        let names: Vec<_> = transform(source)
            .unwrap()
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        assert_eq!(names, ["start", "a", "B"]);
    }

    #[test]
    fn test_resolved_import_contributes_diagram() {
        let grammar = GrammarParser::new()
            .parse("%import common.WS\nstart: WS")
            .unwrap();
        let lookup = |_: &trestle_parser::ast::ImportPath| Some(ImportSource::new("common.lark", None));
        let diagrams = Transformer::new(&NoLinks, &lookup).transform(&grammar).unwrap();

        let names: Vec<_> = diagrams.iter().map(NamedDiagram::name).collect();
        assert_eq!(names, ["WS", "start"]);
    }

    #[test]
    fn test_templates_are_rejected() {
        let err = transform("list{item}: item (\",\" item)*").unwrap_err();
        assert!(matches!(err, TransformError::UnsupportedConstruct { ref construct, .. } if construct == "rule template"));

        let err = transform("_SEP{X}: X").unwrap_err();
        assert!(matches!(err, TransformError::UnsupportedConstruct { ref construct, .. } if construct == "token template"));

        let err = transform("start: list{NUMBER}").unwrap_err();
        assert!(matches!(err, TransformError::UnsupportedConstruct { ref construct, .. } if construct == "template usage"));
    }

    #[test]
    fn test_unsupported_statements() {
        for source in ["%declare FOO", "%import common (WS, NUMBER)", "%override start: \"x\""] {
            let err = transform(source).unwrap_err();
            assert!(matches!(err, TransformError::UnsupportedConstruct { .. }), "{source}");
        }
    }

    #[test]
    fn test_cross_links() {
        let diagrams = transform_with("start: expr NUMBER \"x\"", &CrossLinks::new()).unwrap();
        let mut hrefs = Vec::new();
        diagrams[0].diagram().body().walk(&mut |element| {
            if let Some(label) = element.label() {
                hrefs.push(label.href().map(str::to_string));
            }
        });
        assert_eq!(
            hrefs,
            [Some("#expr".to_string()), Some("#NUMBER".to_string()), None]
        );
    }

    #[test]
    fn test_no_links_leaves_every_leaf_unlinked() {
        let diagrams = transform(r#"start: expr NUMBER "x" /y/ "a".."b""#).unwrap();
        diagrams[0].diagram().body().walk(&mut |element| {
            if let Some(label) = element.label() {
                assert_eq!(label.href(), None);
            }
        });
    }

    #[test]
    fn test_malformed_regexp_aborts() {
        let links = CrossLinks::new().with_regex_links(|_: &str, _: &str| Some("#".to_string()));
        let err = transform_with(r"start: /\u12/", &links).unwrap_err();
        assert!(matches!(
            err,
            TransformError::MalformedLiteral { ref source_text, .. } if source_text == r"/\u12/"
        ));
    }

    #[test]
    fn test_css_is_embedded() {
        let grammar = GrammarParser::new().parse("start: \"a\"").unwrap();
        let diagrams = Transformer::new(&NoLinks, &SuppressImports)
            .with_css("svg {}")
            .transform(&grammar)
            .unwrap();
        assert_eq!(diagrams[0].diagram().css(), Some("svg {}"));
    }
}
