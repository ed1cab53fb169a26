//! Railroad diagram vocabulary.
//!
//! An [`Element`] tree describes the body of a diagram; a [`Diagram`] binds a
//! body to its [`Start`] marker, its [`DiagramKind`] and an optional style
//! sheet. Rendering lives in [`crate::render`].
//!
//! ```
//! # use trestle_core::diagram::{Diagram, DiagramKind, Element, Start};
//! let body = Element::sequence(vec![
//!     Element::terminal("\"a\"", None),
//!     Element::optional(Element::terminal("\"b\"", None)),
//! ]);
//! let diagram = Diagram::new(Start::new(DiagramKind::Complex, "start"), body);
//! assert_eq!(diagram.kind(), DiagramKind::Complex);
//! ```

use std::fmt;

/// Text shown inside a terminal or non-terminal box, with an optional link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    text: String,
    href: Option<String>,
}

impl Label {
    pub fn new(text: impl Into<String>, href: Option<String>) -> Self {
        Self {
            text: text.into(),
            href,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }
}

/// A drawable railroad element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    /// Rounded box: a literal or token
    Terminal(Label),
    /// Square box: a reference to a rule
    NonTerminal(Label),
    /// Elements drawn one after another
    Sequence(Vec<Element>),
    /// Branches stacked vertically. `default` is drawn on the main track.
    Choice { default: usize, items: Vec<Element> },
    /// An element that may be skipped
    Optional(Box<Element>),
    /// An element repeated any number of times, possibly none.
    /// `comment` annotates the loop back track.
    ZeroOrMore {
        item: Box<Element>,
        comment: Option<String>,
    },
    /// An element repeated at least once
    OneOrMore {
        item: Box<Element>,
        comment: Option<String>,
    },
    /// A dashed frame around an element with a caption
    Group { item: Box<Element>, label: String },
    /// Free-standing italic text on the track
    Comment(String),
}

impl Element {
    pub fn terminal(text: impl Into<String>, href: Option<String>) -> Self {
        Element::Terminal(Label::new(text, href))
    }

    pub fn non_terminal(text: impl Into<String>, href: Option<String>) -> Self {
        Element::NonTerminal(Label::new(text, href))
    }

    pub fn sequence(items: Vec<Element>) -> Self {
        Element::Sequence(items)
    }

    /// Create a choice. A `default` past the last item is clamped to it.
    pub fn choice(default: usize, items: Vec<Element>) -> Self {
        let default = default.min(items.len().saturating_sub(1));
        Element::Choice { default, items }
    }

    pub fn optional(item: Element) -> Self {
        Element::Optional(Box::new(item))
    }

    pub fn zero_or_more(item: Element, comment: Option<String>) -> Self {
        Element::ZeroOrMore {
            item: Box::new(item),
            comment,
        }
    }

    pub fn one_or_more(item: Element, comment: Option<String>) -> Self {
        Element::OneOrMore {
            item: Box::new(item),
            comment,
        }
    }

    pub fn group(item: Element, label: impl Into<String>) -> Self {
        Element::Group {
            item: Box::new(item),
            label: label.into(),
        }
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Element::Comment(text.into())
    }

    /// The label of a terminal or non-terminal.
    pub fn label(&self) -> Option<&Label> {
        match self {
            Element::Terminal(label) | Element::NonTerminal(label) => Some(label),
            _ => None,
        }
    }

    /// Visit every element of the tree, parents before children.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Element)) {
        visit(self);
        match self {
            Element::Sequence(items) | Element::Choice { items, .. } => {
                for item in items {
                    item.walk(visit);
                }
            }
            Element::Optional(item)
            | Element::ZeroOrMore { item, .. }
            | Element::OneOrMore { item, .. }
            | Element::Group { item, .. } => item.walk(visit),
            Element::Terminal(_) | Element::NonTerminal(_) | Element::Comment(_) => {}
        }
    }
}

/// Styling class of a diagram: tokens are simple, rules are complex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DiagramKind {
    #[default]
    Simple,
    Complex,
}

impl DiagramKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagramKind::Simple => "simple",
            DiagramKind::Complex => "complex",
        }
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The entry marker of a diagram, captioned with the definition name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Start {
    kind: DiagramKind,
    label: Option<String>,
}

impl Start {
    pub fn new(kind: DiagramKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: Some(label.into()),
        }
    }

    /// A start marker without a caption
    pub fn unlabeled(kind: DiagramKind) -> Self {
        Self { kind, label: None }
    }

    pub fn kind(&self) -> DiagramKind {
        self.kind
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// A complete diagram: start marker, body and end marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagram {
    start: Start,
    body: Element,
    css: Option<String>,
}

impl Diagram {
    /// Create a diagram. Its kind is the kind of its start marker.
    pub fn new(start: Start, body: Element) -> Self {
        Self {
            start,
            body,
            css: None,
        }
    }

    /// Embed a style sheet in the rendered SVG.
    pub fn with_css(mut self, css: impl Into<String>) -> Self {
        self.css = Some(css.into());
        self
    }

    pub fn start(&self) -> &Start {
        &self.start
    }

    pub fn body(&self) -> &Element {
        &self.body
    }

    pub fn kind(&self) -> DiagramKind {
        self.start.kind
    }

    pub fn css(&self) -> Option<&str> {
        self.css.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_default_is_clamped() {
        let choice = Element::choice(5, vec![Element::comment("a"), Element::comment("b")]);
        assert!(matches!(choice, Element::Choice { default: 1, .. }));

        let empty = Element::choice(3, vec![]);
        assert!(matches!(empty, Element::Choice { default: 0, .. }));
    }

    #[test]
    fn test_walk_visits_every_leaf() {
        let tree = Element::choice(
            0,
            vec![
                Element::terminal("\"x\"", None),
                Element::group(
                    Element::one_or_more(Element::non_terminal("item", Some("#item".into())), None),
                    "items",
                ),
            ],
        );

        let mut labels = Vec::new();
        tree.walk(&mut |element| {
            if let Some(label) = element.label() {
                labels.push(label.text().to_string());
            }
        });
        assert_eq!(labels, ["\"x\"", "item"]);
    }

    #[test]
    fn test_diagram_kind_follows_start() {
        let diagram = Diagram::new(Start::new(DiagramKind::Simple, "NUMBER"), Element::sequence(vec![]))
            .with_css("svg {}");
        assert_eq!(diagram.kind(), DiagramKind::Simple);
        assert_eq!(diagram.start().label(), Some("NUMBER"));
        assert_eq!(diagram.css(), Some("svg {}"));
        assert_eq!(DiagramKind::Complex.to_string(), "complex");
    }
}
