//! Assembly of rendered diagrams into one HTML page.
//!
//! ```text
//! Grammar source
//!     ↓ parse
//! AST
//!     ↓ transform
//! Named diagrams
//!     ↓ render + assemble (this module)
//! HTML document
//! ```
//!
//! Each diagram is placed in a `<div>` whose id is the rule or token name
//! without its leading `?`/`!` markers, so `#name` links land on it.

use log::debug;

use crate::transform::NamedDiagram;

/// Title file name used when none is given.
pub const DEFAULT_FILE_NAME: &str = "<string>";

const SEPARATOR: &str = "<br>";

/// Builder for the HTML page holding every diagram of a grammar.
#[derive(Debug, Clone)]
pub struct HtmlDocument<'a> {
    file_name: &'a str,
    style: &'a str,
}

impl<'a> HtmlDocument<'a> {
    /// A page with `style` as its global style sheet.
    pub fn new(style: &'a str) -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME,
            style,
        }
    }

    /// Set the file name shown in the page title.
    pub fn with_file_name(mut self, file_name: &'a str) -> Self {
        self.file_name = file_name;
        self
    }

    /// Render every diagram and assemble the page, keeping diagram order.
    pub fn render(&self, diagrams: Vec<NamedDiagram>) -> String {
        let count = diagrams.len();
        let sections: Vec<String> = diagrams
            .into_iter()
            .map(|named| {
                let (name, diagram) = named.into_parts();
                section(anchor_id(&name), &diagram.render())
            })
            .collect();
        debug!(diagrams = count; "Diagrams rendered to SVG");

        let mut page = String::new();
        page.push_str("<!doctype html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"utf-8\">\n\n");
        page.push_str(&format!(
            "  <title>Grammar railroad diagram for '{}'</title>\n\n",
            escape_html(self.file_name)
        ));
        page.push_str(&format!("  <style type='text/css'>\n  {}\n  </style>\n", self.style));
        page.push_str("</head>\n\n<body>\n  ");
        page.push_str(&sections.join(SEPARATOR));
        page.push_str("\n</body>\n</html>");
        page
    }
}

/// The element id of a diagram: its name without leading `?`/`!` markers.
pub fn anchor_id(name: &str) -> &str {
    name.trim_start_matches(['?', '!'])
}

fn section(id: &str, svg: &str) -> String {
    format!("\n  <div id='{id}'>\n{}\n  </div>\n", indent(svg, "    "))
}

/// Prefix every line that is not blank with `prefix`.
fn indent(text: &str, prefix: &str) -> String {
    text.split_inclusive('\n')
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect()
}

/// Escape text for use in HTML content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use trestle_core::diagram::{Diagram, DiagramKind, Element, Start};

    use super::*;

    fn named(name: &str) -> NamedDiagram {
        NamedDiagram::new(
            name,
            Diagram::new(Start::new(DiagramKind::Complex, name), Element::terminal("\"a\"", None)),
        )
    }

    #[test]
    fn test_anchor_id_strips_markers() {
        assert_eq!(anchor_id("?expr"), "expr");
        assert_eq!(anchor_id("!keyword"), "keyword");
        assert_eq!(anchor_id("!?both"), "both");
        assert_eq!(anchor_id("_hidden"), "_hidden");
    }

    #[test]
    fn test_indent_skips_blank_lines() {
        assert_eq!(indent("a\n\n  b\n", "  "), "  a\n\n    b\n");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn test_default_title() {
        let page = HtmlDocument::new("svg {}").render(vec![]);
        assert!(page.starts_with(concat!(
            "<!doctype html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"utf-8\">\n\n",
            "  <title>Grammar railroad diagram for '&lt;string&gt;'</title>\n\n",
            "  <style type='text/css'>\n  svg {}\n  </style>\n",
            "</head>\n\n<body>\n  ",
        )));
        assert!(page.ends_with("</body>\n</html>"));
    }

    #[test]
    fn test_sections_in_order() {
        let page = HtmlDocument::new("")
            .with_file_name("calc.lark")
            .render(vec![named("?start"), named("expr")]);

        assert!(page.contains("<title>Grammar railroad diagram for 'calc.lark'</title>"));
        let start = page.find("<div id='start'>").unwrap();
        let expr = page.find("<div id='expr'>").unwrap();
        assert!(start < expr);
        assert_eq!(page.matches("<svg").count(), 2);
        assert_eq!(page.matches(SEPARATOR).count(), 1);
    }
}
