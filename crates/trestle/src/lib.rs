//! Trestle - railroad diagrams for Lark grammars
//!
//! This library parses a Lark grammar, turns every rule and token into a
//! railroad diagram and assembles the diagrams into one standalone HTML page
//! in which names link to their own diagram.

pub mod config;
pub mod href;
pub mod html;
pub mod imports;
pub mod links;
pub mod quantifier;
pub mod transform;
pub mod unescape;

mod error;

pub use trestle_core::{diagram, style};
pub use trestle_parser::ast;

pub use error::{LiteralError, TransformError, TrestleError};
pub use transform::NamedDiagram;

use std::{borrow::Cow, fs};

use log::{debug, info, trace};

use trestle_core::style::DEFAULT_STYLE;
use trestle_parser::GrammarParser;

use config::AppConfig;
use html::HtmlDocument;
use imports::{ImportResolver, SuppressImports};
use transform::Transformer;

/// Builder for parsing grammars and rendering them to HTML.
///
/// # Examples
///
/// ```rust
/// use trestle::{RailroadBuilder, config::AppConfig};
///
/// let source = "start: greeting NAME\ngreeting: \"hello\" | \"hi\"\nNAME: /[a-z]+/";
///
/// let builder = RailroadBuilder::new(AppConfig::default()).with_file_name("hello.lark");
///
/// // Parse source to named diagrams
/// let diagrams = builder.parse(source).expect("Failed to parse");
/// assert_eq!(diagrams.len(), 3);
///
/// // Render the diagrams into one page
/// let html = builder.render_html(diagrams).expect("Failed to render");
/// assert!(html.contains("<div id='greeting'>"));
/// ```
pub struct RailroadBuilder {
    config: AppConfig,
    parser: GrammarParser,
    imports: Box<dyn ImportResolver>,
    file_name: Option<String>,
}

impl Default for RailroadBuilder {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl RailroadBuilder {
    /// Create a new builder with the given configuration.
    ///
    /// Imports are left out until a resolver is set with
    /// [`with_imports`](Self::with_imports).
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            parser: GrammarParser::new(),
            imports: Box::new(SuppressImports),
            file_name: None,
        }
    }

    /// Resolve `%import` statements with `resolver`.
    pub fn with_imports(mut self, resolver: impl ImportResolver + 'static) -> Self {
        self.imports = Box::new(resolver);
        self
    }

    /// Set the grammar file name shown in the page title.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Parse grammar source into named diagrams, one per rule, token and
    /// resolved import, in source order.
    ///
    /// # Errors
    ///
    /// Returns `TrestleError::Parse` for syntax errors and
    /// `TrestleError::Transform` for constructs that cannot be drawn.
    pub fn parse(&self, source: &str) -> Result<Vec<NamedDiagram>, TrestleError> {
        info!("Parsing grammar");
        let grammar = self
            .parser
            .parse(source)
            .map_err(|err| TrestleError::new_parse_error(err, source))?;
        debug!(items = grammar.items.len(); "Grammar parsed");
        trace!(grammar:?; "Grammar AST");

        let href = self.config.links.href_strategy();
        let diagrams = Transformer::new(href.as_ref(), self.imports.as_ref())
            .transform(&grammar)
            .map_err(|err| TrestleError::new_transform_error(err, source))?;
        info!(diagrams = diagrams.len(); "Grammar transformed to diagrams");
        Ok(diagrams)
    }

    /// Render named diagrams into a standalone HTML page.
    ///
    /// # Errors
    ///
    /// Returns `TrestleError::Io` if the configured style sheet cannot be
    /// read.
    pub fn render_html(&self, diagrams: Vec<NamedDiagram>) -> Result<String, TrestleError> {
        let style = self.stylesheet()?;
        let mut document = HtmlDocument::new(&style);
        if let Some(file_name) = &self.file_name {
            document = document.with_file_name(file_name);
        }

        let html = document.render(diagrams);
        info!(bytes = html.len(); "HTML page assembled");
        Ok(html)
    }

    fn stylesheet(&self) -> Result<Cow<'static, str>, TrestleError> {
        match self.config.style.stylesheet() {
            Some(path) => {
                debug!(path:? = path; "Loading style sheet");
                Ok(Cow::Owned(fs::read_to_string(path)?))
            }
            None => Ok(Cow::Borrowed(DEFAULT_STYLE)),
        }
    }
}
