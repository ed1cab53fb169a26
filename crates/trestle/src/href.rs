//! Hyperlink policy for diagram leaves.
//!
//! The transformer asks an [`HrefStrategy`] for a link for every name and
//! literal it turns into a box. [`NoLinks`] never links; [`CrossLinks`]
//! links names to their own diagram on the page and regular expressions to
//! an external tester.

use log::trace;

use trestle_parser::ast::LiteralKind;

use crate::{error::LiteralError, links::RegexLinker, unescape::unquote_literal};

/// The leaf a link is requested for. Literals carry their source lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HrefTarget<'a> {
    Rule(&'a str),
    Token(&'a str),
    String(&'a str),
    Regexp(&'a str),
    LiteralRange(&'a str, &'a str),
}

/// Decides whether and where a diagram leaf links to.
pub trait HrefStrategy {
    /// Link for `target`, or `None` for no link.
    ///
    /// # Errors
    ///
    /// Fails when a literal has to be decoded to build its link and is
    /// malformed.
    fn href(&self, target: HrefTarget<'_>) -> Result<Option<String>, LiteralError>;
}

/// Strategy that never links.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLinks;

impl HrefStrategy for NoLinks {
    fn href(&self, _target: HrefTarget<'_>) -> Result<Option<String>, LiteralError> {
        Ok(None)
    }
}

/// Strategy for a single HTML page holding every diagram.
///
/// Rules and tokens link to `#<name>`. Regular expressions are decoded and
/// handed to the configured [`RegexLinker`], if any.
#[derive(Default)]
pub struct CrossLinks {
    regex: Option<Box<dyn RegexLinker>>,
}

impl CrossLinks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Link regular expression literals with `linker`.
    pub fn with_regex_links(mut self, linker: impl RegexLinker + 'static) -> Self {
        self.regex = Some(Box::new(linker));
        self
    }
}

impl std::fmt::Debug for CrossLinks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrossLinks")
            .field("regex_links", &self.regex.is_some())
            .finish()
    }
}

impl HrefStrategy for CrossLinks {
    fn href(&self, target: HrefTarget<'_>) -> Result<Option<String>, LiteralError> {
        match target {
            HrefTarget::Rule(name) | HrefTarget::Token(name) => Ok(Some(format!("#{name}"))),
            HrefTarget::Regexp(lexeme) => {
                let Some(linker) = &self.regex else {
                    return Ok(None);
                };
                let decoded = unquote_literal(LiteralKind::Regexp, lexeme)?;
                trace!(pattern = decoded.text.as_str(), flags = decoded.flags.as_str(); "Linking regexp");
                Ok(linker.link(&decoded.text, &decoded.flags))
            }
            HrefTarget::String(_) | HrefTarget::LiteralRange(..) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::Regex101;

    #[test]
    fn test_no_links() {
        for target in [
            HrefTarget::Rule("expr"),
            HrefTarget::Token("NUMBER"),
            HrefTarget::Regexp("/a/"),
            HrefTarget::String("\"a\""),
        ] {
            assert_eq!(NoLinks.href(target), Ok(None));
        }
    }

    #[test]
    fn test_names_link_to_anchors() {
        let links = CrossLinks::new();
        assert_eq!(links.href(HrefTarget::Rule("expr")), Ok(Some("#expr".to_string())));
        assert_eq!(links.href(HrefTarget::Token("NUMBER")), Ok(Some("#NUMBER".to_string())));
    }

    #[test]
    fn test_literals_without_linker() {
        let links = CrossLinks::new();
        assert_eq!(links.href(HrefTarget::Regexp("/a+/")), Ok(None));
        assert_eq!(links.href(HrefTarget::String("\"a\"")), Ok(None));
        assert_eq!(links.href(HrefTarget::LiteralRange("\"a\"", "\"z\"")), Ok(None));
    }

    #[test]
    fn test_regexp_is_decoded_before_linking() {
        let links = CrossLinks::new().with_regex_links(|pattern: &str, flags: &str| {
            Some(format!("{pattern}|{flags}"))
        });
        assert_eq!(
            links.href(HrefTarget::Regexp(r"/\t\d/ms")),
            Ok(Some("\t\\d|ms".to_string()))
        );
    }

    #[test]
    fn test_linker_without_link_gives_none() {
        let links = CrossLinks::new().with_regex_links(|_: &str, _: &str| None::<String>);
        assert_eq!(links.href(HrefTarget::Regexp("/a+/i")), Ok(None));
    }

    #[test]
    fn test_regex101_through_strategy() {
        let links = CrossLinks::new().with_regex_links(Regex101);
        let href = links.href(HrefTarget::Regexp("/a b/")).unwrap().unwrap();
        assert!(href.starts_with("https://regex101.com/?regex=a+b"));
    }

    #[test]
    fn test_malformed_regexp_fails() {
        let links = CrossLinks::new().with_regex_links(Regex101);
        assert_eq!(
            links.href(HrefTarget::Regexp(r"/\x4/")),
            Err(LiteralError::InvalidEscape {
                escape: r"\x4".to_string()
            })
        );
    }
}
