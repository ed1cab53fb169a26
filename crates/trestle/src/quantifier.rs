//! Mapping of repetition syntax onto railroad repetition wrappers.

use trestle_core::diagram::Element;
use trestle_parser::{Span, ast::Repeat};

use crate::error::TransformError;

/// Wrap `item` according to `repeat`.
///
/// | Syntax        | Element                                   |
/// |---------------|-------------------------------------------|
/// | `?`           | `Optional`                                |
/// | `*`           | `ZeroOrMore`                              |
/// | `+`           | `OneOrMore`                               |
/// | `~ n`         | `OneOrMore`, comment `"n times"`          |
/// | `~ 0..1`      | `Optional`                                |
/// | `~ 0..m`      | `ZeroOrMore`, comment `"0..m"`            |
/// | `~ n..m`      | `OneOrMore`, comment `"n..m"` for `n > 0` |
///
/// Bounds are shown as written; the wrappers cannot enforce them.
pub fn resolve(item: Element, repeat: &Repeat, span: Span) -> Result<Element, TransformError> {
    match repeat {
        Repeat::Op('+') => Ok(Element::one_or_more(item, None)),
        Repeat::Op('*') => Ok(Element::zero_or_more(item, None)),
        Repeat::Op('?') => Ok(Element::optional(item)),
        Repeat::Op(other) => Err(TransformError::UnknownOperator {
            operator: other.to_string(),
            span,
        }),
        Repeat::Count(count) => Ok(Element::one_or_more(item, Some(format!("{count} times")))),
        Repeat::Range { min, max } => {
            let lower = bound(min, span)?;
            let upper = bound(max, span)?;
            let comment = format!("{min}..{max}");
            Ok(match (lower, upper) {
                (0, 1) => Element::optional(item),
                (0, _) => Element::zero_or_more(item, Some(comment)),
                _ => Element::one_or_more(item, Some(comment)),
            })
        }
    }
}

fn bound(text: &str, span: Span) -> Result<u64, TransformError> {
    text.parse()
        .map_err(|_| TransformError::unsupported(format!("repeat bound `{text}`"), span))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> Element {
        Element::terminal("\"x\"", None)
    }

    fn range(min: &str, max: &str) -> Repeat {
        Repeat::Range {
            min: min.to_string(),
            max: max.to_string(),
        }
    }

    #[test]
    fn test_operators() {
        let span = Span::default();
        assert_eq!(
            resolve(item(), &Repeat::Op('+'), span).unwrap(),
            Element::one_or_more(item(), None)
        );
        assert_eq!(
            resolve(item(), &Repeat::Op('*'), span).unwrap(),
            Element::zero_or_more(item(), None)
        );
        assert_eq!(
            resolve(item(), &Repeat::Op('?'), span).unwrap(),
            Element::optional(item())
        );
    }

    #[test]
    fn test_unknown_operator() {
        let err = resolve(item(), &Repeat::Op('!'), Span::new(4..5)).unwrap_err();
        assert_eq!(
            err,
            TransformError::UnknownOperator {
                operator: "!".to_string(),
                span: Span::new(4..5)
            }
        );
    }

    #[test]
    fn test_count() {
        assert_eq!(
            resolve(item(), &Repeat::Count("3".to_string()), Span::default()).unwrap(),
            Element::one_or_more(item(), Some("3 times".to_string()))
        );
    }

    #[test]
    fn test_ranges() {
        let span = Span::default();
        assert_eq!(
            resolve(item(), &range("0", "1"), span).unwrap(),
            Element::optional(item())
        );
        assert_eq!(
            resolve(item(), &range("0", "5"), span).unwrap(),
            Element::zero_or_more(item(), Some("0..5".to_string()))
        );
        assert_eq!(
            resolve(item(), &range("2", "4"), span).unwrap(),
            Element::one_or_more(item(), Some("2..4".to_string()))
        );
        assert_eq!(
            resolve(item(), &range("00", "01"), span).unwrap(),
            Element::optional(item())
        );
    }

    #[test]
    fn test_oversized_bound_is_rejected() {
        let err = resolve(item(), &range("0", "99999999999999999999999"), Span::default()).unwrap_err();
        assert!(matches!(err, TransformError::UnsupportedConstruct { .. }));
    }
}
