//! Decoding of quoted grammar literals.
//!
//! Both `"strings"` and `/regexps/` are decoded with string-literal escape
//! rules, except that unknown escapes such as `\d` or `\.` are kept verbatim
//! so regular expression syntax survives. String literals additionally
//! collapse `\\` to a single backslash.

use std::iter::Peekable;
use std::str::Chars;

use trestle_parser::ast::LiteralKind;

use crate::error::LiteralError;

/// The decoded value of a quoted literal and the flags written after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedLiteral {
    pub text: String,
    pub flags: String,
}

/// Decode a literal lexeme such as `"if"i` or `/\d+/m`.
///
/// # Errors
///
/// Fails when the closing quote is missing, the quotes do not match, the
/// interior ends in a lone backslash, or a `\x`/`\u` escape is malformed.
///
/// # Examples
///
/// ```
/// # use trestle::unescape::unquote_literal;
/// # use trestle_parser::ast::LiteralKind;
/// let decoded = unquote_literal(LiteralKind::Regexp, r"/\d+\n/m").unwrap();
/// assert_eq!(decoded.text, "\\d+\n");
/// assert_eq!(decoded.flags, "m");
/// ```
pub fn unquote_literal(kind: LiteralKind, lexeme: &str) -> Result<DecodedLiteral, LiteralError> {
    let quote = kind.quote();
    let close = match lexeme.rfind(quote) {
        Some(index) if index > 0 => index,
        _ => return Err(LiteralError::MissingClosingQuote { quote }),
    };

    let found = lexeme.chars().next().unwrap_or(quote);
    if found != quote {
        return Err(LiteralError::MismatchedQuote {
            expected: quote,
            found,
        });
    }

    let interior = &lexeme[found.len_utf8()..close];
    let flags = &lexeme[close + quote.len_utf8()..];

    let mut text = unescape(interior)?;
    if kind == LiteralKind::String {
        text = text.replace("\\\\", "\\");
    }

    Ok(DecodedLiteral {
        text,
        flags: flags.to_string(),
    })
}

/// Resolve the escapes of a literal interior.
///
/// `\\` stays doubled, `\"` becomes `"`, `\n` `\f` `\t` `\r` `\xHH` and
/// `\uHHHH` are decoded and every other escape is kept as written.
pub fn unescape(interior: &str) -> Result<String, LiteralError> {
    let mut out = String::with_capacity(interior.len());
    let mut chars = interior.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        let Some(escaped) = chars.next() else {
            return Err(LiteralError::DanglingBackslash);
        };
        match escaped {
            '\\' => out.push_str("\\\\"),
            '"' => out.push('"'),
            'n' => out.push('\n'),
            'f' => out.push('\u{0c}'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'x' => out.push(hex_escape(&mut chars, 'x', 2)?),
            'u' => out.push(hex_escape(&mut chars, 'u', 4)?),
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }

    Ok(out)
}

fn hex_escape(chars: &mut Peekable<Chars<'_>>, letter: char, digits: usize) -> Result<char, LiteralError> {
    let mut hex = String::with_capacity(digits);
    while hex.len() < digits {
        match chars.peek() {
            Some(c) if c.is_ascii_hexdigit() => {
                hex.push(*c);
                chars.next();
            }
            _ => break,
        }
    }

    let invalid = || LiteralError::InvalidEscape {
        escape: format!("\\{letter}{hex}"),
    };
    if hex.len() != digits {
        return Err(invalid());
    }
    u32::from_str_radix(&hex, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_string_escapes() {
        let decoded = unquote_literal(LiteralKind::String, r#""a\nb""#).unwrap();
        assert_eq!(decoded.text, "a\nb");
        assert_eq!(decoded.flags, "");

        let decoded = unquote_literal(LiteralKind::String, r#""tab\there""#).unwrap();
        assert_eq!(decoded.text, "tab\there");
    }

    #[test]
    fn test_string_collapses_double_backslash() {
        let decoded = unquote_literal(LiteralKind::String, r#""a\\b""#).unwrap();
        assert_eq!(decoded.text, "a\\b");
    }

    #[test]
    fn test_regexp_keeps_double_backslash() {
        let decoded = unquote_literal(LiteralKind::Regexp, r"/a\\b/").unwrap();
        assert_eq!(decoded.text, r"a\\b");
    }

    #[test]
    fn test_regexp_keeps_unknown_escapes() {
        let decoded = unquote_literal(LiteralKind::Regexp, r"/a\/b\d+/i").unwrap();
        assert_eq!(decoded.text, r"a\/b\d+");
        assert_eq!(decoded.flags, "i");
    }

    #[test]
    fn test_quote_escapes() {
        let decoded = unquote_literal(LiteralKind::String, r#""say \"hi\"""#).unwrap();
        assert_eq!(decoded.text, "say \"hi\"");

        let decoded = unquote_literal(LiteralKind::String, r#""it's""#).unwrap();
        assert_eq!(decoded.text, "it's");
    }

    #[test]
    fn test_hex_and_unicode_escapes() {
        let decoded = unquote_literal(LiteralKind::String, r#""\x41\u00e9""#).unwrap();
        assert_eq!(decoded.text, "Aé");
    }

    #[test]
    fn test_string_flags() {
        let decoded = unquote_literal(LiteralKind::String, r#""select"i"#).unwrap();
        assert_eq!(decoded.text, "select");
        assert_eq!(decoded.flags, "i");
    }

    #[test]
    fn test_missing_closing_quote() {
        assert_eq!(
            unquote_literal(LiteralKind::Regexp, "/abc"),
            Err(LiteralError::MissingClosingQuote { quote: '/' })
        );
        assert_eq!(
            unquote_literal(LiteralKind::String, "abc"),
            Err(LiteralError::MissingClosingQuote { quote: '"' })
        );
    }

    #[test]
    fn test_mismatched_quote() {
        assert_eq!(
            unquote_literal(LiteralKind::Regexp, "'abc/"),
            Err(LiteralError::MismatchedQuote {
                expected: '/',
                found: '\''
            })
        );
    }

    #[test]
    fn test_dangling_backslash() {
        assert_eq!(unescape("abc\\"), Err(LiteralError::DanglingBackslash));
    }

    #[test]
    fn test_invalid_hex_escape() {
        assert_eq!(
            unescape(r"\xZZ"),
            Err(LiteralError::InvalidEscape {
                escape: r"\x".to_string()
            })
        );
        assert_eq!(
            unescape(r"\u12"),
            Err(LiteralError::InvalidEscape {
                escape: r"\u12".to_string()
            })
        );
        assert!(unescape(r"\ud800").is_err());
    }

    fn check_plain_text_is_unchanged(text: &str) -> Result<(), TestCaseError> {
        prop_assert_eq!(unescape(text).unwrap(), text);
        let lexeme = format!("/{text}/");
        let decoded = unquote_literal(LiteralKind::Regexp, &lexeme).unwrap();
        prop_assert_eq!(decoded.text, text);
        prop_assert_eq!(decoded.flags, "");
        Ok(())
    }

    fn check_unknown_escapes_survive(letter: char) -> Result<(), TestCaseError> {
        let text = format!("\\{letter}");
        prop_assert_eq!(unescape(&text).unwrap(), text);
        Ok(())
    }

    proptest! {
        #[test]
        fn plain_text_is_unchanged(text in "[a-zA-Z0-9 .+*?()\\[\\]-]{0,24}") {
            check_plain_text_is_unchanged(&text)?;
        }

        #[test]
        fn unknown_escapes_survive(letter in "[a-eg-mo-qsvwyzA-Z0-9.(){}\\[\\]]") {
            let letter = letter.chars().next().unwrap();
            check_unknown_escapes_survive(letter)?;
        }
    }
}
