//! Links from regular expression literals to online regex testers.

/// Builds a link for a regular expression pattern and its flags.
///
/// Any `Fn(&str, &str) -> Option<String>` is a `RegexLinker`.
pub trait RegexLinker {
    fn link(&self, pattern: &str, flags: &str) -> Option<String>;
}

impl<F> RegexLinker for F
where
    F: Fn(&str, &str) -> Option<String>,
{
    fn link(&self, pattern: &str, flags: &str) -> Option<String> {
        self(pattern, flags)
    }
}

/// Links to `regex101.com` with the Python flavor selected.
#[derive(Debug, Clone, Copy, Default)]
pub struct Regex101;

impl RegexLinker for Regex101 {
    fn link(&self, pattern: &str, flags: &str) -> Option<String> {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("regex", pattern)
            .append_pair("flavor", "python")
            .append_pair("flags", flags)
            .finish();
        Some(format!("https://regex101.com/?{query}"))
    }
}

/// Links to `pythex.org`, translating the `i`, `m`, `s` and `x` flags into
/// its checkboxes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pythex;

impl RegexLinker for Pythex {
    fn link(&self, pattern: &str, flags: &str) -> Option<String> {
        let flag = |letter: char| if flags.contains(letter) { "1" } else { "0" };
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("regex", pattern)
            .append_pair("ignorecase", flag('i'))
            .append_pair("multiline", flag('m'))
            .append_pair("dotall", flag('s'))
            .append_pair("verbose", flag('x'))
            .finish();
        Some(format!("https://pythex.org/?{query}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex101_link() {
        assert_eq!(
            Regex101.link(r"\d+ x", "i").as_deref(),
            Some("https://regex101.com/?regex=%5Cd%2B+x&flavor=python&flags=i")
        );
    }

    #[test]
    fn test_pythex_link() {
        assert_eq!(
            Pythex.link("a.b", "ms").as_deref(),
            Some("https://pythex.org/?regex=a.b&ignorecase=0&multiline=1&dotall=1&verbose=0")
        );
    }

    #[test]
    fn test_closure_linker() {
        let linker = |pattern: &str, _flags: &str| (!pattern.is_empty()).then(|| format!("#re-{pattern}"));
        assert_eq!(linker.link("ab", "").as_deref(), Some("#re-ab"));
        assert_eq!(linker.link("", ""), None);
    }
}
