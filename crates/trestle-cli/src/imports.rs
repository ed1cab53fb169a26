//! Import resolution against grammar files on disk.

use std::path::{Path, PathBuf};

use log::debug;

use trestle::{
    ast::ImportPath,
    html::anchor_id,
    imports::{ImportResolver, ImportSource},
};

/// Resolves `%import a.b.NAME` to `<root>/a/b.lark`.
///
/// Relative imports (`%import .b.NAME`) are resolved against the directory of
/// the importing grammar. A resolved import links to the page rendered for
/// the imported file, `a/b.html#NAME`.
#[derive(Debug, Clone)]
pub struct ImportDirectory {
    root: PathBuf,
    relative_root: PathBuf,
}

impl ImportDirectory {
    pub fn new(root: impl Into<PathBuf>, relative_root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            relative_root: relative_root.into(),
        }
    }

    fn base(&self, path: &ImportPath) -> &Path {
        if path.relative {
            &self.relative_root
        } else {
            &self.root
        }
    }
}

impl ImportResolver for ImportDirectory {
    fn resolve(&self, path: &ImportPath) -> Option<ImportSource> {
        let (target, modules) = path.segments.split_last()?;
        if modules.is_empty() {
            return None;
        }

        let module: Vec<&str> = modules.iter().map(|segment| segment.inner().value.as_str()).collect();
        let relative = format!("{}.lark", module.join("/"));
        let file = self.base(path).join(&relative);
        if !file.is_file() {
            debug!(file:% = file.display(); "Imported grammar not found");
            return None;
        }

        let href = format!("{}.html#{}", module.join("/"), anchor_id(&target.inner().value));
        Some(ImportSource::new(relative, Some(href)))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use trestle_parser::{Spanned, ast::Name};

    use super::*;

    fn path(relative: bool, segments: &[Name]) -> ImportPath {
        ImportPath {
            relative,
            segments: segments.iter().cloned().map(Spanned::detached).collect(),
        }
    }

    #[test]
    fn test_resolves_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("lib")).unwrap();
        fs::write(dir.path().join("lib/common.lark"), "WS: \" \"").unwrap();

        let imports = ImportDirectory::new(dir.path(), "unused");
        let source = imports
            .resolve(&path(false, &[Name::rule("lib"), Name::rule("common"), Name::token("WS")]))
            .unwrap();
        assert_eq!(source.file_name, "lib/common.lark");
        assert_eq!(source.href.as_deref(), Some("lib/common.html#WS"));
    }

    #[test]
    fn test_missing_file_is_unresolved() {
        let dir = tempfile::tempdir().unwrap();
        let imports = ImportDirectory::new(dir.path(), dir.path());
        assert_eq!(
            imports.resolve(&path(false, &[Name::rule("common"), Name::token("WS")])),
            None
        );
    }

    #[test]
    fn test_relative_import_uses_grammar_directory() {
        let grammars = tempfile::tempdir().unwrap();
        fs::write(grammars.path().join("lexer.lark"), "NAME: /x/").unwrap();

        let imports = ImportDirectory::new("unused", grammars.path());
        let source = imports
            .resolve(&path(true, &[Name::rule("lexer"), Name::rule("?name")]))
            .unwrap();
        assert_eq!(source.href.as_deref(), Some("lexer.html#name"));
    }

    #[test]
    fn test_bare_name_is_unresolved() {
        let imports = ImportDirectory::new(".", ".");
        assert_eq!(imports.resolve(&path(false, &[Name::token("WS")])), None);
    }
}
