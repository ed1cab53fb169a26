//! Resolution of `%import` statements.
//!
//! An [`ImportResolver`] maps an import path to the file that defines the
//! imported name. A resolved import becomes a one-box diagram that names its
//! origin and links to it; an unresolved one is left out of the page.

use log::debug;

use trestle_core::diagram::{Diagram, DiagramKind, Element, Start};
use trestle_parser::ast::{Import, ImportPath, NameKind};

use crate::transform::NamedDiagram;

/// Where an imported name is defined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSource {
    /// Name of the defining file, shown in the diagram
    pub file_name: String,
    /// Link to the imported definition
    pub href: Option<String>,
}

impl ImportSource {
    pub fn new(file_name: impl Into<String>, href: Option<String>) -> Self {
        Self {
            file_name: file_name.into(),
            href,
        }
    }
}

/// Looks up the source of an import path.
///
/// Any `Fn(&ImportPath) -> Option<ImportSource>` is an `ImportResolver`.
pub trait ImportResolver {
    /// `None` leaves the import out of the output.
    fn resolve(&self, path: &ImportPath) -> Option<ImportSource>;
}

impl<F> ImportResolver for F
where
    F: Fn(&ImportPath) -> Option<ImportSource>,
{
    fn resolve(&self, path: &ImportPath) -> Option<ImportSource> {
        self(path)
    }
}

/// Resolver that leaves every import out.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuppressImports;

impl ImportResolver for SuppressImports {
    fn resolve(&self, _path: &ImportPath) -> Option<ImportSource> {
        None
    }
}

/// Build the stub diagram for `import`, or `None` when it is not resolved.
///
/// The diagram is named after the alias if one is given, otherwise after the
/// imported name, and takes its kind from that name.
pub fn import_diagram(
    import: &Import,
    resolver: &dyn ImportResolver,
    css: Option<&str>,
) -> Option<NamedDiagram> {
    let exported = import.exported_name()?;
    let target = import.path.target()?;

    let Some(source) = resolver.resolve(&import.path) else {
        debug!(path:% = import.path; "Import not resolved, skipping");
        return None;
    };

    let label = format!(
        "import {target} from {}['{}']",
        import.path.module(),
        source.file_name
    );
    let (kind, body) = match exported.kind {
        NameKind::Token => (DiagramKind::Simple, Element::terminal(label, source.href)),
        NameKind::Rule => (DiagramKind::Complex, Element::non_terminal(label, source.href)),
    };

    let mut diagram = Diagram::new(Start::new(kind, exported.inner().value.as_str()), body);
    if let Some(css) = css {
        diagram = diagram.with_css(css);
    }
    Some(NamedDiagram::new(exported.inner().value.clone(), diagram))
}
