//! # Trestle Core
//!
//! Railroad diagram vocabulary and renderer.
//!
//! - [`diagram`] - The element tree ([`Element`](diagram::Element)) and the
//!   [`Diagram`](diagram::Diagram) container
//! - [`render`] - Layout and SVG output
//! - [`geometry`] - Points, sizes and track extents
//! - [`style`] - The built-in style sheet
//!
//! ```
//! # use trestle_core::diagram::{Diagram, DiagramKind, Element, Start};
//! let diagram = Diagram::new(
//!     Start::new(DiagramKind::Simple, "DIGIT"),
//!     Element::one_or_more(Element::terminal("/[0-9]/", None), None),
//! );
//! let svg = diagram.render();
//! assert!(svg.contains("<svg"));
//! ```

pub mod diagram;
pub mod geometry;
pub mod render;
pub mod style;
