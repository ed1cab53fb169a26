//! CLI logic for the Trestle railroad diagram tool.

pub mod error_adapter;

mod args;
mod config;
mod imports;

pub use args::Args;

use std::{fs, path::Path};

use log::info;

use trestle::{RailroadBuilder, TrestleError};

use imports::ImportDirectory;

/// Run the Trestle CLI application
///
/// This function renders the input grammar to one HTML page and writes it
/// to the output file.
///
/// # Errors
///
/// Returns `TrestleError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - Constructs that cannot be drawn
pub fn run(args: &Args) -> Result<(), TrestleError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing grammar"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let input = Path::new(&args.input);
    let file_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.input.clone());

    let mut builder = RailroadBuilder::new(app_config).with_file_name(file_name);
    if let Some(root) = &args.imports {
        let grammar_dir = input.parent().unwrap_or(Path::new("."));
        info!(imports = root; "Resolving imports");
        builder = builder.with_imports(ImportDirectory::new(root, grammar_dir));
    }

    let diagrams = builder.parse(&source)?;
    let html = builder.render_html(diagrams)?;

    fs::write(&args.output, html)?;

    info!(output_file = args.output; "HTML exported successfully");

    Ok(())
}
