//! # Apexdoc Parser
//!
//! Lexer and backtracking parser for Apex source files. This crate turns
//! `.cls` and `.trigger` files into the IR defined by [`apexdoc_core::ir`].
//!
//! The pipeline reads characters from a [`CharSource`] in chunks, lexes them
//! on demand, and runs grammar productions over a token stream that can be
//! rolled back. A parse never fails outright: problems are reported as
//! diagnostics on the returned nodes.
//!
//! ## Usage
//!
//! ```
//! # use apexdoc_parser::{parse_str, Grammar, ParseConfig};
//!
//! let nodes = parse_str(
//!     Grammar::Unit,
//!     "Greeter",
//!     "public class Greeter { public String hello() { return 'hi'; } }",
//!     &ParseConfig::default(),
//! );
//!
//! assert_eq!(nodes.len(), 1);
//! assert!(nodes[0].is_valid());
//! assert_eq!(nodes[0].name(), "Greeter");
//! ```

mod config;
mod dispatch;
mod error;
mod grammar;
mod lexer;
#[cfg(test)]
mod parser_tests;
mod source;
mod stream;
mod tokens;

pub use config::ParseConfig;
pub use dispatch::Grammar;
pub use lexer::{LexError, Lexer};
pub use source::{CharSource, FileSource, StrSource};
pub use tokens::{Token, TokenKind};

use std::{io, path::Path};

use log::{debug, info, warn};

use apexdoc_core::{
    error::{Diagnostic, ErrorCode},
    ir::IrNode,
};

use error::Failure;
use stream::TokenStream;

/// Parse everything `source` yields with `grammar`.
///
/// On success the nodes of the file are returned: for [`Grammar::Unit`] the
/// outermost unit first, followed by its nested classes in declaration
/// order. On failure a single invalid placeholder node named `name` is
/// returned, carrying the diagnostic that stopped the parse.
///
/// The source is closed before this function returns.
///
/// # Arguments
///
/// * `grammar` - The grammar to parse with
/// * `name` - Name given to the placeholder node if the parse fails
/// * `source` - Where the characters come from
/// * `config` - Buffer and diagnostic settings
pub fn parse_source(
    grammar: Grammar,
    name: &str,
    source: impl CharSource + 'static,
    config: &ParseConfig,
) -> Vec<IrNode> {
    let lexer = Lexer::new(Box::new(source), config);
    let mut stream = TokenStream::new(lexer, config);

    let result = grammar::parse(grammar, &mut stream);
    stream.dismiss();

    match result {
        Ok(nodes) => {
            debug!(name = name, grammar = grammar.to_string(), nodes = nodes.len(); "Parsed");
            nodes
        }
        Err(failure) => {
            let diagnostic = match failure {
                Failure::Fatal(diagnostic) => *diagnostic,
                Failure::NoMatch => Diagnostic::error("Unable to identify structure")
                    .with_code(ErrorCode::E102),
            };
            warn!(
                name = name,
                line = diagnostic.line(),
                offset = diagnostic.offset();
                "{diagnostic}"
            );
            vec![grammar.placeholder(name, diagnostic)]
        }
    }
}

/// Parse source text held in memory.
pub fn parse_str(grammar: Grammar, name: &str, text: &str, config: &ParseConfig) -> Vec<IrNode> {
    parse_source(grammar, name, StrSource::new(text), config)
}

/// Parse the file at `path` with the grammar its extension selects.
///
/// Returns `Ok(None)` when no grammar handles the extension. Failing to
/// open the file is the only error; everything that goes wrong after that is
/// reported on the returned nodes, named after the file when parsing fails.
///
/// # Example
///
/// ```no_run
/// # use apexdoc_parser::{parse_file, ParseConfig};
/// let nodes = parse_file("classes/Invoice.cls", &ParseConfig::default())?
///     .unwrap_or_default();
/// for node in &nodes {
///     println!("{node}");
/// }
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn parse_file(path: impl AsRef<Path>, config: &ParseConfig) -> io::Result<Option<Vec<IrNode>>> {
    let path = path.as_ref();
    let Some(grammar) = Grammar::for_path(path) else {
        warn!(path = path.display().to_string(); "No parser available");
        return Ok(None);
    };

    info!(path = path.display().to_string(), grammar = grammar.to_string(); "Parsing file");
    let source = FileSource::open(path)?;
    let name = dispatch::base_name(path);
    Ok(Some(parse_source(grammar, &name, source, config)))
}
