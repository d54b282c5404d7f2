//! Apexdoc - documentation model for Apex classes and triggers.
//!
//! This crate ties the parser and the IR together. A [`Workspace`] parses
//! `.cls` and `.trigger` files, registers every unit it finds in a
//! [`Registry`](registry::Registry), and reports the units that failed to
//! parse.

pub mod config;

mod error;

pub use apexdoc_core::{Position, Span, error as diagnostics, ir, registry};
pub use apexdoc_parser::{Grammar, ParseConfig};

pub use error::{ApexdocError, ParseFailure};

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info, trace};

use apexdoc_core::{ir::IrNode, registry::Registry};

use config::AppConfig;

/// A set of parsed Apex files.
///
/// # Examples
///
/// ```rust,no_run
/// use apexdoc::{Workspace, config::AppConfig};
///
/// let mut workspace = Workspace::new(AppConfig::default())?;
/// workspace.add_path("force-app/main/default/classes")?;
///
/// for node in workspace.registry().nodes() {
///     println!("{node}");
/// }
/// workspace.check()?;
/// # Ok::<(), apexdoc::ApexdocError>(())
/// ```
#[derive(Debug)]
pub struct Workspace {
    config: AppConfig,
    parse_config: ParseConfig,
    registry: Registry,
}

impl Workspace {
    /// Create an empty workspace.
    ///
    /// # Errors
    ///
    /// Returns [`ApexdocError::Config`] when the parser settings are invalid.
    pub fn new(config: AppConfig) -> Result<Self, ApexdocError> {
        let parse_config = config.parser().parse_config()?;
        Ok(Self {
            config,
            parse_config,
            registry: Registry::new(),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Parse a file, or every Apex file below a directory.
    ///
    /// Returns the number of files parsed.
    ///
    /// # Errors
    ///
    /// Returns [`ApexdocError::Io`] when a file or directory cannot be read.
    pub fn add_path(&mut self, path: impl AsRef<Path>) -> Result<usize, ApexdocError> {
        let path = path.as_ref();
        if path.is_dir() {
            self.add_dir(path)
        } else {
            Ok(self.add_file(path)?.map_or(0, |_| 1))
        }
    }

    /// Parse one file and register the units it declares.
    ///
    /// Returns the registered names, or `None` when the file is not an Apex
    /// file.
    ///
    /// # Errors
    ///
    /// Returns [`ApexdocError::Io`] when the file cannot be opened.
    pub fn add_file(&mut self, path: impl AsRef<Path>) -> Result<Option<Vec<String>>, ApexdocError> {
        let path = path.as_ref();
        let Some(nodes) = apexdoc_parser::parse_file(path, &self.parse_config)? else {
            return Ok(None);
        };

        let mut names = Vec::with_capacity(nodes.len());
        for node in nodes {
            let name = node.qualified_name();
            if let Some(previous) = self.registry.put(name.clone(), node, path) {
                debug!(name = name.as_str(), previous = previous.label(); "Replaced registered unit");
            }
            names.push(name);
        }
        Ok(Some(names))
    }

    /// Parse every `.cls` and `.trigger` file below `dir`, in path order.
    ///
    /// # Errors
    ///
    /// Returns [`ApexdocError::Io`] when a directory or file cannot be read.
    pub fn add_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize, ApexdocError> {
        let dir = dir.as_ref();
        info!(path = dir.display().to_string(); "Scanning directory");

        let mut files = Vec::new();
        collect_apex_files(dir, &mut files)?;
        files.sort();

        for file in &files {
            self.add_file(file)?;
        }
        info!(files = files.len(), units = self.registry.len(); "Directory parsed");
        Ok(files.len())
    }

    /// Iterate over the units that carry diagnostics.
    pub fn invalid_nodes(&self) -> impl Iterator<Item = &IrNode> {
        self.registry.nodes().filter(|node| !node.is_valid())
    }

    /// Fail when any registered unit carries diagnostics.
    ///
    /// # Errors
    ///
    /// Returns [`ApexdocError::Parse`] listing every failed unit with the
    /// text of its file, or [`ApexdocError::Io`] when that text cannot be
    /// read back.
    pub fn check(&self) -> Result<(), ApexdocError> {
        let mut failures = Vec::new();
        for node in self.invalid_nodes() {
            let path = self
                .registry
                .source_path_of(node)
                .map(Path::to_path_buf)
                .unwrap_or_default();
            let src = fs::read_to_string(&path)?;
            for diagnostic in node.diagnostics() {
                failures.push(ParseFailure::new(
                    path.clone(),
                    node.name(),
                    diagnostic.clone(),
                    src.clone(),
                ));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ApexdocError::Parse(failures))
        }
    }
}

fn collect_apex_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), ApexdocError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_apex_files(&path, files)?;
        } else if Grammar::for_path(&path).is_some() {
            trace!(path = path.display().to_string(); "Found Apex file");
            files.push(path);
        }
    }
    Ok(())
}
