//! Configuration types for Apexdoc.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file by the command-line tool. Every field is optional; missing
//! values fall back to their defaults.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining parser and report settings.
//! - [`ParserConfig`] - Buffer and diagnostic limits, mapped onto [`ParseConfig`].
//! - [`ReportConfig`] - What the summary report shows.
//!
//! # Example
//!
//! ```
//! # use apexdoc::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.parser().parse_config().unwrap().chunk_size(), 4096);
//! assert!(!config.report().show_hierarchy());
//! ```

use serde::Deserialize;

use apexdoc_parser::ParseConfig;

use crate::ApexdocError;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Parser configuration section.
    #[serde(default)]
    parser: ParserConfig,

    /// Report configuration section.
    #[serde(default)]
    report: ReportConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(parser: ParserConfig, report: ReportConfig) -> Self {
        Self { parser, report }
    }

    /// Returns the parser configuration.
    pub fn parser(&self) -> &ParserConfig {
        &self.parser
    }

    /// Returns the report configuration.
    pub fn report(&self) -> &ReportConfig {
        &self.report
    }
}

/// The `[parser]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParserConfig {
    /// Characters requested from a file per read.
    #[serde(default)]
    chunk_size: Option<usize>,

    /// End-of-input tokens handed out before the lexer gives up.
    #[serde(default)]
    max_eof_reads: Option<u32>,

    /// Tokens rendered into a diagnostic snapshot.
    #[serde(default)]
    snapshot_tokens: Option<usize>,
}

impl ParserConfig {
    /// Creates a new [`ParserConfig`]. `None` keeps the parser default.
    pub fn new(
        chunk_size: Option<usize>,
        max_eof_reads: Option<u32>,
        snapshot_tokens: Option<usize>,
    ) -> Self {
        Self {
            chunk_size,
            max_eof_reads,
            snapshot_tokens,
        }
    }

    /// Build the [`ParseConfig`] these settings describe.
    ///
    /// # Errors
    ///
    /// Returns [`ApexdocError::Config`] when a value is zero.
    pub fn parse_config(&self) -> Result<ParseConfig, ApexdocError> {
        let mut config = ParseConfig::default();
        if let Some(chunk_size) = self.chunk_size {
            config = config.with_chunk_size(positive("chunk_size", chunk_size)?);
        }
        if let Some(max_eof_reads) = self.max_eof_reads {
            if max_eof_reads == 0 {
                return Err(ApexdocError::Config(
                    "parser.max_eof_reads must be at least 1".to_string(),
                ));
            }
            config = config.with_max_eof_reads(max_eof_reads);
        }
        if let Some(snapshot_tokens) = self.snapshot_tokens {
            config = config.with_snapshot_tokens(positive("snapshot_tokens", snapshot_tokens)?);
        }
        Ok(config)
    }
}

fn positive(name: &str, value: usize) -> Result<usize, ApexdocError> {
    if value == 0 {
        Err(ApexdocError::Config(format!(
            "parser.{name} must be at least 1"
        )))
    } else {
        Ok(value)
    }
}

/// The `[report]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportConfig {
    /// Print the token snapshot under each diagnostic.
    #[serde(default)]
    show_snapshot: bool,

    /// Print the `extends` chain of every class.
    #[serde(default)]
    show_hierarchy: bool,
}

impl ReportConfig {
    pub fn new(show_snapshot: bool, show_hierarchy: bool) -> Self {
        Self {
            show_snapshot,
            show_hierarchy,
        }
    }

    pub fn show_snapshot(&self) -> bool {
        self.show_snapshot
    }

    pub fn show_hierarchy(&self) -> bool {
        self.show_hierarchy
    }
}
