//! Command-line argument definitions for the Apexdoc CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the Apex sources to parse, the
//! configuration file, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Apexdoc tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Apex files or directories to parse
    #[arg(required = true, help = "Paths to .cls/.trigger files or directories")]
    pub inputs: Vec<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Print the class hierarchy of every class
    #[arg(long)]
    pub hierarchy: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
