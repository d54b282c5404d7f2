//! CLI logic for the Apexdoc tool.
//!
//! Parses the Apex files named on the command line, prints a summary of
//! every unit found, and fails when any unit could not be parsed.

pub mod error_adapter;

mod args;
mod config;
mod summary;

pub use args::Args;
pub use summary::Summary;

use log::info;

use apexdoc::{ApexdocError, Workspace, config::AppConfig};

/// Load the configuration selected by `args`.
///
/// # Errors
///
/// Returns [`ApexdocError::Config`] when an explicit configuration file is
/// missing or any configuration file cannot be parsed.
pub fn load_config(args: &Args) -> Result<AppConfig, ApexdocError> {
    config::load_config(args.config.as_ref())
}

/// Run the Apexdoc CLI application
///
/// # Errors
///
/// Returns `ApexdocError` for:
/// - Configuration loading errors
/// - File I/O errors
/// - Units that failed to parse
pub fn run(args: &Args) -> Result<(), ApexdocError> {
    let app_config = load_config(args)?;
    run_with_config(args, app_config)
}

/// Run the application with an already loaded configuration.
///
/// The summary is printed even when some units failed to parse; the
/// failures are returned afterwards.
///
/// # Errors
///
/// See [`run`].
pub fn run_with_config(args: &Args, app_config: AppConfig) -> Result<(), ApexdocError> {
    let show_hierarchy = args.hierarchy || app_config.report().show_hierarchy();
    let mut workspace = Workspace::new(app_config)?;

    for input in &args.inputs {
        info!(input = input.as_str(); "Processing input");
        let files = workspace.add_path(input)?;
        info!(input = input.as_str(), files = files; "Input processed");
    }

    print!("{}", Summary::new(workspace.registry(), show_hierarchy));

    workspace.check()?;

    info!(units = workspace.registry().len(); "All units parsed");
    Ok(())
}
