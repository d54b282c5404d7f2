//! Apexdoc CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use apexdoc::ApexdocError;
use apexdoc_cli::{Args, error_adapter::to_reportables};

fn main() {
    // Install miette's pretty panic hook early for better panic reports
    miette::set_panic_hook();

    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting Apexdoc");
    debug!(args:?; "Parsed arguments");

    let app_config = match apexdoc_cli::load_config(&args) {
        Ok(app_config) => app_config,
        Err(err) => report_and_exit(&err, false),
    };
    let show_snapshot = app_config.report().show_snapshot();

    if let Err(err) = apexdoc_cli::run_with_config(&args, app_config) {
        report_and_exit(&err, show_snapshot);
    }

    info!("Completed successfully");
}

fn report_and_exit(err: &ApexdocError, show_snapshot: bool) -> ! {
    let reporter = miette::GraphicalReportHandler::new();

    // Render each diagnostic independently
    for reportable in to_reportables(err, show_snapshot) {
        let mut writer = String::new();
        reporter
            .render_report(&mut writer, &reportable)
            .expect("Writing to String buffer is infallible");

        error!("{writer}");
    }

    process::exit(1);
}
