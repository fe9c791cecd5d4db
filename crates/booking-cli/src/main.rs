//! Hotel booking explorer CLI.

use std::io::{self, IsTerminal};

use anyhow::Result;
use booking_cli::DashboardConfig;
use booking_cli::logging::{LogConfig, LogFormat, init_logging};
use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{
    run_breakdown, run_choices, run_features, run_impact, run_presets, run_profile, run_summary,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Runs the selected command. `features` exits with 2 when the table has
/// unusable inputs.
fn run(cli: &Cli) -> Result<i32> {
    let config = DashboardConfig::load_or_default(cli.config.as_deref())?;
    match &cli.command {
        Command::Profile(args) => run_profile(args, config)?,
        Command::Features(args) => {
            if !run_features(args, config)? {
                return Ok(2);
            }
        }
        Command::Summary(args) => run_summary(args, config)?,
        Command::Breakdown(args) => run_breakdown(args, config)?,
        Command::Impact(args) => run_impact(args, config)?,
        Command::Choices(args) => run_choices(args, config)?,
        Command::Presets => run_presets(),
    }
    Ok(0)
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level_filter = match cli.log_level {
        Some(LogLevelArg::Error) => LevelFilter::ERROR,
        Some(LogLevelArg::Warn) => LevelFilter::WARN,
        Some(LogLevelArg::Info) => LevelFilter::INFO,
        Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
        Some(LogLevelArg::Trace) => LevelFilter::TRACE,
        None => cli.verbosity.tracing_level_filter(),
    };
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let mut config = LogConfig::default()
        .with_level_filter(level_filter)
        .with_format(format)
        .with_log_file(cli.log_file.clone());
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
