//! Assessment import CLI.

use clap::Parser;
use tracing::Level;

use assess_cli::logging::{LogConfig, LogFormat, init_logging};
use assess_cli::summary::{print_import_summary, print_mappings};
use assess_cli::{run_import, run_map};

mod cli;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};

fn main() {
    let cli = Cli::parse();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match &cli.command {
        Command::Import(args) => match run_import(&args.file, args.header_row) {
            Ok(outcome) => {
                if args.json {
                    match serde_json::to_string_pretty(&outcome) {
                        Ok(json) => println!("{json}"),
                        Err(error) => {
                            eprintln!("error: {error}");
                            std::process::exit(1);
                        }
                    }
                } else {
                    print_import_summary(&outcome);
                }
                if outcome.validation.is_valid { 0 } else { 1 }
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Map(args) => {
            match run_map(&args.file, args.header_row, args.entity.into(), args.threshold) {
                Ok(outcome) => {
                    if args.json {
                        match serde_json::to_string_pretty(&outcome) {
                            Ok(json) => println!("{json}"),
                            Err(error) => {
                                eprintln!("error: {error}");
                                std::process::exit(1);
                            }
                        }
                    } else {
                        print_mappings(&outcome);
                    }
                    if outcome.unmapped_required.is_empty() { 0 } else { 1 }
                }
                Err(error) => {
                    eprintln!("error: {error:#}");
                    1
                }
            }
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig::from_verbosity(cli.verbose);
    if let Some(level) = cli.log_level {
        config.level = match level {
            LogLevelArg::Error => Level::ERROR,
            LogLevelArg::Warn => Level::WARN,
            LogLevelArg::Info => Level::INFO,
            LogLevelArg::Debug => Level::DEBUG,
            LogLevelArg::Trace => Level::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.with_ansi = cli.log_file.is_none();
    config.log_file = cli.log_file.clone();
    config
}
