//! labtrack CLI.

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::{ColorChoice, Parser};
use lab_cli::commands::{run_describe, run_identifier, run_profiles, run_receive};
use lab_cli::logging::{LogConfig, LogFormat, init_logging};
use lab_cli::types::{IdentifierRequest, ProfilesRequest};
use serde::Serialize;
use tracing::level_filters::LevelFilter;

mod cli;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::summary::{print_description, print_identifier, print_profiles, print_receipt};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(cli) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<()> {
    let json = cli.json;
    match cli.command {
        Command::Identifier(args) => {
            let report = run_identifier(&IdentifierRequest {
                template: args.template,
                fields: args.fields,
                prefix_length: args.prefix_length,
                numeric_code: args.numeric_code,
                parent_segment: args.parent_segment,
                count: args.count,
                count_padding: args.count_padding,
                identifier_length: args.identifier_length,
                primary_segment: args.primary_segment,
            })?;
            emit(json, &report, print_identifier)
        }
        Command::Profiles(args) => {
            let report = run_profiles(&ProfilesRequest {
                root: args.root,
                namespaces: args.namespaces,
                record_types: args.record_types,
            })?;
            emit(json, &report, print_profiles)
        }
        Command::Receive(args) => {
            let receipt = run_receive(&args.store, &args.manifest, &args.item, &args.aliquot)?;
            emit(json, &receipt, print_receipt)
        }
        Command::Describe(args) => {
            let report = run_describe(&args.store, &args.manifest)?;
            emit(json, &report, print_description)
        }
    }
}

fn emit<T: Serialize>(json: bool, value: &T, print: fn(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print(value);
    }
    Ok(())
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig::default()
        .with_level_filter(cli.verbosity.tracing_level_filter())
        .with_format(match cli.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        })
        .with_log_file(cli.log_file.clone());
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
