//! Sample metadata intake CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use mgm_cli::commands::{
    CommandResult, run_digest, run_fields, run_import, run_save, run_submit,
};
use mgm_cli::config::Settings;
use mgm_cli::logging::{LogConfig, LogFormat, init_logging};

mod cli;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::summary::{print_fields, print_result};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let settings = Settings::from_env(cli.settings.overrides());

    let result = match &cli.command {
        Command::Fields => run_fields(&settings).map(|registry| {
            print_fields(&registry);
            false
        }),
        Command::Import(args) => run_import(&settings, &args.file, &args.user).map(|r| report(&r)),
        Command::Save(args) => {
            run_save(&settings, &args.file, &args.user, &args.output_dir).map(|r| report(&r))
        }
        Command::Submit(args) => {
            run_submit(&settings, &args.form, &args.output_dir).map(|r| report(&r))
        }
        Command::Digest(args) => {
            println!("{}", run_digest(&settings, &args.name));
            Ok(false)
        }
    };

    let exit_code = match result {
        Ok(false) => 0,
        Ok(true) => 1,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Print the request result; true when it hit a fatal issue.
fn report(result: &CommandResult) -> bool {
    print_result(result);
    result.is_fatal()
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
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
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
