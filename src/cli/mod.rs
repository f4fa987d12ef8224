//! # compy CLI
//!
//! - The [`Command`] enum defines the commands that are available.
//! - [`execute_command`] matches on [`Command`] and calls the command.
#![deny(clippy::dbg_macro, clippy::unwrap_used)]

use std::env;

use clap::Parser;
use compy_config::Config;
use compy_consts::consts;
use miette::IntoDiagnostic;
use tracing_subscriber::{
    EnvFilter, filter::LevelFilter, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

pub mod add;
pub mod cli_interface;
pub mod init;
pub mod remove;
pub mod run;
pub mod tidy;

#[derive(Parser, Debug)]
#[command(
    name = "compy",
    version(consts::COMPY_VERSION),
    about = format!("
compy [version {}] - Scaffolding and dependency tidying for Python projects.

Basic Usage:
    Create a project with a virtual environment and a git repository:
    $ compy init my_project

    Declare the dependencies you import, drop the ones you don't:
    $ compy add requests
    $ compy tidy

    Run `my_project/scripts/main.py`:
    $ compy run
", consts::COMPY_VERSION),
)]
#[clap(arg_required_else_help = true, disable_help_flag = true)]
pub struct Args {
    #[command(subcommand)]
    command: Command,

    #[clap(flatten)]
    global_options: GlobalOptions,
}

#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Display help information
    #[clap(
        long,
        short,
        global = true,
        action = clap::ArgAction::Help,
        help_heading = consts::CLAP_GLOBAL_OPTIONS
    )]
    help: Option<bool>,

    /// Increase logging verbosity (-v for warnings, -vv for info, -vvv for debug, -vvvv for trace)
    #[clap(short, long, action = clap::ArgAction::Count, global = true, help_heading = consts::CLAP_GLOBAL_OPTIONS)]
    verbose: u8,

    /// Decrease logging verbosity (quiet mode)
    #[clap(short, long, action = clap::ArgAction::Count, global = true, help_heading = consts::CLAP_GLOBAL_OPTIONS)]
    quiet: u8,

    /// Whether the log needs to be colored.
    #[clap(long, default_value = "auto", global = true, env = "COMPY_COLOR", help_heading = consts::CLAP_GLOBAL_OPTIONS)]
    color: ColorOutput,
}

impl GlobalOptions {
    /// Determine the log level filter based on verbose and quiet counts.
    fn log_level_filter(&self) -> LevelFilter {
        match (self.quiet, self.verbose) {
            // Quiet mode overrides verbose
            (q, _) if q > 0 => LevelFilter::OFF,
            (_, 0) => LevelFilter::ERROR, // Default
            (_, 1) => LevelFilter::WARN,  // -v
            (_, 2) => LevelFilter::INFO,  // -vv
            (_, 3) => LevelFilter::DEBUG, // -vvv
            (_, _) => LevelFilter::TRACE, // -vvvv+
        }
    }
}

#[derive(Parser, Debug)]
pub enum Command {
    Init(init::Args),
    #[clap(visible_alias = "a")]
    Add(add::Args),
    #[clap(visible_alias = "rm")]
    Remove(remove::Args),
    Tidy(tidy::Args),
    #[clap(visible_alias = "r")]
    Run(run::Args),
}

pub async fn execute() -> miette::Result<()> {
    let args = Args::parse();

    set_console_colors(&args.global_options);
    let use_colors = console::colors_enabled_stderr();
    // Set up the default miette handler based on whether we want colors or not.
    miette::set_hook(Box::new(move |_| {
        Box::new(
            miette::MietteHandlerOpts::default()
                .color(use_colors)
                .build(),
        )
    }))?;

    setup_logging(&args.global_options, use_colors)?;

    let config = Config::load_global();
    execute_command(args.command, &config).await
}

fn setup_logging(options: &GlobalOptions, use_colors: bool) -> miette::Result<()> {
    let level_filter = options.log_level_filter();

    // If CLI flags are set (--quiet/-v), use them and ignore RUST_LOG
    let cli_verbosity_set = options.verbose > 0 || options.quiet > 0;
    let env_directives = if cli_verbosity_set {
        String::new()
    } else {
        env::var("RUST_LOG").unwrap_or_default()
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .parse(&env_directives)
        .into_diagnostic()?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(use_colors)
        .with_target(level_filter >= LevelFilter::DEBUG)
        .with_writer(std::io::stderr)
        .without_time();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
    Ok(())
}

/// Maps command enum variants to their actual function handlers.
pub async fn execute_command(command: Command, config: &Config) -> miette::Result<()> {
    match command {
        Command::Init(cmd) => init::execute(cmd, config).await,
        Command::Add(cmd) => add::execute(cmd, config).await,
        Command::Remove(cmd) => remove::execute(cmd, config).await,
        Command::Tidy(cmd) => tidy::execute(cmd, config).await,
        Command::Run(cmd) => run::execute(cmd, config).await,
    }
}

/// Whether to use colored log format.
/// Option `Auto` enables color output only if the logging is done to a terminal
/// and  `NO_COLOR` environment variable is not set.
#[derive(clap::ValueEnum, Debug, Clone, Default)]
pub enum ColorOutput {
    Always,
    Never,

    #[default]
    Auto,
}

fn set_console_colors(options: &GlobalOptions) {
    // Honor FORCE_COLOR and NO_COLOR environment variables.
    // Those take precedence over the CLI flag and COMPY_COLOR
    let color = match env::var("FORCE_COLOR") {
        Ok(_) => &ColorOutput::Always,
        Err(_) => match env::var("NO_COLOR") {
            Ok(_) => &ColorOutput::Never,
            Err(_) => &options.color,
        },
    };

    match color {
        ColorOutput::Always => {
            console::set_colors_enabled(true);
            console::set_colors_enabled_stderr(true);
        }
        ColorOutput::Never => {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }
        ColorOutput::Auto => {} // Let `console` detect if colors should be enabled
    };
}
