#![warn(rust_2018_idioms, unused_lifetimes)]
#![allow(clippy::print_stderr, clippy::print_stdout)]

pub mod args;
pub mod handlers;

use crate::args::{Cli, Commands};
use crate::handlers::{check, diff, flags, resolve};

use anyhow::{Context, Result};
use clap::Parser;
use optgate::Emitter;
use optgate::domain::config::LoggingSettings;
use optgate::kernel::config::load_settings;
use optgate_logger::{LevelFilter, Logger};
use std::str::FromStr;
use tracing::debug;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = load_settings(cli.config.as_deref())?;
    let _logger = init_logger(&settings.logging, cli.verbose)?;
    debug!(?settings, "Settings loaded");

    let registry = optgate::registry_from_settings(&settings.catalog, cli.catalog.as_deref())?;
    let emitter = Emitter::new(registry);

    match cli.command {
        Commands::Resolve(args) => resolve::run(&emitter, &settings.output, args)?,
        Commands::Check { sources } => check::run(&emitter, &sources)?,
        Commands::Flags { category } => flags::run(emitter.registry(), &category)?,
        Commands::Diff { source } => diff::run(&emitter, &source)?,
    }

    Ok(())
}

fn init_logger(settings: &LoggingSettings, verbose: bool) -> Result<Logger> {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::from_str(&settings.level)
            .with_context(|| format!("Invalid log level '{}'", settings.level))?
    };

    let builder = Logger::builder().name("optgate").console(true).level(level);
    let builder = match &settings.filter {
        Some(filter) => builder.env_filter(filter.clone()),
        None => builder,
    };

    let logger = match &settings.directory {
        Some(directory) => builder
            .path(directory.clone())
            .max_files(settings.max_files)
            .json(settings.json)
            .init()?,
        None => builder.init()?,
    };

    Ok(logger)
}
