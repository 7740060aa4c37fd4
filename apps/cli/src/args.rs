//! # CLI Argument Definitions
//!
//! Command-line structure of the `optgate` binary, built with the `clap` derive API.

use clap::{Args, Parser, Subcommand};
use optgate::domain::config::OutputFormat;
use std::path::PathBuf;

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "optgate")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Resolves and validates the build-time options of the circulation model")]
pub struct Cli {
    /// Settings file (TOML, JSON or YAML); `optgate.toml` in the working directory otherwise
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Extra TOML flag catalog layered on top of the configured registry
    #[arg(long, global = true, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Log at debug level regardless of the configured level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve one options header and render the complete configuration
    Resolve(ResolveArgs),
    /// Validate options headers and report every violation
    Check {
        /// Headers to validate, each on its own
        #[arg(required = true, value_name = "SOURCE")]
        sources: Vec<PathBuf>,
    },
    /// List the flag registry
    #[command(alias = "ls")]
    Flags {
        /// Comma-separated categories (e.g. 'forcing, algorithm' or '*' for all)
        #[arg(short, long, default_value = "all")]
        category: String,
    },
    /// Show the flags a header moves away from their defaults
    Diff {
        #[arg(value_name = "SOURCE")]
        source: PathBuf,
    },
}

#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// The authoritative options header; naming more than one is an error
    #[arg(required = true, value_name = "SOURCE")]
    pub sources: Vec<PathBuf>,

    /// Output format: header, json or defines
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Include-guard macro of the rendered header
    #[arg(short, long)]
    pub guard: Option<String>,

    /// Write to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}
