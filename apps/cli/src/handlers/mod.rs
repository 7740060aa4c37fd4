pub mod check;
pub mod diff;
pub mod flags;
pub mod resolve;

use anyhow::Result;
use optgate::domain::source::ConfigSource;
use optgate::resolver::parser;
use std::path::PathBuf;

/// Parses every header named on the command line, in order.
///
/// # Errors
/// Returns the first I/O or parse error.
pub fn load_sources(paths: &[PathBuf]) -> Result<Vec<ConfigSource>> {
    Ok(paths.iter().map(|path| parser::load_source(path)).collect::<Result<_, _>>()?)
}
