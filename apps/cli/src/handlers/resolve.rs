use crate::args::ResolveArgs;
use crate::handlers::load_sources;
use anyhow::{Context, Result};
use optgate::Emitter;
use optgate::domain::config::OutputSettings;
use optgate::resolver::render;
use std::fs;
use tracing::info;

/// Resolves the single authoritative header and renders it.
///
/// # Errors
/// Returns an error if the header is missing, ambiguous, unreadable or invalid, or if the
/// output file cannot be written.
pub fn run(emitter: &Emitter, output: &OutputSettings, args: ResolveArgs) -> Result<()> {
    let sources = load_sources(&args.sources)?;
    let resolved = emitter.resolve_one(&sources)?;

    let format = args.format.unwrap_or(output.format);
    let guard = args.guard.as_deref().unwrap_or(&output.guard);
    let rendered = render::render(&resolved, format, guard)?;

    match args.output {
        Some(path) => {
            fs::write(&path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), %format, "Resolved configuration written");
        },
        None => print!("{rendered}"),
    }

    Ok(())
}
