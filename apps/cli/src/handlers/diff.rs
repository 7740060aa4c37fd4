use anyhow::Result;
use optgate::Emitter;
use optgate::resolver::parser;
use std::path::Path;

/// Prints `+NAME` / `-NAME` for every flag whose resolved state differs from its default.
///
/// # Errors
/// Returns an error if the header cannot be read, parsed or resolved.
pub fn run(emitter: &Emitter, path: &Path) -> Result<()> {
    let source = parser::load_source(path)?;
    let resolved = emitter.resolve(&source)?;

    let mut overrides = resolved.overrides().peekable();
    if overrides.peek().is_none() {
        println!("{} keeps every registry default", resolved.source());
        return Ok(());
    }

    for state in overrides {
        let sign = if state.enabled { '+' } else { '-' };
        println!("{sign}{:<34} {}", state.name, state.category);
    }

    Ok(())
}
